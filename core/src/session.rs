//! Authenticated session over a caller-owned agent.
//!
//! # Design
//! `Newsblur` borrows a `ureq::Agent`; the agent's cookie jar carries the
//! login cookie and is the only session state. Nothing here is mutated after
//! construction, so one agent can back several sessions and separate agents
//! give fully independent sessions.
//!
//! The session goes from unauthenticated to authenticated through a
//! successful [`Newsblur::login`]. There is no logout: to end a session,
//! clear the agent's cookie jar or drop the agent.

use std::fmt::{self, Display};

use ureq::Agent;

use crate::client::{NewsblurClient, DEFAULT_HOSTNAME};
use crate::error::Result;
use crate::transport;
use crate::types::{
    ClassifierOutput, LoginOutput, MarkOutput, ReaderFeedsOutput, StarredStoryHashesOutput,
    StoriesOutput,
};

/// Handle through which every endpoint is called.
///
/// Calls block for one round trip each. Concurrent calls on sessions that
/// share an agent are not ordered relative to each other.
#[derive(Clone)]
pub struct Newsblur<'a> {
    agent: &'a Agent,
    client: NewsblurClient,
}

impl fmt::Debug for Newsblur<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Newsblur")
            .field("hostname", &self.hostname())
            .finish_non_exhaustive()
    }
}

impl<'a> Newsblur<'a> {
    /// A session against the public NewsBlur host.
    pub fn new(agent: &'a Agent) -> Self {
        Self::with_hostname(agent, DEFAULT_HOSTNAME)
    }

    pub fn with_hostname(agent: &'a Agent, hostname: &str) -> Self {
        Self {
            agent,
            client: NewsblurClient::new(hostname),
        }
    }

    pub fn hostname(&self) -> &str {
        self.client.hostname()
    }

    pub fn agent(&self) -> &'a Agent {
        self.agent
    }

    /// Log in; on success the session cookie is in the agent's jar.
    ///
    /// Returns `Error::Authentication` when the server declines. Callers must
    /// not go on to make authenticated calls after that.
    ///
    /// POST /api/login
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutput> {
        let req = self.client.build_login(username, password);
        let output = self.client.parse_login(&transport::execute(self.agent, &req)?)?;
        tracing::debug!(hostname = self.hostname(), "logged in");
        Ok(output)
    }

    /// Subscribed feeds and the raw folder tree.
    ///
    /// GET /reader/feeds?v=2
    pub fn reader_feeds(&self) -> Result<ReaderFeedsOutput> {
        let req = self.client.build_reader_feeds();
        self.client.parse_reader_feeds(&transport::execute(self.agent, &req)?)
    }

    /// One page of stories from a single feed. `page` 0 is treated as 1.
    ///
    /// GET /reader/feed/{feed_id}?page={page}
    pub fn reader_feed(&self, feed_id: impl Display, page: u32) -> Result<StoriesOutput> {
        let req = self.client.build_reader_feed(feed_id, page);
        self.client.parse_reader_feed(&transport::execute(self.agent, &req)?)
    }

    /// One page of the river across `feeds`. `page` 0 is treated as 1.
    ///
    /// POST /reader/river_stories
    pub fn reader_river_stories<S: AsRef<str>>(&self, feeds: &[S], page: u32) -> Result<StoriesOutput> {
        let req = self.client.build_reader_river_stories(feeds, page);
        self.client
            .parse_reader_river_stories(&transport::execute(self.agent, &req)?)
    }

    /// POST /reader/mark_story_hashes_as_read
    pub fn mark_story_hashes_as_read<S: AsRef<str>>(&self, story_hashes: &[S]) -> Result<MarkOutput> {
        let req = self.client.build_mark_story_hashes_as_read(story_hashes);
        self.client
            .parse_mark_story_hashes_as_read(&transport::execute(self.agent, &req)?)
    }

    /// POST /reader/mark_story_hash_as_unread
    pub fn mark_story_hash_as_unread(&self, story_hash: &str) -> Result<MarkOutput> {
        let req = self.client.build_mark_story_hash_as_unread(story_hash);
        self.client
            .parse_mark_story_hash_as_unread(&transport::execute(self.agent, &req)?)
    }

    /// POST /reader/mark_story_hash_as_starred
    pub fn mark_story_hash_as_starred(&self, story_hash: &str) -> Result<MarkOutput> {
        let req = self.client.build_mark_story_hash_as_starred(story_hash);
        self.client
            .parse_mark_story_hash_as_starred(&transport::execute(self.agent, &req)?)
    }

    /// POST /reader/mark_story_hash_as_unstarred
    pub fn mark_story_hash_as_unstarred(&self, story_hash: &str) -> Result<MarkOutput> {
        let req = self.client.build_mark_story_hash_as_unstarred(story_hash);
        self.client
            .parse_mark_story_hash_as_unstarred(&transport::execute(self.agent, &req)?)
    }

    /// GET /reader/starred_story_hashes
    pub fn reader_starred_story_hashes(&self) -> Result<StarredStoryHashesOutput> {
        let req = self.client.build_reader_starred_story_hashes();
        self.client
            .parse_reader_starred_story_hashes(&transport::execute(self.agent, &req)?)
    }

    /// Intelligence classifiers trained for a feed.
    ///
    /// GET /classifier/{feed_id}
    pub fn classifier(&self, feed_id: impl Display) -> Result<ClassifierOutput> {
        let req = self.client.build_classifier(feed_id);
        self.client.parse_classifier(&transport::execute(self.agent, &req)?)
    }
}
