//! Stateless request builder and response parser for the NewsBlur API.
//!
//! # Design
//! `NewsblurClient` holds only a `hostname`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! decodes the response body and applies the endpoint's post-condition.
//! `Newsblur` (the session) glues the two together over a live agent; the
//! split keeps wire encoding and decoding testable without I/O.

use std::fmt::Display;

use url::form_urlencoded;

use crate::decode::decode;
use crate::error::{Error, Result};
use crate::http::HttpRequest;
use crate::types::{
    ClassifierOutput, LoginOutput, MarkOutput, ReaderFeedsOutput, StarredStoryHashesOutput,
    StoriesOutput,
};

pub const DEFAULT_HOSTNAME: &str = "https://www.newsblur.com";

/// Synchronous, stateless client for the NewsBlur API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsblurClient {
    hostname: String,
}

impl Default for NewsblurClient {
    fn default() -> Self {
        Self::new(DEFAULT_HOSTNAME)
    }
}

impl NewsblurClient {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.trim_end_matches('/').to_string(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.hostname)
    }

    /// `prefix` followed by `id` percent-encoded as a single path segment.
    fn url_with_id(&self, prefix: &str, id: impl Display) -> String {
        let id = id.to_string();
        let segment: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
        self.url(&format!("{prefix}/{segment}"))
    }

    pub fn build_login(&self, username: &str, password: &str) -> HttpRequest {
        HttpRequest::post(self.url("/api/login"))
            .form_field("username", username)
            .form_field("password", password)
    }

    pub fn build_reader_feeds(&self) -> HttpRequest {
        HttpRequest::get(self.url("/reader/feeds")).query_param("v", 2)
    }

    pub fn build_reader_feed(&self, feed_id: impl Display, page: u32) -> HttpRequest {
        HttpRequest::get(self.url_with_id("/reader/feed", feed_id))
            .query_param("page", normalize_page(page))
    }

    pub fn build_reader_river_stories<S: AsRef<str>>(&self, feeds: &[S], page: u32) -> HttpRequest {
        HttpRequest::post(self.url("/reader/river_stories"))
            .form_fields("feeds", feeds)
            .form_field("page", normalize_page(page))
    }

    pub fn build_mark_story_hashes_as_read<S: AsRef<str>>(&self, story_hashes: &[S]) -> HttpRequest {
        HttpRequest::post(self.url("/reader/mark_story_hashes_as_read"))
            .form_fields("story_hash", story_hashes)
    }

    pub fn build_mark_story_hash_as_unread(&self, story_hash: &str) -> HttpRequest {
        HttpRequest::post(self.url("/reader/mark_story_hash_as_unread"))
            .form_field("story_hash", story_hash)
    }

    pub fn build_mark_story_hash_as_starred(&self, story_hash: &str) -> HttpRequest {
        HttpRequest::post(self.url("/reader/mark_story_hash_as_starred"))
            .form_field("story_hash", story_hash)
    }

    pub fn build_mark_story_hash_as_unstarred(&self, story_hash: &str) -> HttpRequest {
        HttpRequest::post(self.url("/reader/mark_story_hash_as_unstarred"))
            .form_field("story_hash", story_hash)
    }

    pub fn build_reader_starred_story_hashes(&self) -> HttpRequest {
        HttpRequest::get(self.url("/reader/starred_story_hashes"))
    }

    pub fn build_classifier(&self, feed_id: impl Display) -> HttpRequest {
        HttpRequest::get(self.url_with_id("/classifier", feed_id))
    }

    /// Fails with `Error::Authentication` unless the server set `authenticated`.
    pub fn parse_login(&self, body: &[u8]) -> Result<LoginOutput> {
        let output: LoginOutput = decode(body)?;
        if !output.authenticated {
            tracing::warn!(code = output.code, "login rejected");
            return Err(Error::Authentication {
                errors: output.errors,
            });
        }
        Ok(output)
    }

    pub fn parse_reader_feeds(&self, body: &[u8]) -> Result<ReaderFeedsOutput> {
        decode(body)
    }

    pub fn parse_reader_feed(&self, body: &[u8]) -> Result<StoriesOutput> {
        decode(body)
    }

    pub fn parse_reader_river_stories(&self, body: &[u8]) -> Result<StoriesOutput> {
        decode(body)
    }

    pub fn parse_mark_story_hashes_as_read(&self, body: &[u8]) -> Result<MarkOutput> {
        parse_mark("mark_story_hashes_as_read", body)
    }

    pub fn parse_mark_story_hash_as_unread(&self, body: &[u8]) -> Result<MarkOutput> {
        parse_mark("mark_story_hash_as_unread", body)
    }

    pub fn parse_mark_story_hash_as_starred(&self, body: &[u8]) -> Result<MarkOutput> {
        parse_mark("mark_story_hash_as_starred", body)
    }

    pub fn parse_mark_story_hash_as_unstarred(&self, body: &[u8]) -> Result<MarkOutput> {
        parse_mark("mark_story_hash_as_unstarred", body)
    }

    pub fn parse_reader_starred_story_hashes(&self, body: &[u8]) -> Result<StarredStoryHashesOutput> {
        decode(body)
    }

    pub fn parse_classifier(&self, body: &[u8]) -> Result<ClassifierOutput> {
        decode(body)
    }
}

/// Pages are 1-based; 0 means "unspecified" and is sent as 1.
fn normalize_page(page: u32) -> u32 {
    page.max(1)
}

/// An absent `result` counts as success; any value other than `"ok"` does not.
fn parse_mark(operation: &'static str, body: &[u8]) -> Result<MarkOutput> {
    let output: MarkOutput = decode(body)?;
    match output.result.as_deref() {
        None | Some("ok") => Ok(output),
        Some(result) => {
            tracing::warn!(operation, result, "mutation rejected");
            Err(Error::Rejected {
                operation,
                result: result.to_string(),
            })
        }
    }
}
