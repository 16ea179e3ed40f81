//! Free-function adapters taking the agent directly.
//!
//! Each builds a [`Newsblur`] session for the one call: the plain forms
//! against [`DEFAULT_HOSTNAME`], the `_with_hostname` forms against `hostname`.

use ureq::Agent;

use crate::client::DEFAULT_HOSTNAME;
use crate::error::Result;
use crate::session::Newsblur;
use crate::types::{ClassifierInput, ClassifierOutput, LoginInput, LoginOutput, ReaderFeedsOutput};

/// Fails with `Error::Authentication` when the server declines, like
/// [`Newsblur::login`].
pub fn login(agent: &Agent, input: &LoginInput) -> Result<LoginOutput> {
    login_with_hostname(agent, DEFAULT_HOSTNAME, input)
}

pub fn login_with_hostname(agent: &Agent, hostname: &str, input: &LoginInput) -> Result<LoginOutput> {
    Newsblur::with_hostname(agent, hostname).login(&input.username, &input.password)
}

pub fn reader_feeds(agent: &Agent) -> Result<ReaderFeedsOutput> {
    reader_feeds_with_hostname(agent, DEFAULT_HOSTNAME)
}

pub fn reader_feeds_with_hostname(agent: &Agent, hostname: &str) -> Result<ReaderFeedsOutput> {
    Newsblur::with_hostname(agent, hostname).reader_feeds()
}

pub fn classifier(agent: &Agent, input: &ClassifierInput) -> Result<ClassifierOutput> {
    classifier_with_hostname(agent, DEFAULT_HOSTNAME, input)
}

pub fn classifier_with_hostname(
    agent: &Agent,
    hostname: &str,
    input: &ClassifierInput,
) -> Result<ClassifierOutput> {
    Newsblur::with_hostname(agent, hostname).classifier(&input.feed_id)
}
