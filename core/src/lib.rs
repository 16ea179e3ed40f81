//! Blocking client for the NewsBlur HTTP API.
//!
//! # Overview
//! Logs a user in, keeps the session in the cookie jar of a caller-owned
//! `ureq::Agent`, and exposes typed calls for feeds, stories, read/starred
//! state and intelligence classifiers.
//!
//! # Design
//! - `NewsblurClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` decodes a body and applies the endpoint's post-condition.
//! - `transport` sends an `HttpRequest` and hands back the body for any
//!   received response; status codes are never treated as failures.
//! - `Newsblur` pairs a borrowed agent with a client. It holds no mutable
//!   state; identity lives entirely in the agent's cookies.
//! - No retries, caching or internal concurrency. Timeouts belong on the
//!   agent.
//!
//! ```no_run
//! use newsblur_core::{transport, Newsblur};
//!
//! # fn main() -> newsblur_core::Result<()> {
//! let agent = transport::agent();
//! let nb = Newsblur::new(&agent);
//! nb.login("alice", "s3cret")?;
//! for feed in nb.reader_feeds()?.feeds {
//!     let page = nb.reader_feed(feed.id, 1)?;
//!     println!("{}: {} stories", feed.feed_title, page.stories.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod decode;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{NewsblurClient, DEFAULT_HOSTNAME};
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest};
pub use session::Newsblur;
pub use types::{
    ClassifierCategory, ClassifierInput, ClassifierOutput, ClassifierScore, Classifiers, Feed,
    FeedCounts, LoginInput, LoginOutput, MarkOutput, ReaderFeedsOutput, StarredStoryHashesOutput,
    StoriesOutput, Story,
};
