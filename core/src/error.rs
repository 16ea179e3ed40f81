//! Error types for the NewsBlur client.
//!
//! # Design
//! Transport, decode and authentication failures are separate variants so
//! callers can react to each differently. HTTP status codes never produce an
//! error on their own: the service reports logical failure inside the JSON
//! body, so the decoded fields decide.

use thiserror::Error;

/// Errors returned by session methods and `NewsblurClient::parse_*`.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be completed at the network layer.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The body is not JSON, or lacks fields required by the target shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Login returned a well-formed response with `authenticated: false`.
    /// `errors` is the remote payload, forwarded unchanged.
    #[error("failed to login to NewsBlur: {errors}")]
    Authentication { errors: serde_json::Value },

    /// A mutation's response carried a `result` other than `"ok"`.
    #[error("{operation} rejected by server (result: {result})")]
    Rejected {
        operation: &'static str,
        result: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
