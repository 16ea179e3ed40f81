//! Blocking transport primitives over a caller-supplied `ureq::Agent`.
//!
//! # Design
//! Any response the agent received is returned as raw body bytes, whatever
//! its status code. Status-as-error is switched off per request so this
//! holds even for agents configured the other way. Only failures to complete
//! the round trip (DNS, connect, TLS, timeout, body read) become
//! `Error::Transport`. Bodies are read without a size limit.
//!
//! Cookies set by the server land in the agent's jar as a side effect; that
//! jar is the only session state there is.

use std::time::Duration;

use ureq::http::Response;
use ureq::{Agent, Body};

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};

/// An agent with a cookie jar and status-as-error disabled.
pub fn agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Like [`agent`], with a global per-call timeout.
pub fn agent_with_timeout(timeout: Duration) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

/// Perform a GET against `url` and return the response body.
pub fn get_with_body(agent: &Agent, url: &str) -> Result<Vec<u8>> {
    tracing::debug!(%url, "GET");
    let response = agent
        .get(url)
        .config()
        .http_status_as_error(false)
        .build()
        .call()?;
    read_body(url, response)
}

/// Perform a form-encoded POST against `url` and return the response body.
///
/// `form` may repeat keys; an empty form is sent as an empty body.
pub fn post_with_body(agent: &Agent, url: &str, form: &[(String, String)]) -> Result<Vec<u8>> {
    tracing::debug!(%url, fields = form.len(), "POST");
    let response = agent
        .post(url)
        .config()
        .http_status_as_error(false)
        .build()
        .send_form(form.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    read_body(url, response)
}

/// Dispatch a request descriptor through the matching primitive.
pub fn execute(agent: &Agent, request: &HttpRequest) -> Result<Vec<u8>> {
    let url = request.url();
    match request.method {
        HttpMethod::Get => get_with_body(agent, &url),
        HttpMethod::Post => post_with_body(agent, &url, &request.form),
    }
}

fn read_body(url: &str, mut response: Response<Body>) -> Result<Vec<u8>> {
    let status = response.status();
    if status.is_success() {
        tracing::debug!(%url, status = status.as_u16(), "response");
    } else {
        tracing::warn!(%url, status = status.as_u16(), "non-success status, decoding body anyway");
    }
    Ok(response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()?)
}
