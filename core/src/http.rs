//! Request descriptors for the NewsBlur HTTP API.
//!
//! # Design
//! `HttpRequest` describes one call as plain data: method, URL, query and
//! form fields. `NewsblurClient::build_*` produces it; `transport::execute`
//! sends it. Keeping the description separate from the I/O lets the wire
//! encoding be checked without a network.

use url::form_urlencoded;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `form` is an ordered multi-map: a key may appear several times and the
/// order of entries is the order on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(path: String) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn post(path: String) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            query: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn query_param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn form_field(mut self, key: &str, value: impl ToString) -> Self {
        self.form.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends one `key` entry per value.
    pub fn form_fields<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.form.extend(
            values
                .into_iter()
                .map(|v| (key.to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Fully-qualified URL with the query string appended.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{query}", self.path)
    }

    /// The form body as `application/x-www-form-urlencoded`.
    pub fn encoded_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.form)
            .finish()
    }

    pub fn form_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.form
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
