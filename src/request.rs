//! Incoming HTTP request type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// An incoming HTTP request, detached from the transport.
///
/// Lives for exactly one request/response cycle. The server builds it from the
/// hyper request once the body has been read; tests build it directly:
///
/// ```rust
/// use stockroom::Request;
///
/// let req = Request::new("POST", "/products?dry=1")
///     .header("api-key", "secret")
///     .body(br#"{"name":"Kettle","price":20}"#.to_vec());
///
/// assert_eq!(req.path(), "/products");
/// assert_eq!(req.query("dry"), Some("1"));
/// ```
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) raw_query: Option<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Creates a request for `method` and a request target (`path[?query]`).
    ///
    /// Query pairs are percent-decoded; `+` decodes to a space.
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        let query = raw_query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            method: method.into(),
            path: path.to_owned(),
            raw_query: raw_query.map(str::to_owned),
            query,
            headers: Vec::new(),
            body: Vec::new(),
            params: HashMap::new(),
        }
    }

    /// Appends a header. Returns `self` for chaining.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body. Returns `self` for chaining.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn raw_query(&self) -> Option<&str> { self.raw_query.as_deref() }

    /// Case-insensitive header lookup. The first matching header wins.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/products/{id}`, `req.param("id")` on `/products/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of a query parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Decodes the body as JSON. Malformed bodies are validation errors.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}
