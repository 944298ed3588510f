//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: http::HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        headers: http::HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path, headers, body, params }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup. Names are case-insensitive; non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/todos/{id}`, `req.param("id")` on `/api/todos/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the body as JSON. A body of only whitespace decodes as `{}`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"{}");
        }
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &'static [u8]) -> Request {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
        Request::new(
            Method::Post,
            "/api/todos".to_owned(),
            headers,
            Bytes::from_static(body),
            HashMap::from([("id".to_owned(), "7".to_owned())]),
        )
    }

    #[test]
    fn empty_body_decodes_as_empty_object() {
        let v: serde_json::Value = request(b"").json().unwrap();
        assert_eq!(v, serde_json::json!({}));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(request(b"{text:").json::<serde_json::Value>().is_err());
    }

    #[test]
    fn exposes_method_path_and_headers() {
        let req = request(b"");
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/api/todos");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn params_are_looked_up_by_name() {
        let req = request(b"");
        assert_eq!(req.param("id"), Some("7"));
        assert_eq!(req.param("missing"), None);
    }
}
