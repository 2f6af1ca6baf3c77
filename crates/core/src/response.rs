//! Single-consumption response model.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Where a response handed back to the caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Network,
    Cache,
    Fallback,
}

/// A fetched or stored response.
///
/// Not `Clone`: a response has exactly one consumer. Code that
/// both stores a response and returns it must call [`Response::duplicate`]
/// and give each consumer its own copy.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    body: Bytes,
    pub source: ResponseSource,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>, source: ResponseSource) -> Self {
        Self { status, headers, body: body.into(), source }
    }

    /// A 200 response received from the network.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, Vec::new(), body, ResponseSource::Network)
    }

    /// An independent copy with its own readable body.
    pub fn duplicate(&self) -> Self {
        Self { status: self.status, headers: self.headers.clone(), body: self.body.clone(), source: self.source }
    }

    /// Re-label where this response is being served from.
    pub fn with_source(mut self, source: ResponseSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Consume the response, yielding its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Consume the response, yielding its body as lossy UTF-8.
    pub fn into_text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_independent() {
        let original = Response::ok("<html>A</html>");
        let copy = original.duplicate();
        assert_eq!(original.into_text(), "<html>A</html>");
        assert_eq!(copy.into_text(), "<html>A</html>");
    }

    #[test]
    fn test_is_success() {
        assert!(Response::ok("").is_success());
        assert!(!Response::new(404, Vec::new(), "", ResponseSource::Network).is_success());
        assert!(!Response::new(301, Vec::new(), "", ResponseSource::Network).is_success());
    }

    #[test]
    fn test_with_source() {
        let res = Response::ok("x").with_source(ResponseSource::Fallback);
        assert_eq!(res.source, ResponseSource::Fallback);
    }

    #[test]
    fn test_content_type() {
        let res = Response::new(
            200,
            vec![("Content-Type".into(), "text/css".into())],
            "body{}",
            ResponseSource::Network,
        );
        assert_eq!(res.content_type(), Some("text/css"));
        assert_eq!(res.body_len(), 6);
    }
}
