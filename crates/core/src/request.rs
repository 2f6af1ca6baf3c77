//! Platform-independent request descriptor.
//!
//! Hosts translate whatever their interception mechanism hands them into a
//! [`Request`] before it reaches the policy engine.

use serde::{Deserialize, Serialize};
use url::Url;

/// How the request was initiated by the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Full-document load in a browsing context.
    Navigate,
    /// Same-origin subresource request.
    SameOrigin,
    /// CORS-mode subresource request.
    #[default]
    Cors,
    /// Opaque request.
    NoCors,
}

/// An intercepted request.
///
/// The method is upper-cased and the URL fragment removed on construction,
/// so two descriptors for the same resource compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: Url,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub mode: RequestMode,
}

impl Request {
    pub fn new(method: &str, mut url: Url) -> Self {
        url.set_fragment(None);
        Self { method: method.trim().to_ascii_uppercase(), url, headers: Vec::new(), mode: RequestMode::default() }
    }

    /// A plain GET subresource request.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// A GET request flagged as a document navigation.
    pub fn navigate(url: Url) -> Self {
        Self::get(url)
            .with_mode(RequestMode::Navigate)
            .with_header("Accept", "text/html,application/xhtml+xml")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn accept(&self) -> Option<&str> {
        self.header("accept")
    }

    /// Method check that tolerates lower-case methods from deserialized requests.
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}
