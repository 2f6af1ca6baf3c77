//! Request identity and store key hashing.

use sha2::{Digest, Sha256};

use crate::Request;

/// Compute the store key for a request identity.
pub fn compute_cache_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Normalized request identity: method plus fragment-free URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn from_request(request: &Request) -> Self {
        let mut url = request.url.clone();
        url.set_fragment(None);
        Self { method: request.method.to_ascii_uppercase(), url: url.into() }
    }

    /// Hex SHA-256 of the identity, used as the primary key in storage.
    pub fn hash(&self) -> String {
        compute_cache_key(&self.method, &self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("GET", "https://app.test/");
        let hash2 = compute_cache_key("GET", "https://app.test/");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_method() {
        assert_ne!(compute_cache_key("GET", "https://app.test/"), compute_cache_key("HEAD", "https://app.test/"));
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("GET", "https://app.test/");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_ignores_fragment_and_headers() {
        let a = Request::get(Url::parse("https://app.test/a.js#x").unwrap()).with_header("Accept", "*/*");
        let b = Request::get(Url::parse("https://app.test/a.js").unwrap());
        assert_eq!(RequestKey::from_request(&a), RequestKey::from_request(&b));
        assert_eq!(RequestKey::from_request(&a).hash(), RequestKey::from_request(&b).hash());
    }

    #[test]
    fn test_key_keeps_query() {
        let a = RequestKey::from_request(&Request::get(Url::parse("https://app.test/a.js?v=1").unwrap()));
        let b = RequestKey::from_request(&Request::get(Url::parse("https://app.test/a.js?v=2").unwrap()));
        assert_ne!(a.hash(), b.hash());
    }
}
