//! Cache key derivation.

use salesdesk_core::KeyStrategy;
use salesdesk_data::Request;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Key a cached response is stored under.
///
/// A lowercase hex SHA-256 digest of the request's method and full URL
/// (query string included), optionally followed by a digest of the body.
/// Always 64 characters, safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Length of a key in characters.
    pub const LEN: usize = 64;

    /// Derive the key for a request.
    pub fn for_request(request: &Request, strategy: KeyStrategy) -> Self {
        let mut material = format!("{} {}", request.method, request.url);
        if strategy == KeyStrategy::MethodUrlBody {
            material.push('\n');
            material.push_str(&format!("{:x}", Sha256::digest(request.body_bytes())));
        }
        Self(format!("{:x}", Sha256::digest(material.as_bytes())))
    }

    /// Parse a key previously produced by [`CacheKey::for_request`].
    pub fn parse(s: &str) -> Option<Self> {
        let valid = s.len() == Self::LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(s.to_string()))
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use salesdesk_core::Method;

    use super::*;

    fn key(request: &Request) -> CacheKey {
        CacheKey::for_request(request, KeyStrategy::MethodUrl)
    }

    #[test]
    fn test_same_request_same_key() {
        let a = Request::get("http://localhost:4000/api/products");
        let b = Request::get("http://localhost:4000/api/products").header("x-access-token", "t");
        assert_eq!(key(&a), key(&b));
        assert_eq!(key(&a).as_str().len(), CacheKey::LEN);
    }

    #[test]
    fn test_query_string_is_part_of_key() {
        let page1 = Request::get("http://localhost:4000/api/products?page=1&limit=10");
        let page2 = Request::get("http://localhost:4000/api/products?page=2&limit=10");
        assert_ne!(key(&page1), key(&page2));
    }

    #[test]
    fn test_method_is_part_of_key() {
        let get = Request::get("http://localhost:4000/api/sales");
        let post = Request::post("http://localhost:4000/api/sales");
        assert_ne!(key(&get), key(&post));
    }

    #[test]
    fn test_body_ignored_by_default() {
        let a = Request::post("http://api.test/sales").text("a");
        let b = Request::post("http://api.test/sales").text("b");
        assert_eq!(key(&a), key(&b));
    }

    #[test]
    fn test_body_strategy() {
        let a = Request::post("http://api.test/sales").text("a");
        let b = Request::post("http://api.test/sales").text("b");

        let strat = KeyStrategy::MethodUrlBody;
        assert_ne!(CacheKey::for_request(&a, strat), CacheKey::for_request(&b, strat));
    }

    #[test]
    fn test_body_strategy_missing_and_empty_body_match() {
        let bare = Request::new(Method::Post, "http://api.test/sales");
        let empty = Request::post("http://api.test/sales").body(Vec::new());
        let empty_text = Request::post("http://api.test/sales").text("");

        let strat = KeyStrategy::MethodUrlBody;
        assert_eq!(CacheKey::for_request(&bare, strat), CacheKey::for_request(&empty, strat));
        assert_eq!(CacheKey::for_request(&bare, strat), CacheKey::for_request(&empty_text, strat));
    }

    #[test]
    fn test_parse() {
        let k = key(&Request::get("http://api.test/users"));
        assert_eq!(CacheKey::parse(k.as_str()), Some(k.clone()));
        assert_eq!(CacheKey::parse("../etc/passwd"), None);
        assert_eq!(CacheKey::parse(&k.as_str().to_uppercase()), None);
        assert_eq!(CacheKey::parse(""), None);
    }
}
