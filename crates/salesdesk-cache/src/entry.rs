//! Stored response snapshots.

use chrono::{DateTime, Utc};
use salesdesk_core::{Headers, Method};
use salesdesk_data::{Request, Response};
use serde::{Deserialize, Serialize};

use crate::CacheKey;

/// A stored response.
///
/// Entries are replaced as a whole, never edited. `stored_at` is
/// informational; nothing expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry is stored under.
    pub key: CacheKey,
    /// Method of the request that produced the response.
    pub method: Method,
    /// URL of the request that produced the response.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Headers,
    /// Response body.
    #[serde(with = "body_encoding")]
    pub body: Vec<u8>,
    /// When the entry was written.
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Snapshot a network response for `request`.
    pub fn from_response(key: CacheKey, request: &Request, response: &Response) -> Self {
        Self {
            key,
            method: request.method,
            url: request.url.clone(),
            status: response.status,
            headers: response.headers.clone(),
            body: response.body.clone(),
            stored_at: Utc::now(),
        }
    }

    /// Rebuild the response this entry was taken from.
    pub fn to_response(&self) -> Response {
        Response::new(self.status, self.headers.clone(), self.body.clone())
    }

    /// Size of the stored body in bytes.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

mod body_encoding {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
