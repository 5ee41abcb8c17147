//! Console configuration model.
//!
//! Loading and discovery live in the CLI; this module only defines the shape
//! of the file and its defaults, so every library crate reads the same types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default REST backend the console talks to.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// Header carrying the access token on outgoing requests.
pub const DEFAULT_TOKEN_HEADER: &str = "x-access-token";

/// Name of the cache namespace responses are stored under.
pub const DEFAULT_CACHE_NAMESPACE: &str = "api-cache";

/// Top-level console configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// REST backend settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Sale computation settings.
    #[serde(default)]
    pub sale: SaleConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// REST backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL relative request paths are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Header name used to send the access token.
    #[serde(default = "default_token_header")]
    pub token_header: String,

    /// Transport timeout in seconds. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_header: default_token_header(),
            timeout_secs: None,
        }
    }
}

/// How a cache key is derived from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyStrategy {
    /// Method and full URL. POST payloads to one URL share an entry.
    #[default]
    MethodUrl,
    /// Method, full URL and a digest of the request body.
    MethodUrlBody,
}

/// Response cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether requests go through the cache at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache namespace (subdirectory of `dir`).
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Root directory of the persistent store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Cache key derivation.
    #[serde(default)]
    pub key_strategy: KeyStrategy,
}

fn default_true() -> bool {
    true
}

fn default_namespace() -> String {
    DEFAULT_CACHE_NAMESPACE.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: default_namespace(),
            dir: None,
            key_strategy: KeyStrategy::default(),
        }
    }
}

/// Sale computation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// ISO currency code amounts are entered and displayed in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "BOB".to_string()
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Human,
    /// JSON format (for log aggregation).
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directive used when `RUST_LOG` is not set (e.g. "salesdesk=debug").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: ConsoleConfig = toml::from_str("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.token_header, "x-access-token");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.namespace, "api-cache");
        assert_eq!(config.cache.key_strategy, KeyStrategy::MethodUrl);
        assert_eq!(config.sale.currency, "BOB");
        assert_eq!(config.log.format, LogFormat::Human);
    }

    #[test]
    fn test_partial_sections() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://shop.example/api"
            timeout_secs = 10

            [cache]
            key_strategy = "method-url-body"
            dir = "/var/cache/salesdesk"

            [log]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://shop.example/api");
        assert_eq!(config.api.token_header, DEFAULT_TOKEN_HEADER);
        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.cache.key_strategy, KeyStrategy::MethodUrlBody);
        assert_eq!(config.cache.dir, Some(PathBuf::from("/var/cache/salesdesk")));
        assert!(config.cache.enabled);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_json_config() {
        let config: ConsoleConfig =
            serde_json::from_str(r#"{"cache": {"enabled": false}, "sale": {"currency": "USD"}}"#)
                .unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.sale.currency, "USD");
    }
}
