//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use salesdesk_cache::{FileStore, RequestCache};
use salesdesk_commerce::Currency;
use salesdesk_core::ConsoleConfig;
use salesdesk_data::{ApiClient, HttpTransport, TokenStore};

use crate::config;
use crate::output::Output;

/// Request cache used by the CLI.
pub type CliCache = RequestCache<FileStore, HttpTransport>;

/// Execution context for CLI commands.
pub struct Context {
    /// Console configuration.
    pub config: ConsoleConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => config::find(&cwd),
        };
        let config = match &config_path {
            Some(path) => config::load(path)?,
            None => ConsoleConfig::default(),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding the token and the default cache.
    pub fn data_dir(&self) -> PathBuf {
        match std::env::var_os("SALESDESK_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs_path().join("salesdesk"),
        }
    }

    /// Root directory of the response cache.
    pub fn cache_dir(&self) -> PathBuf {
        match &self.config.cache.dir {
            Some(dir) => expand_home(dir),
            None => self.data_dir().join("cache"),
        }
    }

    /// Persisted access token.
    pub fn token_store(&self) -> TokenStore {
        TokenStore::in_dir(self.data_dir())
    }

    /// Open the configured cache store.
    pub fn open_store(&self) -> Result<FileStore> {
        let dir = self.cache_dir();
        FileStore::open(&dir, &self.config.cache.namespace)
            .with_context(|| format!("Failed to open cache at {}", dir.display()))
    }

    /// Request cache in front of the network transport.
    pub fn request_cache(&self) -> Result<CliCache> {
        let timeout = self.config.api.timeout_secs.map(Duration::from_secs);
        let transport =
            HttpTransport::with_timeout(timeout).context("Failed to create HTTP client")?;
        Ok(RequestCache::from_config(
            self.open_store()?,
            transport,
            &self.config.cache,
        ))
    }

    /// API client whose requests all go through the cache.
    pub fn api_client(&self) -> Result<ApiClient<CliCache>> {
        Ok(ApiClient::from_config(self.request_cache()?, &self.config.api)
            .with_tokens(Arc::new(self.token_store())))
    }

    /// Currency sale amounts are expressed in.
    pub fn currency(&self) -> Result<Currency> {
        self.config
            .sale
            .currency
            .parse()
            .with_context(|| format!("Invalid sale.currency {:?}", self.config.sale.currency))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = expand_home(Path::new(path));
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let cwd = Path::new("/work");
        assert_eq!(resolve(cwd, "catalog.json"), PathBuf::from("/work/catalog.json"));
        assert_eq!(resolve(cwd, "/etc/products.json"), PathBuf::from("/etc/products.json"));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("/var/cache")), PathBuf::from("/var/cache"));
        assert_eq!(expand_home(Path::new("cache")), PathBuf::from("cache"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home(Path::new("~/.cache/sd")),
                PathBuf::from(home).join(".cache/sd")
            );
        }
    }
}
