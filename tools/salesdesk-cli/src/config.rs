//! Configuration file loading and saving.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use salesdesk_core::ConsoleConfig;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["salesdesk.toml", ".salesdesk.toml", "salesdesk.json"];

/// Whether `path` names a JSON config file.
pub fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Load config from a TOML or JSON file (chosen by extension).
pub fn load(path: &Path) -> Result<ConsoleConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

/// Save config to a TOML or JSON file (chosen by extension).
pub fn save(config: &ConsoleConfig, path: &Path) -> Result<()> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

/// Find the nearest config file walking up from `start`.
pub fn find(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Generate a commented default salesdesk.toml.
pub fn generate_default_config() -> String {
    r#"# SalesDesk console configuration

[api]
base_url = "http://localhost:4000/api"
token_header = "x-access-token"
# timeout_secs = 30

[cache]
enabled = true
namespace = "api-cache"
# dir = "~/.local/share/salesdesk/cache"
# "method-url" or "method-url-body"
key_strategy = "method-url"

[sale]
currency = "BOB"

[log]
# "human" or "json"
format = "human"
# filter = "salesdesk=debug"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use salesdesk_core::{KeyStrategy, LogFormat};

    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: ConsoleConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_save_and_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ConsoleConfig::default();
        config.cache.key_strategy = KeyStrategy::MethodUrlBody;
        config.log.format = LogFormat::Json;

        for name in ["salesdesk.toml", "salesdesk.json"] {
            let path = dir.path().join(name);
            save(&config, &path).unwrap();
            assert_eq!(load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_load_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salesdesk.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
        assert!(load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_find_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".salesdesk.toml"), "").unwrap();

        assert_eq!(find(&nested), Some(dir.path().join(".salesdesk.toml")));
    }

    #[test]
    fn test_find_prefers_first_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("salesdesk.json"), "{}").unwrap();
        std::fs::write(dir.path().join("salesdesk.toml"), "").unwrap();

        assert_eq!(find(dir.path()), Some(dir.path().join("salesdesk.toml")));
    }
}
