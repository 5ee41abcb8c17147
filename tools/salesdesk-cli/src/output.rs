//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use salesdesk_cache::{CacheStatsSnapshot, CacheStatus};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print raw text to stdout.
    pub fn raw(&self, text: &str) {
        if self.json {
            return;
        }
        println!("{}", text);
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Coloured badge for the path a request took through the cache.
pub fn cache_badge(status: CacheStatus) -> String {
    let label = status.to_string();
    match status {
        CacheStatus::Hit => style(label).green().to_string(),
        CacheStatus::Miss => style(label).yellow().to_string(),
        CacheStatus::Bypass => style(label).dim().to_string(),
        CacheStatus::Error => style(label).red().to_string(),
    }
}

/// Coloured HTTP status, e.g. `200 OK`.
pub fn http_status(status: u16, reason: Option<&str>) -> String {
    let text = match reason {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    };
    match status {
        200..=299 => style(text).green().to_string(),
        300..=399 => style(text).cyan().to_string(),
        400..=499 => style(text).yellow().to_string(),
        _ => style(text).red().to_string(),
    }
}

/// Format bytes as human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// One-line summary of request cache counters.
pub fn cache_counters(stats: &CacheStatsSnapshot) -> String {
    let ratio = match stats.hit_ratio() {
        Some(ratio) => format!("{:.0}%", ratio * 100.0),
        None => "n/a".to_string(),
    };
    format!(
        "hits {}, misses {}, bypasses {}, network failures {}, storage errors {}, hit ratio {}",
        stats.hits, stats.misses, stats.bypasses, stats.network_failures, stats.storage_errors, ratio
    )
}

/// Shorten a cache key for tables.
pub fn short_key(key: &str) -> &str {
    key.get(..12).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_short_key() {
        assert_eq!(short_key("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_key("abc"), "abc");
    }

    #[test]
    fn test_badges_contain_labels() {
        assert!(cache_badge(CacheStatus::Hit).contains("HIT"));
        assert!(http_status(404, Some("Not Found")).contains("404 Not Found"));
        assert!(http_status(500, None).contains("500"));
    }

    #[test]
    fn test_cache_counters() {
        assert!(cache_counters(&CacheStatsSnapshot::default()).ends_with("hit ratio n/a"));

        let stats = CacheStatsSnapshot {
            hits: 3,
            misses: 1,
            storage_errors: 2,
            ..Default::default()
        };
        assert_eq!(
            cache_counters(&stats),
            "hits 3, misses 1, bypasses 0, network failures 0, storage errors 2, hit ratio 75%"
        );
    }
}
