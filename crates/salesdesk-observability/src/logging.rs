//! Tracing subscriber setup.

use salesdesk_core::{LogConfig, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "salesdesk=info,warn";

/// Filter used when verbose output is requested.
pub const VERBOSE_FILTER: &str = "salesdesk=debug,info";

/// Errors from installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    /// The filter directive did not parse.
    #[error("invalid log filter {directive:?}: {message}")]
    InvalidFilter { directive: String, message: String },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Pick the filter directive: `RUST_LOG` first, then the configured filter,
/// then the default.
pub fn filter_directive(env: Option<&str>, configured: Option<&str>) -> String {
    env.filter(|s| !s.trim().is_empty())
        .or(configured)
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Parse a filter directive.
pub fn build_filter(directive: &str) -> Result<EnvFilter, ObservabilityError> {
    EnvFilter::try_new(directive).map_err(|e| ObservabilityError::InvalidFilter {
        directive: directive.to_string(),
        message: e.to_string(),
    })
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing(config: &LogConfig) -> Result<(), ObservabilityError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(env.as_deref(), config.filter.as_deref());
    let env_filter = build_filter(&directive)?;

    let json = config.format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| ObservabilityError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(filter_directive(Some("debug"), Some("salesdesk=trace")), "debug");
        assert_eq!(filter_directive(None, Some("salesdesk=trace")), "salesdesk=trace");
        assert_eq!(filter_directive(Some("  "), None), DEFAULT_FILTER);
        assert_eq!(filter_directive(None, None), DEFAULT_FILTER);
    }

    #[test]
    fn test_build_filter() {
        assert!(build_filter(DEFAULT_FILTER).is_ok());
        assert!(build_filter(VERBOSE_FILTER).is_ok());
        assert!(matches!(
            build_filter("salesdesk=loud"),
            Err(ObservabilityError::InvalidFilter { .. })
        ));
    }
}
