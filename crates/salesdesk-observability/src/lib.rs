//! Logging setup for SalesDesk binaries.
//!
//! This crate provides:
//! - `init_tracing` - Installs a `tracing-subscriber` registry (human or JSON output)
//! - `command_span` - Per-command span carrying a `RequestId`

mod logging;
mod span;

pub use logging::*;
pub use span::*;

// Re-export from salesdesk-core for convenience
pub use salesdesk_core::{LogConfig, LogFormat, RequestId};
