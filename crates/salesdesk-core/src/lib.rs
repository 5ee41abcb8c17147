//! Core types shared by the SalesDesk console crates.
//!
//! This crate provides the fundamental types:
//! - `Method` - HTTP method understood by the transport and the cache
//! - `RequestId` - Identifier used to correlate log lines of one request
//! - `ConsoleConfig` - Configuration model for the API client, cache and CLI

mod config;
mod context;

pub use config::*;
pub use context::*;
