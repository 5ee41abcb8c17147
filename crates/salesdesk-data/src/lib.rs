//! HTTP request/response model, transport and REST API client for SalesDesk.
//!
//! This crate provides:
//! - `Request` / `Response` - The request and response shapes the cache stores
//! - `Transport` - Async seam between a caller and the network
//! - `HttpTransport` - reqwest-backed network transport
//! - `ApiClient` - REST client that resolves paths and attaches the access token
//! - `TokenStore` - Persisted access token
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use salesdesk_data::{ApiClient, HttpTransport, TokenStore};
//!
//! let tokens = TokenStore::in_dir("/home/me/.local/share/salesdesk");
//! let client = ApiClient::new(HttpTransport::new()?)
//!     .with_base_url("http://localhost:4000/api")
//!     .with_tokens(Arc::new(tokens));
//!
//! let products = client.list_page("products", 1, 10).await?;
//! ```

mod client;
mod error;
mod request;
mod response;
mod token;
mod transport;

pub use client::{page_path, ApiClient};
pub use error::{FetchError, TokenError};
pub use request::Request;
pub use response::Response;
pub use token::{NoToken, StaticToken, TokenProvider, TokenStore};
pub use transport::{
    collect_headers, to_http_method, HttpTransport, Transport, SET_COOKIE_SEPARATOR,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiClient, FetchError, HttpTransport, Request, Response, Transport};
    pub use salesdesk_core::Method;
}
