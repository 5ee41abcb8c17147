//! REST API client for the console backend.

use std::sync::Arc;

use salesdesk_core::{ApiConfig, Method, DEFAULT_BASE_URL, DEFAULT_TOKEN_HEADER};
use serde::Serialize;

use crate::token::{NoToken, TokenProvider};
use crate::{FetchError, Request, Response, Transport};

/// Client for the console's REST backend.
///
/// Joins relative paths onto the base URL and attaches the access token
/// header before handing the request to its transport. Put a response cache
/// in as the transport to get offline reads.
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
    token_header: String,
    tokens: Arc<dyn TokenProvider>,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client for the default backend without a token.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            tokens: Arc::new(NoToken),
        }
    }

    /// Create a client from the `[api]` configuration section.
    pub fn from_config(transport: T, config: &ApiConfig) -> Self {
        Self::new(transport)
            .with_base_url(config.base_url.clone())
            .with_token_header(config.token_header.clone())
    }

    /// Set the base URL relative paths are joined onto.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the header the token is sent in.
    pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }

    /// Set where the access token comes from.
    pub fn with_tokens(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a path against the base URL. Absolute URLs pass unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build a request for `path` with the access token attached.
    pub fn request(&self, method: Method, path: &str) -> Request {
        let request = Request::new(method, self.url(path)).accept("application/json");
        match self.tokens.token() {
            Some(token) => request.header(self.token_header.clone(), token),
            None => request,
        }
    }

    /// Send a request through the transport.
    pub async fn send(&self, request: Request) -> Result<Response, FetchError> {
        tracing::debug!(method = %request.method, url = %request.url, "api request");
        self.transport.send(&request).await
    }

    /// GET a resource.
    pub async fn get(&self, path: &str) -> Result<Response, FetchError> {
        self.send(self.request(Method::Get, path)).await
    }

    /// POST a JSON body.
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, FetchError> {
        self.send(self.request(Method::Post, path).json(body)?).await
    }

    /// PUT a JSON body.
    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, FetchError> {
        self.send(self.request(Method::Put, path).json(body)?).await
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<Response, FetchError> {
        self.send(self.request(Method::Delete, path)).await
    }

    /// GET one page of a paginated collection (`/<resource>?page=N&limit=M`).
    pub async fn list_page(
        &self,
        resource: &str,
        page: u32,
        limit: u32,
    ) -> Result<Response, FetchError> {
        self.get(&page_path(resource, page, limit)).await
    }
}

/// Path of one page of a paginated collection.
pub fn page_path(resource: &str, page: u32, limit: u32) -> String {
    format!(
        "/{}?page={}&limit={}",
        resource.trim_matches('/'),
        page,
        limit
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use salesdesk_core::Headers;

    use super::*;
    use crate::token::StaticToken;

    #[derive(Default)]
    struct RecordingTransport {
        seen: Mutex<Vec<Request>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: &Request) -> Result<Response, FetchError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(Response::new(200, Headers::new(), b"[]".to_vec()))
        }
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(RecordingTransport::default())
            .with_base_url("http://localhost:4000/api/");
        assert_eq!(client.url("/products"), "http://localhost:4000/api/products");
        assert_eq!(client.url("sales/7"), "http://localhost:4000/api/sales/7");
        assert_eq!(client.url("https://other.example/x"), "https://other.example/x");
    }

    #[test]
    fn test_page_path() {
        assert_eq!(page_path("products", 2, 10), "/products?page=2&limit=10");
        assert_eq!(page_path("/sales/", 1, 5), "/sales?page=1&limit=5");
    }

    #[tokio::test]
    async fn test_token_header_attached() {
        let client = ApiClient::new(RecordingTransport::default())
            .with_tokens(Arc::new(StaticToken("secret".into())));

        client.get("/clients").await.unwrap();

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::Get);
        assert_eq!(seen[0].url, "http://localhost:4000/api/clients");
        assert_eq!(seen[0].header_value("x-access-token"), Some("secret"));
    }

    #[tokio::test]
    async fn test_no_token_header_without_token() {
        let client = ApiClient::new(RecordingTransport::default());
        client.delete("/users/3").await.unwrap();

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Delete);
        assert_eq!(seen[0].header_value("x-access-token"), None);
    }

    #[tokio::test]
    async fn test_post_json_and_custom_header() {
        let config = ApiConfig {
            base_url: "http://api.test".into(),
            token_header: "authorization".into(),
            timeout_secs: None,
        };
        let client = ApiClient::from_config(RecordingTransport::default(), &config)
            .with_tokens(Arc::new(StaticToken("t".into())));

        client
            .post_json("/sales", &serde_json::json!({"totalPaid": 20}))
            .await
            .unwrap();

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://api.test/sales");
        assert_eq!(seen[0].header_value("Authorization"), Some("t"));
        assert_eq!(seen[0].body_bytes(), br#"{"totalPaid":20}"#);
    }

    #[tokio::test]
    async fn test_list_page() {
        let client = ApiClient::new(RecordingTransport::default());
        client.list_page("products", 1, 10).await.unwrap();

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(
            seen[0].url,
            "http://localhost:4000/api/products?page=1&limit=10"
        );
    }
}
