//! Network transport.
//!
//! `Transport` is the seam between whoever issues a request and whatever
//! actually performs it. `HttpTransport` talks to the network through
//! reqwest; the response cache implements the same trait so it can be
//! placed in front of any transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use salesdesk_core::{Headers, Method};

use crate::{FetchError, Request, Response};

/// Something that can turn a request into a response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the complete response.
    async fn send(&self, request: &Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &Request) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport without a request timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(None)
    }

    /// Create a transport with an optional total request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response, FetchError> {
        let mut builder = self
            .client
            .request(to_http_method(request.method), request.url.as_str());

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers())?;
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status,
            bytes = body.len(),
            "network response"
        );

        Ok(Response::new(status, headers, body))
    }
}

/// Separator between folded `set-cookie` values.
pub const SET_COOKIE_SEPARATOR: &str = "\n";

/// Fold a header map into one entry per header name.
///
/// Repeated values are joined with `", "`. `set-cookie` values may contain
/// commas themselves, so they are joined with [`SET_COOKIE_SEPARATOR`].
/// A value that is not UTF-8 is an error.
pub fn collect_headers(map: &http::HeaderMap) -> Result<Headers, FetchError> {
    let mut headers = Headers::with_capacity(map.keys_len());
    for (name, value) in map {
        let value = std::str::from_utf8(value.as_bytes()).map_err(|_| {
            FetchError::ParseError(format!("Header {} is not valid UTF-8", name.as_str()))
        })?;
        let separator = if *name == http::header::SET_COOKIE {
            SET_COOKIE_SEPARATOR
        } else {
            ", "
        };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|folded| {
                folded.push_str(separator);
                folded.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    Ok(headers)
}

/// Map the console's method onto the `http` crate's method type.
pub fn to_http_method(method: Method) -> http::Method {
    match method {
        Method::Get => http::Method::GET,
        Method::Post => http::Method::POST,
        Method::Put => http::Method::PUT,
        Method::Patch => http::Method::PATCH,
        Method::Delete => http::Method::DELETE,
        Method::Head => http::Method::HEAD,
        Method::Options => http::Method::OPTIONS,
    }
}

#[cfg(test)]
mod tests {
    use http::header::{HeaderMap, HeaderValue};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one raw HTTP response on a loopback port, return its URL.
    async fn serve_once(raw: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(raw).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/products", addr)
    }

    // === Header folding ===

    #[test]
    fn test_collect_headers_folds_repeats() {
        let mut map = HeaderMap::new();
        map.append("vary", HeaderValue::from_static("accept"));
        map.append("vary", HeaderValue::from_static("origin"));
        map.append("set-cookie", HeaderValue::from_static("a=1; Path=/"));
        map.append(
            "set-cookie",
            HeaderValue::from_static("b=2; Expires=Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        map.append("content-type", HeaderValue::from_static("application/json"));

        let headers = collect_headers(&map).unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers["vary"], "accept, origin");
        assert_eq!(
            headers["set-cookie"],
            "a=1; Path=/\nb=2; Expires=Wed, 21 Oct 2026 07:28:00 GMT"
        );
        assert_eq!(headers["content-type"], "application/json");
    }

    #[test]
    fn test_collect_headers_keeps_non_ascii_utf8() {
        let mut map = HeaderMap::new();
        map.append("x-store", HeaderValue::from_bytes("Café Sucre".as_bytes()).unwrap());
        let headers = collect_headers(&map).unwrap();
        assert_eq!(headers["x-store"], "Café Sucre");
    }

    #[test]
    fn test_collect_headers_rejects_invalid_utf8() {
        let mut map = HeaderMap::new();
        map.append("x-blob", HeaderValue::from_bytes(&[0x61, 0xff, 0x62]).unwrap());
        match collect_headers(&map) {
            Err(FetchError::ParseError(message)) => assert!(message.contains("x-blob")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    // === Network ===

    #[tokio::test]
    async fn test_http_transport_keeps_repeated_headers() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\n\
set-cookie: a=1\r\n\
set-cookie: b=2\r\n\
vary: accept\r\n\
vary: origin\r\n\
content-length: 2\r\n\
connection: close\r\n\
\r\n\
ok",
        )
        .await;

        let transport = HttpTransport::with_timeout(Some(Duration::from_secs(5))).unwrap();
        let response = transport.send(&Request::get(url)).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("set-cookie"), Some("a=1\nb=2"));
        assert_eq!(response.header("vary"), Some("accept, origin"));
        assert_eq!(response.body, b"ok");
    }

    #[test]
    fn test_to_http_method() {
        assert_eq!(to_http_method(Method::Get), http::Method::GET);
        assert_eq!(to_http_method(Method::Delete), http::Method::DELETE);
        assert_eq!(to_http_method(Method::Options).as_str(), "OPTIONS");
    }

    #[tokio::test]
    async fn test_http_transport_rejects_invalid_url() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.send(&Request::get("not a url")).await;
        assert!(result.is_err());
    }
}
