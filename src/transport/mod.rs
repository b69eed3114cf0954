//! HTTP transport abstraction
//!
//! The token engine never talks to the network directly. It hands an
//! [`HttpRequest`] to an [`HttpTransport`] and interprets the returned
//! [`HttpResponse`]. [`ReqwestTransport`] is the default implementation;
//! tests and alternative HTTP stacks provide their own.

pub mod reqwest_client;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

pub use reqwest_client::ReqwestTransport;

/// Opaque transport failure, surfaced to callers unchanged
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Outgoing HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method
    pub method: Method,
    /// Target URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Body as UTF-8 text, replacing invalid sequences
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP response returned by a transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with no headers
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Transport trait for executing HTTP requests
///
/// Implementations own timeout and cancellation policy. The token engine
/// performs no retries and does not reinterpret transport failures.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a request and return the response
    ///
    /// # Errors
    /// Returns error if the request could not be completed (connection,
    /// timeout, ...). Non-success status codes are not errors at this layer.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}
