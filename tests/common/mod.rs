//! Shared test helpers: an in-memory transport that records every request

#![allow(dead_code)]

use async_trait::async_trait;
use oauth2_grants::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const CLIENT_ID: &str = "s6BhdRkqt3";
pub const CLIENT_SECRET: &str = "gX1fBat3bV";
pub const TOKEN_URL: &str = "http://127.0.0.1/api";

pub const TOKEN_BODY: &str = r#"{
  "access_token":"2YotnFZFEjr1zCsicMWpAA",
  "token_type":"example",
  "expires_in":3600,
  "example_parameter":"example_value"
}"#;

pub const ERROR_BODY: &str = r#"{
  "error":"invalid_request",
  "error_description":"Error message",
  "error_uri":"http://foo.bar"
}"#;

/// Transport replaying canned responses in order
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(status: StatusCode, body: &str) -> Self {
        let transport = Self::new();
        transport.push_response(status, body);
        transport
    }

    pub fn push_response(&self, status: StatusCode, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> HttpRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "no canned response left".into())
    }
}

/// Transport that always fails, like an unreachable host
#[derive(Debug, Default)]
pub struct FailingTransport;

#[async_trait]
impl HttpTransport for FailingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )))
    }
}

pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}
