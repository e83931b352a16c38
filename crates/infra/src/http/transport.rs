//! Transport trait and test double

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use fleetline_domain::ApiError;
use parking_lot::Mutex;
use serde_json::Value;

use crate::api::HttpMethod;

/// A fully resolved outbound request: final URL, headers, JSON body.
///
/// Everything above this type works in endpoint paths and call options;
/// everything below it only sees this.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Per-request timeout override; `None` uses the transport default.
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None, timeout: None }
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A multipart upload request, bypassing JSON body encoding.
#[derive(Debug, Clone)]
pub struct MultipartRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub parts: Vec<UploadPart>,
    pub timeout: Option<Duration>,
}

/// What came back over the wire: status plus raw body text.
///
/// Status mapping and JSON decoding happen above the transport so the fake
/// exercises the same code paths as production.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// A 200 response carrying the given JSON value.
    pub fn json(value: &Value) -> Self {
        Self { status: 200, body: value.to_string() }
    }
}

/// The seam between the request pipeline and the network stack.
///
/// Implementations return `Ok` for any response the server produced,
/// whatever its status; `Err` is reserved for transport-level failures
/// (connect, TLS, timeout) where no response exists.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, ApiError>;

    async fn send_multipart(&self, request: MultipartRequest)
        -> Result<TransportResponse, ApiError>;
}

/// Scripted in-memory transport for tests and demo builds.
///
/// Responses are consumed FIFO; once the script is exhausted, the default
/// response (200 `{}` unless overridden) is returned. Every request is
/// recorded for assertions on call counts and shapes.
pub struct FakeTransport {
    script: Mutex<VecDeque<Result<TransportResponse, ApiError>>>,
    default_response: Mutex<TransportResponse>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(TransportResponse::new(200, "{}")),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response to hand to the next request.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.script.lock().push_back(Ok(TransportResponse::new(status, body)));
    }

    /// Queue a transport-level failure.
    pub fn push_error(&self, error: ApiError) {
        self.script.lock().push_back(Err(error));
    }

    /// Replace the response returned once the script runs out.
    pub fn set_default_response(&self, status: u16, body: impl Into<String>) {
        *self.default_response.lock() = TransportResponse::new(status, body);
    }

    /// Number of requests sent through this transport.
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Copies of every request observed, in order.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().clone()
    }

    fn next_response(&self) -> Result<TransportResponse, ApiError> {
        match self.script.lock().pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.default_response.lock().clone()),
        }
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, ApiError> {
        self.requests.lock().push(request);
        self.next_response()
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<TransportResponse, ApiError> {
        // Recorded as a bodiless POST so call counting stays uniform.
        let mut recorded = PreparedRequest::new(HttpMethod::Post, request.url);
        recorded.headers = request.headers;
        self.requests.lock().push(recorded);
        self.next_response()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for http::transport.
    use super::*;

    /// Validates `FakeTransport` scripted responses and recording.
    ///
    /// Assertions:
    /// - Confirms scripted responses are consumed in order.
    /// - Confirms the default response kicks in afterwards.
    /// - Confirms every request is recorded.
    #[tokio::test]
    async fn test_fake_transport_script() {
        let fake = FakeTransport::new();
        fake.push_response(503, "busy");
        fake.push_response(200, r#"{"ok":true}"#);

        let first = fake.send(PreparedRequest::new(HttpMethod::Get, "http://x/a")).await.unwrap();
        assert_eq!(first.status, 503);

        let second = fake.send(PreparedRequest::new(HttpMethod::Get, "http://x/a")).await.unwrap();
        assert_eq!(second.status, 200);

        let third = fake.send(PreparedRequest::new(HttpMethod::Get, "http://x/b")).await.unwrap();
        assert_eq!(third.status, 200);
        assert_eq!(third.body, "{}");

        assert_eq!(fake.calls(), 3);
        assert_eq!(fake.requests()[2].url, "http://x/b");
    }

    /// Validates `FakeTransport::push_error` surfaces transport failures.
    ///
    /// Assertions:
    /// - Confirms the scripted error is returned as-is.
    #[tokio::test]
    async fn test_fake_transport_error() {
        let fake = FakeTransport::new();
        fake.push_error(ApiError::Network("connection refused".into()));

        let result = fake.send(PreparedRequest::new(HttpMethod::Get, "http://x")).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(fake.calls(), 1);
    }
}
