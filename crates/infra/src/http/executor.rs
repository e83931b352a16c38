//! Request execution: reqwest transport and the retrying decoder
//!
//! [`HttpExecutor`] is the production [`Transport`]; it owns the reqwest
//! client and nothing else. [`RetryingExecutor`] layers status mapping,
//! JSON decoding, and the linear-backoff retry loop over any transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fleetline_common::retry::RetryPolicy;
use fleetline_domain::ApiError;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::transport::{MultipartRequest, PreparedRequest, Transport, TransportResponse};

/// Reqwest-backed transport.
#[derive(Clone)]
pub struct HttpExecutor {
    client: ReqwestClient,
}

impl HttpExecutor {
    /// Build the executor with the given default per-request timeout.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the underlying client cannot be
    /// constructed.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpExecutor {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, ApiError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(method = %request.method, url = %request.url, "sending HTTP request");
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(format!("request to {} failed: {err}", request.url)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(format!("failed to read response body: {err}")))?;

        debug!(status, url = %request.url, "received HTTP response");
        Ok(TransportResponse { status, body })
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<TransportResponse, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for part in request.parts {
            let piece = reqwest::multipart::Part::bytes(part.bytes)
                .file_name(part.file_name)
                .mime_str(&part.content_type)
                .map_err(|err| ApiError::Validation(format!("invalid content type: {err}")))?;
            form = form.part(part.name, piece);
        }

        let mut builder = self.client.post(&request.url).multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(url = %request.url, "sending multipart upload");
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(format!("upload to {} failed: {err}", request.url)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(format!("failed to read response body: {err}")))?;
        Ok(TransportResponse { status, body })
    }
}

/// Transport wrapper adding retry, status mapping, and JSON decoding.
///
/// Retries are linear backoff (`base_delay × attempt`) and only fire for
/// retryable failures: transport errors and 5xx responses. The caller
/// supplies the budget per call, so reads and mutations get different
/// defaults without branching here.
#[derive(Clone)]
pub struct RetryingExecutor {
    transport: Arc<dyn Transport>,
    base_delay: Duration,
}

impl RetryingExecutor {
    pub fn new(transport: Arc<dyn Transport>, base_delay: Duration) -> Self {
        Self { transport, base_delay }
    }

    /// The wrapped transport, for paths that bypass retry (uploads).
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// A policy with the given retry budget and this executor's base delay.
    pub fn policy(&self, retries: u32) -> RetryPolicy {
        RetryPolicy::new(retries, self.base_delay)
    }

    /// Execute a request, retrying within the policy's budget.
    ///
    /// # Errors
    /// Propagates the final [`ApiError`] once the budget is exhausted, or
    /// immediately for non-retryable failures.
    pub async fn execute(
        &self,
        request: PreparedRequest,
        policy: RetryPolicy,
    ) -> Result<Value, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            let outcome = match self.transport.send(request.clone()).await {
                Ok(response) => decode_response(&response),
                Err(err) => Err(err),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) if err.should_retry() && policy.allows(attempt + 1) => {
                    attempt += 1;
                    let delay = policy.delay_for(attempt);
                    warn!(
                        url = %request.url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying failed request"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Map a wire response into a parsed body or a typed error.
pub(crate) fn decode_response(response: &TransportResponse) -> Result<Value, ApiError> {
    let status = response.status;
    if (200..300).contains(&status) {
        // 204/205 carry no body by spec; empty 2xx bodies parse as null.
        if status == 204 || status == 205 || response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&response.body)
            .map_err(|err| ApiError::Decode(format!("invalid JSON in response: {err}")));
    }
    Err(ApiError::from_status(status, error_message(response)))
}

/// Best-effort extraction of the server's error message.
///
/// Prefers a `message` or `error` string field in a JSON error payload,
/// falls back to the raw body, then to the status's canonical reason.
fn error_message(response: &TransportResponse) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&response.body) {
        for field in ["message", "error"] {
            if let Some(Value::String(text)) = map.get(field) {
                return text.clone();
            }
        }
    }
    if !response.body.trim().is_empty() {
        return response.body.trim().to_string();
    }
    StatusCode::from_u16(response.status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}
