//! The unified API client
//!
//! One instance per application. Verb helpers serialize bodies, resolve
//! endpoint paths against the configured origin and prefix, attach the
//! bearer token, and hand the prepared request to the coordinator, which
//! owns caching and deduplication. Defaults follow the read/mutation split:
//! reads are cached (medium TTL) and retried once, mutations are neither.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fleetline_common::cache::CacheStats;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_common::{CacheKey, ResponseCache};
use fleetline_domain::constants::{
    CACHE_TTL_MEDIUM_SECS, DEFAULT_MUTATION_RETRIES, HEALTH_PATH,
};
use fleetline_domain::{ApiError, ClientConfig};
use futures::FutureExt;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::coordinator::RequestCoordinator;
use super::interceptor::{InterceptorChain, InterceptorHandle, RequestTransform, ResponseTransform};
use super::options::{CallOptions, HttpMethod};
use crate::http::{
    decode_response, HttpExecutor, MultipartRequest, PreparedRequest, RetryingExecutor, Transport,
    UploadPart,
};

/// Unified HTTP client for the backend API.
///
/// Thread-safe behind `Arc`; all interior state takes short locks. The
/// clock parameter flows into the response cache so tests can steer
/// freshness without sleeping.
pub struct ApiClient<C = SystemClock>
where
    C: Clock + Clone,
{
    executor: RetryingExecutor,
    coordinator: RequestCoordinator<C>,
    token: RwLock<Option<String>>,
    base_url: RwLock<String>,
    path_prefix: RwLock<String>,
    request_interceptors: InterceptorChain<RequestTransform>,
    response_interceptors: InterceptorChain<ResponseTransform>,
    default_read_retries: u32,
    default_max_age: Duration,
    health_timeout: Duration,
}

impl ApiClient<SystemClock> {
    /// Production client over the reqwest transport and system clock.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid configuration or if the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport =
            Arc::new(HttpExecutor::new(Duration::from_secs(config.request_timeout_secs))?);
        Self::with_transport(config, transport, ResponseCache::new())
    }
}

impl<C> ApiClient<C>
where
    C: Clock + Clone + 'static,
{
    /// Client over an explicit transport and cache. This is the seam tests
    /// and demo builds use to swap in [`crate::http::FakeTransport`].
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid configuration.
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        cache: ResponseCache<C>,
    ) -> Result<Self, ApiError> {
        config.validate().map_err(|err| ApiError::Config(err.to_string()))?;
        let executor =
            RetryingExecutor::new(transport, Duration::from_millis(config.retry_base_delay_ms));
        Ok(Self {
            executor,
            coordinator: RequestCoordinator::new(cache),
            token: RwLock::new(None),
            base_url: RwLock::new(config.base_url.clone()),
            path_prefix: RwLock::new(config.path_prefix.clone()),
            request_interceptors: InterceptorChain::new(),
            response_interceptors: InterceptorChain::new(),
            default_read_retries: config.default_read_retries,
            default_max_age: Duration::from_secs(CACHE_TTL_MEDIUM_SECS),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    /// Install the bearer token attached to subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Drop the bearer token; subsequent requests go out unauthenticated.
    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    /// Whether a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    /// Repoint the client at a different origin and prefix at runtime.
    /// Cached responses from the previous environment are dropped.
    pub fn set_environment(&self, base_url: impl Into<String>, path_prefix: impl Into<String>) {
        let base_url = base_url.into();
        debug!(base_url = %base_url, "switching API environment");
        *self.base_url.write() = base_url;
        *self.path_prefix.write() = path_prefix.into();
        self.coordinator.cache().clear();
    }

    /// The origin requests currently resolve against.
    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    /// Register an async request interceptor, run before dispatch in
    /// registration order.
    pub fn on_request<F, Fut>(&self, interceptor: F) -> InterceptorHandle
    where
        F: Fn(PreparedRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PreparedRequest, ApiError>> + Send + 'static,
    {
        let transform: RequestTransform = Arc::new(move |request| interceptor(request).boxed());
        self.request_interceptors.register(transform)
    }

    /// Register an async response interceptor, run after decoding in
    /// registration order. The transformed body is what gets cached.
    pub fn on_response<F, Fut>(&self, interceptor: F) -> InterceptorHandle
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        let transform: ResponseTransform = Arc::new(move |value| interceptor(value).boxed());
        self.response_interceptors.register(transform)
    }

    /// Drop cached responses whose key contains `pattern`, or all of them
    /// for `None`. Returns the number of entries removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let removed = self.coordinator.cache().invalidate(pattern);
        debug!(pattern = pattern.unwrap_or("*"), removed, "invalidated cached responses");
        removed
    }

    /// Hit/miss counters for the response cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.coordinator.cache().stats()
    }

    /// GET the endpoint and decode the body as `T`.
    ///
    /// # Errors
    /// Returns the propagated [`ApiError`] or [`ApiError::Decode`] if the
    /// body does not match `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: CallOptions,
    ) -> Result<T, ApiError> {
        let value = self.request_value(HttpMethod::Get, endpoint, None, options).await?;
        decode_value(&value)
    }

    /// POST a JSON body and decode the response as `T`.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] if the body cannot be serialized,
    /// otherwise the propagated request error.
    pub async fn post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        options: CallOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let value = self.request_value(HttpMethod::Post, endpoint, Some(body), options).await?;
        decode_value(&value)
    }

    /// PUT a JSON body and decode the response as `T`.
    ///
    /// # Errors
    /// Same contract as [`ApiClient::post`].
    pub async fn put<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        options: CallOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let value = self.request_value(HttpMethod::Put, endpoint, Some(body), options).await?;
        decode_value(&value)
    }

    /// PATCH a JSON body and decode the response as `T`.
    ///
    /// # Errors
    /// Same contract as [`ApiClient::post`].
    pub async fn patch<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        options: CallOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let value = self.request_value(HttpMethod::Patch, endpoint, Some(body), options).await?;
        decode_value(&value)
    }

    /// DELETE the endpoint. Most delete endpoints answer 204, which decodes
    /// as JSON null, so `T` is usually `()`.
    ///
    /// # Errors
    /// Returns the propagated [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: CallOptions,
    ) -> Result<T, ApiError> {
        let value = self.request_value(HttpMethod::Delete, endpoint, None, options).await?;
        decode_value(&value)
    }

    /// Multipart file upload. Bypasses the cache, deduplication, and retry
    /// entirely; uploads are not idempotent and never cacheable.
    ///
    /// # Errors
    /// Returns the propagated [`ApiError`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        parts: Vec<UploadPart>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint_url(endpoint);
        let request =
            MultipartRequest { url, headers: self.auth_headers(), parts, timeout: None };
        let response = self.executor.transport().send_multipart(request).await?;
        let value = decode_response(&response)?;
        decode_value(&value)
    }

    /// Probe the backend's health endpoint.
    ///
    /// Unauthenticated, uncached, unretried, and bounded by the shorter
    /// health timeout. Any response outside 2xx, or no response at all,
    /// reads as unhealthy.
    pub async fn health(&self) -> bool {
        let url = format!("{}{HEALTH_PATH}", self.base_url());
        let mut request = PreparedRequest::new(HttpMethod::Get, url);
        request.timeout = Some(self.health_timeout);
        match self.executor.transport().send(request).await {
            Ok(response) => (200..300).contains(&response.status),
            Err(err) => {
                warn!(error = %err, "health probe failed");
                false
            }
        }
    }

    /// Resolve an endpoint path against the configured origin and prefix.
    ///
    /// Absolute http(s) endpoints pass through untouched; paths already
    /// carrying the prefix are not prefixed twice.
    fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let base = self.base_url.read();
        let prefix = self.path_prefix.read();
        if prefix.is_empty() || endpoint.starts_with(prefix.as_str()) {
            format!("{base}{endpoint}")
        } else {
            format!("{base}{prefix}{endpoint}")
        }
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        match self.token.read().as_deref() {
            Some(token) => vec![("Authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }

    async fn request_value(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Value>,
        options: CallOptions,
    ) -> Result<Arc<Value>, ApiError> {
        let bare_url = self.endpoint_url(endpoint);
        let url = append_params(&bare_url, &options.params)?;

        // Explicit Some(true) lets enveloped POST reads opt into caching.
        let cacheable = options.cache.unwrap_or_else(|| method.is_read());
        let max_age = options.cache_max_age.unwrap_or(self.default_max_age);
        let retries = options.retry_count.unwrap_or(if method.is_read() {
            self.default_read_retries
        } else {
            DEFAULT_MUTATION_RETRIES
        });
        // The key carries params separately so permuted call sites collide.
        let key = CacheKey::new(method.as_str(), &bare_url, &options.params, body.as_ref());

        let mut request = PreparedRequest::new(method, url);
        request.headers = self.auth_headers();
        request.headers.extend(options.headers);
        request.body = body;

        let request_chain = self.request_interceptors.snapshot();
        let response_chain = self.response_interceptors.snapshot();
        let executor = self.executor.clone();
        let policy = executor.policy(retries);
        let work = async move {
            let mut request = request;
            for transform in &request_chain {
                request = transform(request).await?;
            }
            let mut value = executor.execute(request, policy).await?;
            for transform in &response_chain {
                value = transform(value).await?;
            }
            Ok(value)
        }
        .boxed();

        self.coordinator.dispatch(&key, cacheable, max_age, work).await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|err| ApiError::Validation(format!("unserializable request body: {err}")))
}

fn decode_value<T: DeserializeOwned>(value: &Value) -> Result<T, ApiError> {
    serde_json::from_value(value.clone())
        .map_err(|err| ApiError::Decode(format!("unexpected response shape: {err}")))
}

/// Append query parameters to a resolved URL.
fn append_params(url: &str, params: &[(String, String)]) -> Result<String, ApiError> {
    if params.is_empty() {
        return Ok(url.to_string());
    }
    let mut parsed =
        Url::parse(url).map_err(|err| ApiError::Validation(format!("invalid URL '{url}': {err}")))?;
    parsed
        .query_pairs_mut()
        .extend_pairs(params.iter().map(|(name, value)| (name.as_str(), value.as_str())));
    Ok(parsed.to_string())
}
