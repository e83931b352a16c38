//! Request descriptors: methods and per-call options

use std::time::Duration;

/// HTTP verbs the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether this verb is a GET-equivalent read. Only reads are cached
    /// and only reads get automatic retries by default.
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Per-call overrides for caching, retry, and request shape.
///
/// The zero value means "client defaults": reads cached with the medium
/// TTL, read retry budget from config, mutations uncached and unretried.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Explicitly enable/disable caching for this call. `Some(true)` also
    /// opts non-GET calls in, which enveloped list actions rely on.
    pub cache: Option<bool>,
    /// Max age accepted from the cache for this call.
    pub cache_max_age: Option<Duration>,
    /// Explicit retry budget, overriding the per-verb default.
    pub retry_count: Option<u32>,
    /// Query parameters, appended to the URL and folded into the cache key.
    pub params: Vec<(String, String)>,
    /// Extra headers appended after the standard ones.
    pub headers: Vec<(String, String)>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the cache entirely for this call.
    #[must_use]
    pub fn no_cache(mut self) -> Self {
        self.cache = Some(false);
        self
    }

    /// Force caching on, even for a non-GET call.
    #[must_use]
    pub fn cached(mut self) -> Self {
        self.cache = Some(true);
        self
    }

    /// Accept cached responses up to `max_age` old.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.cache_max_age = Some(max_age);
        self
    }

    /// Set an explicit retry budget.
    #[must_use]
    pub fn retries(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
