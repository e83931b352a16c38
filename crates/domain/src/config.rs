//! Client configuration structures
//!
//! Connection settings for the backend API. Loading from the environment or
//! a config file lives in the infra crate; this module only defines the
//! shape, defaults, and validation.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PATH_PREFIX, DEFAULT_READ_RETRIES, HEALTH_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS,
    RETRY_BASE_DELAY_MS,
};
use crate::errors::FleetError;

/// Connection configuration for the shared API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://api.fleetline.example`. No trailing
    /// slash, no path.
    pub base_url: String,

    /// Path prefix prepended to every endpoint, e.g. `/api/v1`. Endpoints
    /// already carrying the prefix are left untouched.
    pub path_prefix: String,

    /// Per-request timeout applied by the HTTP transport.
    pub request_timeout_secs: u64,

    /// Timeout for the unauthenticated health probe.
    pub health_timeout_secs: u64,

    /// Base delay for linear retry backoff; attempt N waits N times this.
    pub retry_base_delay_ms: u64,

    /// Automatic retries for read requests. Mutations never retry.
    pub default_read_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            health_timeout_secs: HEALTH_TIMEOUT_SECS,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            default_read_retries: DEFAULT_READ_RETRIES,
        }
    }
}

impl ClientConfig {
    /// Checks the configuration for values the client cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Config`] when the base URL is not an http(s)
    /// origin, ends with a slash, or the prefix is non-empty without a
    /// leading slash.
    pub fn validate(&self) -> Result<(), FleetError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(FleetError::Config(format!(
                "base_url must be an http(s) origin, got '{}'",
                self.base_url
            )));
        }
        if self.base_url.ends_with('/') {
            return Err(FleetError::Config(
                "base_url must not end with a slash".to_string(),
            ));
        }
        if !self.path_prefix.is_empty() && !self.path_prefix.starts_with('/') {
            return Err(FleetError::Config(format!(
                "path_prefix must start with '/', got '{}'",
                self.path_prefix
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(FleetError::Config(
                "request_timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
