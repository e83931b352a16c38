//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client layer.

// Cache TTL classes (seconds). Volatile data gets the short class, reference
// data the medium class, configuration the long class.
pub const CACHE_TTL_SHORT_SECS: u64 = 60;
pub const CACHE_TTL_MEDIUM_SECS: u64 = 300;
pub const CACHE_TTL_LONG_SECS: u64 = 900;

// Retry configuration
pub const DEFAULT_READ_RETRIES: u32 = 1;
pub const DEFAULT_MUTATION_RETRIES: u32 = 0;
pub const RETRY_BASE_DELAY_MS: u64 = 300;

// Request timing
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

// Endpoint composition
pub const DEFAULT_PATH_PREFIX: &str = "/api/v1";
pub const HEALTH_PATH: &str = "/health";

// Durable key/value storage keys (shared by session manager and settings)
pub const STORAGE_ACCESS_TOKEN: &str = "fleetline.auth.access_token";
pub const STORAGE_REFRESH_TOKEN: &str = "fleetline.auth.refresh_token";
pub const STORAGE_USER: &str = "fleetline.auth.user";
pub const STORAGE_SETTINGS: &str = "fleetline.settings";
pub const STORAGE_ENDPOINTS: &str = "fleetline.endpoints";

// Token refresh scheduling: refresh this many seconds before expiry, and
// never schedule a wait shorter than the floor.
pub const REFRESH_LEAD_SECS: u64 = 120;
pub const REFRESH_FLOOR_SECS: u64 = 30;
