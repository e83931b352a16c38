//! Application settings and endpoint profiles

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_status_conversions;

/// Unit used when displaying route distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Kilometers,
    Miles,
}

impl_status_conversions!(DistanceUnit {
    Kilometers => "kilometers",
    Miles => "miles",
});

/// Organization-wide dashboard settings, served as a single document with
/// the long cache TTL class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub org_name: String,
    pub timezone: String,
    pub distance_unit: DistanceUnit,
    pub notify_on_delay: bool,
    pub notify_on_incident: bool,
    /// Dashboard auto-refresh interval in seconds; 0 disables it.
    pub dashboard_refresh_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_school_id: Option<Uuid>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            org_name: String::new(),
            timezone: "UTC".to_string(),
            distance_unit: DistanceUnit::Kilometers,
            notify_on_delay: true,
            notify_on_incident: true,
            dashboard_refresh_secs: 60,
            default_school_id: None,
        }
    }
}

/// A named backend environment the client can be pointed at.
///
/// Profiles are persisted locally so operators can switch between staging
/// and production backends without rebuilding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointProfile {
    pub name: String,
    pub base_url: String,
    pub path_prefix: String,
}
