//! Organization settings service (REST dialect, single document)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::SettingsGateway;
use fleetline_domain::constants::CACHE_TTL_LONG_SECS;
use fleetline_domain::{ApiError, AppSettings, DistanceUnit};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DASHBOARD_PATH;
use crate::api::{ApiClient, CallOptions};

const PATH: &str = "/settings";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRecord {
    org_name: String,
    timezone: String,
    distance_unit: DistanceUnit,
    notify_on_delay: bool,
    notify_on_incident: bool,
    dashboard_refresh_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_school_id: Option<Uuid>,
}

fn map_settings(record: SettingsRecord) -> AppSettings {
    AppSettings {
        org_name: record.org_name,
        timezone: record.timezone,
        distance_unit: record.distance_unit,
        notify_on_delay: record.notify_on_delay,
        notify_on_incident: record.notify_on_incident,
        dashboard_refresh_secs: record.dashboard_refresh_secs,
        default_school_id: record.default_school_id,
    }
}

fn payload(settings: &AppSettings) -> SettingsRecord {
    SettingsRecord {
        org_name: settings.org_name.clone(),
        timezone: settings.timezone.clone(),
        distance_unit: settings.distance_unit,
        notify_on_delay: settings.notify_on_delay,
        notify_on_incident: settings.notify_on_incident,
        dashboard_refresh_secs: settings.dashboard_refresh_secs,
        default_school_id: settings.default_school_id,
    }
}

/// Settings gateway over the shared API client.
///
/// The settings document changes rarely, so reads carry the long TTL class.
pub struct SettingsService<C = SystemClock>
where
    C: Clock + Clone,
{
    api: Arc<ApiClient<C>>,
}

impl<C> SettingsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C> SettingsGateway for SettingsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn get(&self) -> Result<AppSettings, ApiError> {
        let options = CallOptions::new().max_age(Duration::from_secs(CACHE_TTL_LONG_SECS));
        let record: SettingsRecord = self.api.get(PATH, options).await?;
        Ok(map_settings(record))
    }

    async fn update(&self, settings: &AppSettings) -> Result<AppSettings, ApiError> {
        let record: SettingsRecord =
            self.api.put(PATH, &payload(settings), CallOptions::new()).await?;
        self.api.invalidate(Some(PATH));
        self.api.invalidate(Some(DASHBOARD_PATH));
        Ok(map_settings(record))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for services::settings.
    use serde_json::json;

    use super::super::testing::api_over;
    use super::*;
    use crate::http::FakeTransport;

    fn settings_json() -> serde_json::Value {
        json!({
            "orgName": "Northside Transit",
            "timezone": "America/Chicago",
            "distanceUnit": "miles",
            "notifyOnDelay": true,
            "notifyOnIncident": false,
            "dashboardRefreshSecs": 30
        })
    }

    /// Validates the settings document decodes and is cached.
    ///
    /// Assertions:
    /// - Confirms the camelCase document maps into `AppSettings`.
    /// - Confirms a repeated get costs one request.
    #[tokio::test]
    async fn test_get_maps_and_caches() {
        let fake = Arc::new(FakeTransport::new());
        fake.set_default_response(200, settings_json().to_string());
        let service = SettingsService::new(api_over(&fake));

        let settings = service.get().await.unwrap();
        assert_eq!(settings.org_name, "Northside Transit");
        assert_eq!(settings.distance_unit, DistanceUnit::Miles);
        assert!(!settings.notify_on_incident);
        assert_eq!(settings.default_school_id, None);

        service.get().await.unwrap();
        assert_eq!(fake.calls(), 1);
    }

    /// Validates an update writes through and flushes the cached document.
    ///
    /// Assertions:
    /// - Confirms the PUT body is the camelCase wire shape.
    /// - Confirms the next get refetches.
    #[tokio::test]
    async fn test_update_invalidates_document() {
        let fake = Arc::new(FakeTransport::new());
        fake.set_default_response(200, settings_json().to_string());
        let service = SettingsService::new(api_over(&fake));

        service.get().await.unwrap();

        let settings =
            AppSettings { org_name: "Northside Transit".into(), ..AppSettings::default() };
        service.update(&settings).await.unwrap();

        let body = fake.requests()[1].body.clone().unwrap();
        assert_eq!(body["orgName"], "Northside Transit");
        assert_eq!(body["distanceUnit"], "kilometers");
        assert!(body.get("org_name").is_none());

        service.get().await.unwrap();
        assert_eq!(fake.calls(), 3);
    }
}
