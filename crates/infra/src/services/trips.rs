//! Trips resource service (REST dialect)
//!
//! Trips are the most volatile collection, so reads carry the short TTL
//! class: a dispatcher watching the board should never see data more than
//! a minute old.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::TripsGateway;
use fleetline_domain::constants::CACHE_TTL_SHORT_SECS;
use fleetline_domain::{ApiError, Trip, TripDraft, TripStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;

const PATH: &str = "/trips";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripRecord {
    id: Uuid,
    route_id: Uuid,
    #[serde(default)]
    driver_id: Option<Uuid>,
    #[serde(default)]
    vehicle: Option<String>,
    scheduled_start: DateTime<Utc>,
    #[serde(default)]
    scheduled_end: Option<DateTime<Utc>>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    status: TripStatus,
    #[serde(default)]
    passenger_count: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TripPayload<'a> {
    route_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vehicle: Option<&'a str>,
    scheduled_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_end: Option<DateTime<Utc>>,
    status: TripStatus,
}

fn map_trip(record: TripRecord) -> Trip {
    Trip {
        id: record.id,
        route_id: record.route_id,
        driver_id: record.driver_id,
        vehicle: record.vehicle,
        scheduled_start: record.scheduled_start,
        scheduled_end: record.scheduled_end,
        started_at: record.started_at,
        completed_at: record.completed_at,
        status: record.status,
        passenger_count: record.passenger_count,
    }
}

fn payload(draft: &TripDraft) -> TripPayload<'_> {
    TripPayload {
        route_id: draft.route_id,
        driver_id: draft.driver_id,
        vehicle: draft.vehicle.as_deref(),
        scheduled_start: draft.scheduled_start,
        scheduled_end: draft.scheduled_end,
        status: draft.status,
    }
}

/// Trips gateway over the shared API client.
pub struct TripsService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> TripsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_SHORT_SECS) }
    }
}

#[async_trait]
impl<C> TripsGateway for TripsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Trip>, ApiError> {
        let records: Vec<TripRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_trip).collect())
    }

    async fn create(&self, draft: &TripDraft) -> Result<Trip, ApiError> {
        Ok(map_trip(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &TripDraft) -> Result<Trip, ApiError> {
        Ok(map_trip(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for services::trips.
    use std::time::Duration;

    use fleetline_common::time::MockClock;
    use fleetline_common::ResponseCache;
    use fleetline_domain::ClientConfig;
    use serde_json::json;

    use super::*;
    use crate::http::{FakeTransport, Transport};

    /// Validates trip reads use the short TTL class.
    ///
    /// Assertions:
    /// - Confirms a list 59s later is served from cache.
    /// - Confirms a list 61s after the fetch goes back to the network.
    #[tokio::test]
    async fn test_list_uses_short_ttl() {
        let fake = Arc::new(FakeTransport::new());
        fake.set_default_response(200, "[]");
        let clock = MockClock::new();
        let config =
            ClientConfig { base_url: "http://api.test".to_string(), ..Default::default() };
        let api = Arc::new(
            ApiClient::with_transport(
                &config,
                Arc::clone(&fake) as Arc<dyn Transport>,
                ResponseCache::with_clock(clock.clone()),
            )
            .unwrap(),
        );
        let service = TripsService::new(api);

        service.list().await.unwrap();
        clock.advance(Duration::from_secs(59));
        service.list().await.unwrap();
        assert_eq!(fake.calls(), 1);

        clock.advance(Duration::from_secs(2));
        service.list().await.unwrap();
        assert_eq!(fake.calls(), 2);
    }

    /// Validates wire decoding for an en-route trip.
    ///
    /// Assertions:
    /// - Confirms timestamps and the snake_case status value decode.
    #[tokio::test]
    async fn test_list_maps_wire_records() {
        let fake = Arc::new(FakeTransport::new());
        fake.push_response(
            200,
            json!([{
                "id": "0191f2a0-0000-7000-8000-000000000020",
                "routeId": "0191f2a0-0000-7000-8000-000000000010",
                "driverId": "0191f2a0-0000-7000-8000-000000000001",
                "scheduledStart": "2026-08-30T07:15:00Z",
                "startedAt": "2026-08-30T07:16:22Z",
                "status": "en_route",
                "passengerCount": 31
            }])
            .to_string(),
        );
        let service = TripsService::new(super::super::testing::api_over(&fake));

        let trips = service.list().await.unwrap();
        assert_eq!(trips[0].status, TripStatus::EnRoute);
        assert_eq!(trips[0].passenger_count, Some(31));
        assert!(trips[0].started_at.is_some());
        assert_eq!(trips[0].completed_at, None);
    }
}
