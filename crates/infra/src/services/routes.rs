//! Routes resource service (REST dialect)

use std::sync::Arc;

use async_trait::async_trait;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::RoutesGateway;
use fleetline_domain::constants::CACHE_TTL_MEDIUM_SECS;
use fleetline_domain::{ApiError, Route, RouteDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;

const PATH: &str = "/routes";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteRecord {
    id: Uuid,
    name: String,
    school_id: Uuid,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stop_count: u32,
    #[serde(default)]
    distance_km: Option<f64>,
    active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutePayload<'a> {
    name: &'a str,
    school_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    stop_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
    active: bool,
}

fn map_route(record: RouteRecord) -> Route {
    Route {
        id: record.id,
        name: record.name,
        school_id: record.school_id,
        description: record.description,
        stop_count: record.stop_count,
        distance_km: record.distance_km,
        active: record.active,
    }
}

fn payload(draft: &RouteDraft) -> RoutePayload<'_> {
    RoutePayload {
        name: &draft.name,
        school_id: draft.school_id,
        description: draft.description.as_deref(),
        stop_count: draft.stop_count,
        distance_km: draft.distance_km,
        active: draft.active,
    }
}

/// Routes gateway over the shared API client.
pub struct RoutesService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> RoutesService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_MEDIUM_SECS) }
    }
}

#[async_trait]
impl<C> RoutesGateway for RoutesService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Route>, ApiError> {
        let records: Vec<RouteRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_route).collect())
    }

    async fn create(&self, draft: &RouteDraft) -> Result<Route, ApiError> {
        Ok(map_route(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &RouteDraft) -> Result<Route, ApiError> {
        Ok(map_route(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for services::routes.
    use serde_json::json;

    use super::super::testing::api_over;
    use super::*;
    use crate::http::FakeTransport;

    /// Validates wire decoding for routes.
    ///
    /// Assertions:
    /// - Confirms `schoolId` and `distanceKm` map to their domain fields.
    #[tokio::test]
    async fn test_list_maps_wire_records() {
        let fake = Arc::new(FakeTransport::new());
        fake.push_response(
            200,
            json!([{
                "id": "0191f2a0-0000-7000-8000-000000000010",
                "name": "Route 7 North",
                "schoolId": "0191f2a0-0000-7000-8000-00000000000a",
                "stopCount": 14,
                "distanceKm": 18.5,
                "active": true
            }])
            .to_string(),
        );
        let service = RoutesService::new(api_over(&fake));

        let routes = service.list().await.unwrap();
        assert_eq!(routes[0].name, "Route 7 North");
        assert_eq!(routes[0].stop_count, 14);
        assert_eq!(routes[0].distance_km, Some(18.5));
        assert_eq!(
            routes[0].school_id,
            Uuid::parse_str("0191f2a0-0000-7000-8000-00000000000a").unwrap()
        );
    }
}
