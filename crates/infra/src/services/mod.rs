//! Backend resource services
//!
//! One service per resource, each implementing its `fleetline-core` gateway
//! trait over the shared [`ApiClient`]. Two wire dialects are spoken here:
//! verb-per-resource REST for most resources, and the uniform-POST action
//! envelope for notifications. Wire records (camelCase, as the backend
//! emits them) stay private to each service; everything above the gateway
//! traits sees only domain types.
//!
//! Reads carry the resource's TTL class as their cache max-age. Mutations
//! invalidate the resource's own cached reads plus the dashboard document,
//! since the dashboard aggregates across every resource.

mod assignments;
mod auth;
mod dashboard;
mod drivers;
mod notifications;
mod routes;
mod schools;
mod settings;
mod shifts;
mod students;
mod trips;

pub use assignments::AssignmentsService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use drivers::DriversService;
pub use notifications::{ActorSource, NotificationsService};
pub use routes::RoutesService;
pub use schools::SchoolsService;
pub use settings::SettingsService;
pub use shifts::ShiftsService;
pub use students::StudentsService;
pub use trips::TripsService;

use std::sync::Arc;
use std::time::Duration;

use fleetline_common::time::Clock;
use fleetline_domain::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{ApiClient, CallOptions};

pub(crate) const DASHBOARD_PATH: &str = "/dashboard";

/// Shared plumbing for the REST-dialect collection resources.
///
/// Generic over the wire record, so each service keeps its own record
/// types and mapping while the verb/caching/invalidation choreography
/// lives in one place.
pub(crate) struct RestCollection<C>
where
    C: Clock + Clone,
{
    api: Arc<ApiClient<C>>,
    path: &'static str,
    max_age: Duration,
}

impl<C> RestCollection<C>
where
    C: Clock + Clone + 'static,
{
    pub(crate) fn new(api: Arc<ApiClient<C>>, path: &'static str, ttl_secs: u64) -> Self {
        Self { api, path, max_age: Duration::from_secs(ttl_secs) }
    }

    pub(crate) fn api(&self) -> &ApiClient<C> {
        &self.api
    }

    pub(crate) async fn list<W: DeserializeOwned>(&self) -> Result<Vec<W>, ApiError> {
        self.api.get(self.path, CallOptions::new().max_age(self.max_age)).await
    }

    pub(crate) async fn create<W, B>(&self, body: &B) -> Result<W, ApiError>
    where
        W: DeserializeOwned,
        B: Serialize,
    {
        let record = self.api.post(self.path, body, CallOptions::new()).await?;
        self.invalidate();
        Ok(record)
    }

    pub(crate) async fn update<W, B>(&self, id: Uuid, body: &B) -> Result<W, ApiError>
    where
        W: DeserializeOwned,
        B: Serialize,
    {
        let endpoint = format!("{}/{id}", self.path);
        let record = self.api.put(&endpoint, body, CallOptions::new()).await?;
        self.invalidate();
        Ok(record)
    }

    pub(crate) async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let endpoint = format!("{}/{id}", self.path);
        let _: serde_json::Value = self.api.delete(&endpoint, CallOptions::new()).await?;
        self.invalidate();
        Ok(())
    }

    /// Flush this resource's cached reads and the dashboard aggregate.
    pub(crate) fn invalidate(&self) {
        self.api.invalidate(Some(self.path));
        self.api.invalidate(Some(DASHBOARD_PATH));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared scaffolding for service unit tests.
    use fleetline_common::time::MockClock;
    use fleetline_common::ResponseCache;
    use fleetline_domain::ClientConfig;

    use super::*;
    use crate::http::{FakeTransport, Transport};

    pub(crate) fn api_over(fake: &Arc<FakeTransport>) -> Arc<ApiClient<MockClock>> {
        let config = ClientConfig {
            base_url: "http://api.test".to_string(),
            retry_base_delay_ms: 1,
            ..Default::default()
        };
        Arc::new(
            ApiClient::with_transport(
                &config,
                Arc::clone(fake) as Arc<dyn Transport>,
                ResponseCache::with_clock(MockClock::new()),
            )
            .unwrap(),
        )
    }
}
