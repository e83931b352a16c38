//! Application context - dependency injection container

use std::sync::Arc;

use fleetline_common::storage::KeyValueStore;
use fleetline_common::time::SystemClock;
use fleetline_core::{AuthGateway, FleetGateways, FleetStore};
use fleetline_domain::constants::STORAGE_SETTINGS;
use fleetline_domain::{ActorContext, ApiError, AppSettings, ClientConfig, FleetError};
use fleetline_infra::services::{
    ActorSource, AssignmentsService, AuthService, DashboardService, DriversService,
    NotificationsService, RoutesService, SchoolsService, SettingsService, ShiftsService,
    StudentsService, TripsService,
};
use fleetline_infra::{ApiClient, SessionManager, Transport};
use tracing::info;

use crate::environments::EnvironmentRegistry;

/// Supplies the logged-in user as the actor for enveloped requests.
struct SessionActors {
    session: Arc<SessionManager>,
}

impl ActorSource for SessionActors {
    fn current_actor(&self) -> Option<ActorContext> {
        self.session.current_user().map(|user| ActorContext {
            actor_id: user.id,
            email: user.email,
            role: user.role.to_string(),
        })
    }
}

/// Application context - holds every service and its dependencies.
///
/// One instance per process. Construction wires cache, coordinator, and
/// transport into a single [`ApiClient`], hangs the session manager and all
/// gateway services off it, and fronts the gateways with one [`FleetStore`].
pub struct FleetContext {
    config: ClientConfig,
    api: Arc<ApiClient>,
    session: Arc<SessionManager>,
    store: Arc<FleetStore>,
    students: Arc<StudentsService>,
    environments: EnvironmentRegistry,
    storage: Arc<dyn KeyValueStore>,
}

impl FleetContext {
    /// Build the full context over the production HTTP transport.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid configuration.
    pub fn create(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(&config)?);
        Ok(Self::wire(config, api, storage))
    }

    /// Build the context over an explicit transport. Demo and test builds
    /// swap the whole transport here instead of branching per method.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid configuration.
    pub fn create_with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::with_transport(
            &config,
            transport,
            fleetline_common::ResponseCache::new(),
        )?);
        Ok(Self::wire(config, api, storage))
    }

    fn wire(config: ClientConfig, api: Arc<ApiClient>, storage: Arc<dyn KeyValueStore>) -> Self {
        let auth = Arc::new(AuthService::new(Arc::clone(&api)));
        let session = SessionManager::new(
            Arc::clone(&api),
            auth as Arc<dyn AuthGateway>,
            Arc::clone(&storage),
        );
        let actors = Arc::new(SessionActors { session: Arc::clone(&session) });

        let students = Arc::new(StudentsService::new(Arc::clone(&api)));
        let gateways = FleetGateways {
            schools: Arc::new(SchoolsService::new(Arc::clone(&api))),
            drivers: Arc::new(DriversService::new(Arc::clone(&api))),
            routes: Arc::new(RoutesService::new(Arc::clone(&api))),
            trips: Arc::new(TripsService::new(Arc::clone(&api))),
            students: Arc::clone(&students) as _,
            assignments: Arc::new(AssignmentsService::new(Arc::clone(&api))),
            shifts: Arc::new(ShiftsService::new(Arc::clone(&api))),
            notifications: Arc::new(NotificationsService::new(Arc::clone(&api), actors)),
            settings: Arc::new(SettingsService::new(Arc::clone(&api))),
            dashboard: Arc::new(DashboardService::new(Arc::clone(&api))),
        };
        let store = Arc::new(FleetStore::new(gateways, Arc::new(SystemClock)));
        let environments =
            EnvironmentRegistry::new(Arc::clone(&api), Arc::clone(&storage));

        info!(base_url = %config.base_url, "fleet context wired");
        Self { config, api, session, store, students, environments, storage }
    }

    /// The configuration the context was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared API client.
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// The session manager.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The entity store the UI reads from and mutates through.
    pub fn store(&self) -> &Arc<FleetStore> {
        &self.store
    }

    /// The students service, exposed directly for the roster upload, which
    /// has no entity-store counterpart.
    pub fn students(&self) -> &Arc<StudentsService> {
        &self.students
    }

    /// Named backend environments.
    pub fn environments(&self) -> &EnvironmentRegistry {
        &self.environments
    }

    /// Probe the backend's health endpoint.
    pub async fn health(&self) -> bool {
        self.api.health().await
    }

    /// Persist the application settings blob for offline startup.
    ///
    /// # Errors
    /// Returns [`FleetError::Storage`] if the blob cannot be written.
    pub async fn remember_settings(&self, settings: &AppSettings) -> Result<(), FleetError> {
        let json = serde_json::to_string(settings)?;
        self.storage
            .set(STORAGE_SETTINGS, &json)
            .await
            .map_err(|err| FleetError::Storage(err.to_string()))
    }

    /// The last settings blob persisted via
    /// [`FleetContext::remember_settings`], if any.
    ///
    /// # Errors
    /// Returns [`FleetError::Storage`] if the backend cannot be read, or
    /// [`FleetError::Serialization`] for an unreadable blob.
    pub async fn recall_settings(&self) -> Result<Option<AppSettings>, FleetError> {
        let raw = self
            .storage
            .get(STORAGE_SETTINGS)
            .await
            .map_err(|err| FleetError::Storage(err.to_string()))?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Stop background work (the scheduled token refresh). Call once before
    /// the embedding application exits.
    pub fn shutdown(&self) {
        self.session.shutdown();
        info!("fleet context shut down");
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the context wiring, over the fake transport.
    use fleetline_common::storage::MemoryStore;
    use fleetline_core::FetchOutcome;
    use fleetline_domain::DistanceUnit;
    use fleetline_infra::FakeTransport;

    use super::*;

    fn context(fake: &Arc<FakeTransport>) -> FleetContext {
        let config = ClientConfig {
            base_url: "http://api.test".to_string(),
            retry_base_delay_ms: 1,
            ..Default::default()
        };
        FleetContext::create_with_transport(
            config,
            Arc::clone(fake) as Arc<dyn Transport>,
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
    }

    /// Validates the store and session share one API client.
    ///
    /// Assertions:
    /// - Confirms a store fetch goes through the injected transport.
    /// - Confirms anonymous enveloped calls are refused before the network.
    #[tokio::test]
    async fn test_wiring_shares_one_client() {
        let fake = Arc::new(FakeTransport::new());
        fake.set_default_response(200, "[]");
        let context = context(&fake);

        let outcome = context.store().fetch_drivers(false).await;
        assert_eq!(outcome, FetchOutcome::Fetched);
        assert_eq!(fake.calls(), 1);
        assert_eq!(fake.requests()[0].url, "http://api.test/api/v1/drivers");

        // No session yet, so the notifications envelope has no actor.
        let outcome = context.store().fetch_notifications(false).await;
        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(fake.calls(), 1, "anonymous enveloped call never left");
    }

    /// Validates settings blobs survive a context rebuild.
    ///
    /// Assertions:
    /// - Confirms recall returns what remember stored, through a second
    ///   context over the same storage.
    #[tokio::test]
    async fn test_settings_blob_round_trip() {
        let storage = Arc::new(MemoryStore::new());
        let config =
            ClientConfig { base_url: "http://api.test".to_string(), ..Default::default() };
        let first = FleetContext::create_with_transport(
            config.clone(),
            Arc::new(FakeTransport::new()) as Arc<dyn Transport>,
            Arc::clone(&storage) as Arc<dyn KeyValueStore>,
        )
        .unwrap();

        assert_eq!(first.recall_settings().await.unwrap(), None);
        let settings = AppSettings {
            org_name: "Northside Transit".into(),
            distance_unit: DistanceUnit::Miles,
            ..AppSettings::default()
        };
        first.remember_settings(&settings).await.unwrap();

        let second = FleetContext::create_with_transport(
            config,
            Arc::new(FakeTransport::new()) as Arc<dyn Transport>,
            Arc::clone(&storage) as Arc<dyn KeyValueStore>,
        )
        .unwrap();
        let recalled = second.recall_settings().await.unwrap();
        assert_eq!(recalled.map(|s| s.org_name), Some("Northside Transit".into()));
    }
}
