//! Named backend environments
//!
//! Operators point the client at staging or production without rebuilding.
//! Profiles live as one JSON blob in the key/value store; activating one
//! repoints the shared API client at runtime, which also drops every cached
//! response from the previous backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use fleetline_common::storage::KeyValueStore;
use fleetline_domain::constants::STORAGE_ENDPOINTS;
use fleetline_domain::{ClientConfig, EndpointProfile, FleetError, Result};
use fleetline_infra::ApiClient;
use tracing::info;

/// Persisted registry of [`EndpointProfile`]s.
pub struct EnvironmentRegistry {
    api: Arc<ApiClient>,
    storage: Arc<dyn KeyValueStore>,
}

impl EnvironmentRegistry {
    pub(crate) fn new(api: Arc<ApiClient>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { api, storage }
    }

    /// All saved profiles, ordered by name.
    ///
    /// # Errors
    /// Returns [`FleetError::Storage`] if the backing store cannot be read
    /// or [`FleetError::Serialization`] for an unreadable blob.
    pub async fn list(&self) -> Result<Vec<EndpointProfile>> {
        Ok(self.load().await?.into_values().collect())
    }

    /// Save a profile, replacing any existing profile with the same name.
    ///
    /// The profile's URL and prefix are validated with the same rules as
    /// [`ClientConfig`].
    ///
    /// # Errors
    /// Returns [`FleetError::InvalidInput`] for an empty name,
    /// [`FleetError::Config`] for an invalid URL or prefix, or a storage
    /// error if persisting fails.
    pub async fn save(&self, profile: EndpointProfile) -> Result<()> {
        if profile.name.trim().is_empty() {
            return Err(FleetError::InvalidInput("profile name is empty".to_string()));
        }
        ClientConfig {
            base_url: profile.base_url.clone(),
            path_prefix: profile.path_prefix.clone(),
            ..ClientConfig::default()
        }
        .validate()?;

        let mut profiles = self.load().await?;
        profiles.insert(profile.name.clone(), profile);
        self.persist(&profiles).await
    }

    /// Remove a profile by name. Removing an absent profile is not an error.
    ///
    /// # Errors
    /// Returns a storage error if persisting fails.
    pub async fn remove(&self, name: &str) -> Result<()> {
        let mut profiles = self.load().await?;
        if profiles.remove(name).is_some() {
            self.persist(&profiles).await?;
        }
        Ok(())
    }

    /// Repoint the API client at a saved profile.
    ///
    /// # Errors
    /// Returns [`FleetError::InvalidInput`] for an unknown profile name.
    pub async fn activate(&self, name: &str) -> Result<()> {
        let profiles = self.load().await?;
        let profile = profiles
            .get(name)
            .ok_or_else(|| FleetError::InvalidInput(format!("unknown environment '{name}'")))?;
        info!(environment = name, base_url = %profile.base_url, "switching backend environment");
        self.api.set_environment(&profile.base_url, &profile.path_prefix);
        Ok(())
    }

    async fn load(&self) -> Result<BTreeMap<String, EndpointProfile>> {
        let raw = self
            .storage
            .get(STORAGE_ENDPOINTS)
            .await
            .map_err(|err| FleetError::Storage(err.to_string()))?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(BTreeMap::new()),
        }
    }

    async fn persist(&self, profiles: &BTreeMap<String, EndpointProfile>) -> Result<()> {
        let json = serde_json::to_string(profiles)?;
        self.storage
            .set(STORAGE_ENDPOINTS, &json)
            .await
            .map_err(|err| FleetError::Storage(err.to_string()))
    }
}
