//! Notifications service (uniform-POST action envelope dialect)
//!
//! The notifications backend exposes one POST endpoint; every operation is
//! an [`ActionEnvelope`] carrying the acting user's identity and an action
//! discriminator. List actions are semantically reads, so they opt into
//! caching and the read retry budget despite going out as POSTs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::NotificationsGateway;
use fleetline_domain::constants::{CACHE_TTL_SHORT_SECS, DEFAULT_READ_RETRIES};
use fleetline_domain::{
    ActionEnvelope, ActionKind, ActorContext, ApiError, Notification, NotificationSeverity,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::DASHBOARD_PATH;
use crate::api::{ApiClient, CallOptions};

const PATH: &str = "/notifications";
const RESOURCE: &str = "notifications";

/// Supplies the acting user's identity for enveloped requests.
///
/// Implemented over the session manager in the composition layer; tests
/// implement it with a fixed identity.
pub trait ActorSource: Send + Sync {
    fn current_actor(&self) -> Option<ActorContext>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRecord {
    id: Uuid,
    title: String,
    body: String,
    severity: NotificationSeverity,
    created_at: DateTime<Utc>,
    read: bool,
    #[serde(default)]
    entity_ref: Option<String>,
}

fn map_notification(record: NotificationRecord) -> Notification {
    Notification {
        id: record.id,
        title: record.title,
        body: record.body,
        severity: record.severity,
        created_at: record.created_at,
        read: record.read,
        entity_ref: record.entity_ref,
    }
}

/// Notifications gateway over the shared API client.
pub struct NotificationsService<C = SystemClock>
where
    C: Clock + Clone,
{
    api: Arc<ApiClient<C>>,
    actors: Arc<dyn ActorSource>,
}

impl<C> NotificationsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>, actors: Arc<dyn ActorSource>) -> Self {
        Self { api, actors }
    }

    fn envelope(&self, action: ActionKind) -> Result<ActionEnvelope, ApiError> {
        let actor = self.actors.current_actor().ok_or_else(|| {
            ApiError::Validation("notifications require an authenticated user".to_string())
        })?;
        Ok(ActionEnvelope::new(actor, action, RESOURCE))
    }

    fn invalidate(&self) {
        self.api.invalidate(Some(PATH));
        self.api.invalidate(Some(DASHBOARD_PATH));
    }
}

#[async_trait]
impl<C> NotificationsGateway for NotificationsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        let envelope = self.envelope(ActionKind::List)?;
        let options = CallOptions::new()
            .cached()
            .max_age(Duration::from_secs(CACHE_TTL_SHORT_SECS))
            .retries(DEFAULT_READ_RETRIES);
        let records: Vec<NotificationRecord> = self.api.post(PATH, &envelope, options).await?;
        Ok(records.into_iter().map(map_notification).collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification, ApiError> {
        let envelope = self
            .envelope(ActionKind::Update)?
            .with_resource_id(id.to_string())
            .with_payload(json!({"read": true}));
        let record: NotificationRecord =
            self.api.post(PATH, &envelope, CallOptions::new()).await?;
        self.invalidate();
        Ok(map_notification(record))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let envelope = self.envelope(ActionKind::Delete)?.with_resource_id(id.to_string());
        let _: serde_json::Value = self.api.post(PATH, &envelope, CallOptions::new()).await?;
        self.invalidate();
        Ok(())
    }
}
