//! Driver shifts service (REST dialect)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::ShiftsGateway;
use fleetline_domain::constants::CACHE_TTL_MEDIUM_SECS;
use fleetline_domain::{ApiError, Shift, ShiftDraft, ShiftStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;

const PATH: &str = "/shifts";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShiftRecord {
    id: Uuid,
    driver_id: Uuid,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    status: ShiftStatus,
    #[serde(default)]
    actual_start: Option<DateTime<Utc>>,
    #[serde(default)]
    actual_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShiftPayload {
    driver_id: Uuid,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    status: ShiftStatus,
}

fn map_shift(record: ShiftRecord) -> Shift {
    Shift {
        id: record.id,
        driver_id: record.driver_id,
        starts_at: record.starts_at,
        ends_at: record.ends_at,
        status: record.status,
        actual_start: record.actual_start,
        actual_end: record.actual_end,
    }
}

fn payload(draft: &ShiftDraft) -> ShiftPayload {
    ShiftPayload {
        driver_id: draft.driver_id,
        starts_at: draft.starts_at,
        ends_at: draft.ends_at,
        status: draft.status,
    }
}

/// Shifts gateway over the shared API client.
pub struct ShiftsService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> ShiftsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_MEDIUM_SECS) }
    }
}

#[async_trait]
impl<C> ShiftsGateway for ShiftsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Shift>, ApiError> {
        let records: Vec<ShiftRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_shift).collect())
    }

    async fn create(&self, draft: &ShiftDraft) -> Result<Shift, ApiError> {
        Ok(map_shift(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &ShiftDraft) -> Result<Shift, ApiError> {
        Ok(map_shift(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}
