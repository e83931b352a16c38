//! Driver/route assignments service (REST dialect)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::AssignmentsGateway;
use fleetline_domain::constants::CACHE_TTL_MEDIUM_SECS;
use fleetline_domain::{ApiError, Assignment, AssignmentDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;

const PATH: &str = "/assignments";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentRecord {
    id: Uuid,
    driver_id: Uuid,
    route_id: Uuid,
    starts_on: NaiveDate,
    #[serde(default)]
    ends_on: Option<NaiveDate>,
    active: bool,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentPayload<'a> {
    driver_id: Uuid,
    route_id: Uuid,
    starts_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    ends_on: Option<NaiveDate>,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

fn map_assignment(record: AssignmentRecord) -> Assignment {
    Assignment {
        id: record.id,
        driver_id: record.driver_id,
        route_id: record.route_id,
        starts_on: record.starts_on,
        ends_on: record.ends_on,
        active: record.active,
        notes: record.notes,
    }
}

fn payload(draft: &AssignmentDraft) -> AssignmentPayload<'_> {
    AssignmentPayload {
        driver_id: draft.driver_id,
        route_id: draft.route_id,
        starts_on: draft.starts_on,
        ends_on: draft.ends_on,
        active: draft.active,
        notes: draft.notes.as_deref(),
    }
}

/// Assignments gateway over the shared API client.
pub struct AssignmentsService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> AssignmentsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_MEDIUM_SECS) }
    }
}

#[async_trait]
impl<C> AssignmentsGateway for AssignmentsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Assignment>, ApiError> {
        let records: Vec<AssignmentRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_assignment).collect())
    }

    async fn create(&self, draft: &AssignmentDraft) -> Result<Assignment, ApiError> {
        Ok(map_assignment(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &AssignmentDraft) -> Result<Assignment, ApiError> {
        Ok(map_assignment(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}
