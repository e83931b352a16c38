//! Schools resource service (REST dialect)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::SchoolsGateway;
use fleetline_domain::constants::CACHE_TTL_MEDIUM_SECS;
use fleetline_domain::{ApiError, School, SchoolDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;

const PATH: &str = "/schools";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchoolRecord {
    id: Uuid,
    name: String,
    #[serde(default)]
    district: Option<String>,
    address: String,
    #[serde(default)]
    contact_email: Option<String>,
    #[serde(default)]
    contact_phone: Option<String>,
    #[serde(default)]
    student_count: u32,
    active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SchoolPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    district: Option<&'a str>,
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_phone: Option<&'a str>,
    active: bool,
}

fn map_school(record: SchoolRecord) -> School {
    School {
        id: record.id,
        name: record.name,
        district: record.district,
        address: record.address,
        contact_email: record.contact_email,
        contact_phone: record.contact_phone,
        student_count: record.student_count,
        active: record.active,
        created_at: record.created_at,
    }
}

fn payload(draft: &SchoolDraft) -> SchoolPayload<'_> {
    SchoolPayload {
        name: &draft.name,
        district: draft.district.as_deref(),
        address: &draft.address,
        contact_email: draft.contact_email.as_deref(),
        contact_phone: draft.contact_phone.as_deref(),
        active: draft.active,
    }
}

/// Schools gateway over the shared API client.
pub struct SchoolsService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> SchoolsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_MEDIUM_SECS) }
    }
}

#[async_trait]
impl<C> SchoolsGateway for SchoolsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<School>, ApiError> {
        let records: Vec<SchoolRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_school).collect())
    }

    async fn create(&self, draft: &SchoolDraft) -> Result<School, ApiError> {
        Ok(map_school(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &SchoolDraft) -> Result<School, ApiError> {
        Ok(map_school(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}
