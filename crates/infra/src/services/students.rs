//! Students resource service (REST dialect)
//!
//! Besides the standard CRUD surface, students support a bulk roster
//! import: a CSV upload that bypasses the JSON request pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::StudentsGateway;
use fleetline_domain::constants::CACHE_TTL_MEDIUM_SECS;
use fleetline_domain::{ApiError, Student, StudentDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;
use crate::http::UploadPart;

const PATH: &str = "/students";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRecord {
    id: Uuid,
    first_name: String,
    last_name: String,
    school_id: Uuid,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    route_id: Option<Uuid>,
    #[serde(default)]
    guardian_name: Option<String>,
    #[serde(default)]
    guardian_phone: Option<String>,
    #[serde(default)]
    pickup_stop: Option<String>,
    active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StudentPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    school_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    guardian_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    guardian_phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pickup_stop: Option<&'a str>,
    active: bool,
}

fn map_student(record: StudentRecord) -> Student {
    Student {
        id: record.id,
        first_name: record.first_name,
        last_name: record.last_name,
        school_id: record.school_id,
        grade: record.grade,
        route_id: record.route_id,
        guardian_name: record.guardian_name,
        guardian_phone: record.guardian_phone,
        pickup_stop: record.pickup_stop,
        active: record.active,
    }
}

fn payload(draft: &StudentDraft) -> StudentPayload<'_> {
    StudentPayload {
        first_name: &draft.first_name,
        last_name: &draft.last_name,
        school_id: draft.school_id,
        grade: draft.grade.as_deref(),
        route_id: draft.route_id,
        guardian_name: draft.guardian_name.as_deref(),
        guardian_phone: draft.guardian_phone.as_deref(),
        pickup_stop: draft.pickup_stop.as_deref(),
        active: draft.active,
    }
}

/// Students gateway over the shared API client.
pub struct StudentsService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> StudentsService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_MEDIUM_SECS) }
    }

    /// Bulk-import a student roster from a CSV file.
    ///
    /// Returns the created records. Cached student reads are flushed like
    /// any other mutation.
    ///
    /// # Errors
    /// Returns the propagated [`ApiError`].
    pub async fn import_roster(
        &self,
        file_name: &str,
        csv_bytes: Vec<u8>,
    ) -> Result<Vec<Student>, ApiError> {
        let part = UploadPart {
            name: "roster".to_string(),
            file_name: file_name.to_string(),
            content_type: "text/csv".to_string(),
            bytes: csv_bytes,
        };
        let records: Vec<StudentRecord> =
            self.rest.api().upload("/students/import", vec![part]).await?;
        self.rest.invalidate();
        Ok(records.into_iter().map(map_student).collect())
    }
}

#[async_trait]
impl<C> StudentsGateway for StudentsService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Student>, ApiError> {
        let records: Vec<StudentRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_student).collect())
    }

    async fn create(&self, draft: &StudentDraft) -> Result<Student, ApiError> {
        Ok(map_student(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &StudentDraft) -> Result<Student, ApiError> {
        Ok(map_student(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}
