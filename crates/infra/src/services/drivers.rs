//! Drivers resource service (REST dialect)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::DriversGateway;
use fleetline_domain::constants::CACHE_TTL_MEDIUM_SECS;
use fleetline_domain::{ApiError, Driver, DriverDraft, DriverStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RestCollection;
use crate::api::ApiClient;

const PATH: &str = "/drivers";

/// Driver record as the backend emits it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriverRecord {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    license_number: String,
    #[serde(default)]
    license_expires_on: Option<NaiveDate>,
    status: DriverStatus,
    #[serde(default)]
    hired_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DriverPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    license_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_expires_on: Option<NaiveDate>,
    status: DriverStatus,
}

fn map_driver(record: DriverRecord) -> Driver {
    Driver {
        id: record.id,
        first_name: record.first_name,
        last_name: record.last_name,
        email: record.email,
        phone: record.phone,
        license_number: record.license_number,
        license_expires_on: record.license_expires_on,
        status: record.status,
        hired_on: record.hired_on,
    }
}

fn payload(draft: &DriverDraft) -> DriverPayload<'_> {
    DriverPayload {
        first_name: &draft.first_name,
        last_name: &draft.last_name,
        email: &draft.email,
        phone: draft.phone.as_deref(),
        license_number: &draft.license_number,
        license_expires_on: draft.license_expires_on,
        status: draft.status,
    }
}

/// Drivers gateway over the shared API client.
pub struct DriversService<C = SystemClock>
where
    C: Clock + Clone,
{
    rest: RestCollection<C>,
}

impl<C> DriversService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { rest: RestCollection::new(api, PATH, CACHE_TTL_MEDIUM_SECS) }
    }
}

#[async_trait]
impl<C> DriversGateway for DriversService<C>
where
    C: Clock + Clone + 'static,
{
    async fn list(&self) -> Result<Vec<Driver>, ApiError> {
        let records: Vec<DriverRecord> = self.rest.list().await?;
        Ok(records.into_iter().map(map_driver).collect())
    }

    async fn create(&self, draft: &DriverDraft) -> Result<Driver, ApiError> {
        Ok(map_driver(self.rest.create(&payload(draft)).await?))
    }

    async fn update(&self, id: Uuid, draft: &DriverDraft) -> Result<Driver, ApiError> {
        Ok(map_driver(self.rest.update(id, &payload(draft)).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.rest.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for services::drivers.
    use serde_json::json;

    use super::super::testing::api_over;
    use super::*;
    use crate::api::{CallOptions, HttpMethod};
    use crate::http::FakeTransport;

    fn driver_json(id: &str, first: &str) -> serde_json::Value {
        json!({
            "id": id,
            "firstName": first,
            "lastName": "Delgado",
            "email": "rosa@example.com",
            "licenseNumber": "CDL-4411",
            "licenseExpiresOn": "2027-03-01",
            "status": "active"
        })
    }

    fn draft() -> DriverDraft {
        DriverDraft {
            first_name: "Rosa".into(),
            last_name: "Delgado".into(),
            email: "rosa@example.com".into(),
            phone: None,
            license_number: "CDL-4411".into(),
            license_expires_on: None,
            status: DriverStatus::Active,
        }
    }

    /// Validates the camelCase wire record maps into the domain shape.
    ///
    /// Assertions:
    /// - Confirms field mapping including the optional expiry date.
    /// - Confirms absent optional fields come through as `None`.
    #[tokio::test]
    async fn test_list_maps_wire_records() {
        let fake = Arc::new(FakeTransport::new());
        fake.push_response(
            200,
            json!([driver_json("0191f2a0-0000-7000-8000-000000000001", "Rosa")]).to_string(),
        );
        let service = DriversService::new(api_over(&fake));

        let drivers = service.list().await.unwrap();
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].full_name(), "Rosa Delgado");
        assert_eq!(drivers[0].license_number, "CDL-4411");
        assert_eq!(
            drivers[0].license_expires_on,
            Some(NaiveDate::from_ymd_opt(2027, 3, 1).unwrap())
        );
        assert_eq!(drivers[0].phone, None);
    }

    /// Validates list reads are cached and mutations flush them.
    ///
    /// Assertions:
    /// - Confirms repeated lists cost one request.
    /// - Confirms a create flushes both the drivers list and the dashboard.
    #[tokio::test]
    async fn test_create_invalidates_cached_reads() {
        let fake = Arc::new(FakeTransport::new());
        fake.set_default_response(200, "[]");
        let api = api_over(&fake);
        let service = DriversService::new(Arc::clone(&api));

        // Warm both caches.
        service.list().await.unwrap();
        service.list().await.unwrap();
        let _: serde_json::Value =
            api.get(super::super::DASHBOARD_PATH, CallOptions::new()).await.unwrap();
        assert_eq!(fake.calls(), 2);

        fake.push_response(
            200,
            driver_json("0191f2a0-0000-7000-8000-000000000002", "Rosa").to_string(),
        );
        service.create(&draft()).await.unwrap();

        // Both reads go back to the network.
        service.list().await.unwrap();
        let _: serde_json::Value =
            api.get(super::super::DASHBOARD_PATH, CallOptions::new()).await.unwrap();
        assert_eq!(fake.calls(), 5);
    }

    /// Validates verb and endpoint shapes for update and delete.
    ///
    /// Assertions:
    /// - Confirms `PUT /api/v1/drivers/{id}` with a camelCase body.
    /// - Confirms `DELETE /api/v1/drivers/{id}`.
    #[tokio::test]
    async fn test_update_and_delete_request_shape() {
        let fake = Arc::new(FakeTransport::new());
        let id = Uuid::parse_str("0191f2a0-0000-7000-8000-000000000003").unwrap();
        fake.push_response(200, driver_json(&id.to_string(), "Rosa").to_string());
        fake.push_response(204, "");
        let service = DriversService::new(api_over(&fake));

        service.update(id, &draft()).await.unwrap();
        service.delete(id).await.unwrap();

        let requests = fake.requests();
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].url, format!("http://api.test/api/v1/drivers/{id}"));
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["firstName"], "Rosa");
        assert_eq!(body["licenseNumber"], "CDL-4411");
        assert!(body.get("first_name").is_none());

        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert_eq!(requests[1].url, format!("http://api.test/api/v1/drivers/{id}"));
    }

    /// Validates server rejections surface with the backend's message.
    ///
    /// Assertions:
    /// - Confirms a 422 create propagates the message verbatim.
    #[tokio::test]
    async fn test_rejected_create_carries_message() {
        let fake = Arc::new(FakeTransport::new());
        fake.push_response(422, r#"{"message":"license number already in use"}"#);
        let service = DriversService::new(api_over(&fake));

        let err = service.create(&draft()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "request rejected (422): license number already in use"
        );
    }
}
