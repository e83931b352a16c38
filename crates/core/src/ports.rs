//! Port interfaces for backend resources
//!
//! These traits define the boundary between the entity store and the
//! infrastructure layer. One gateway per resource; the infra crate
//! implements them over the shared API client, tests implement them with
//! in-memory fakes.

use async_trait::async_trait;
use fleetline_domain::{
    ApiError, AppSettings, Assignment, AssignmentDraft, AuthReply, Credentials, DashboardMetrics,
    Driver, DriverDraft, Notification, Route, RouteDraft, School, SchoolDraft, Shift, ShiftDraft,
    Student, StudentDraft, Trip, TripDraft, UserAccount,
};
use uuid::Uuid;

/// Gateway for the schools resource.
#[async_trait]
pub trait SchoolsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<School>, ApiError>;
    async fn create(&self, draft: &SchoolDraft) -> Result<School, ApiError>;
    async fn update(&self, id: Uuid, draft: &SchoolDraft) -> Result<School, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the drivers resource.
#[async_trait]
pub trait DriversGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Driver>, ApiError>;
    async fn create(&self, draft: &DriverDraft) -> Result<Driver, ApiError>;
    async fn update(&self, id: Uuid, draft: &DriverDraft) -> Result<Driver, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the routes resource.
#[async_trait]
pub trait RoutesGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Route>, ApiError>;
    async fn create(&self, draft: &RouteDraft) -> Result<Route, ApiError>;
    async fn update(&self, id: Uuid, draft: &RouteDraft) -> Result<Route, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the trips resource.
#[async_trait]
pub trait TripsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Trip>, ApiError>;
    async fn create(&self, draft: &TripDraft) -> Result<Trip, ApiError>;
    async fn update(&self, id: Uuid, draft: &TripDraft) -> Result<Trip, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the students resource.
#[async_trait]
pub trait StudentsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Student>, ApiError>;
    async fn create(&self, draft: &StudentDraft) -> Result<Student, ApiError>;
    async fn update(&self, id: Uuid, draft: &StudentDraft) -> Result<Student, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the driver/route assignments resource.
#[async_trait]
pub trait AssignmentsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Assignment>, ApiError>;
    async fn create(&self, draft: &AssignmentDraft) -> Result<Assignment, ApiError>;
    async fn update(&self, id: Uuid, draft: &AssignmentDraft) -> Result<Assignment, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the driver shifts resource.
#[async_trait]
pub trait ShiftsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Shift>, ApiError>;
    async fn create(&self, draft: &ShiftDraft) -> Result<Shift, ApiError>;
    async fn update(&self, id: Uuid, draft: &ShiftDraft) -> Result<Shift, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for operational notifications.
///
/// Notifications are produced server-side; the client only lists them,
/// marks them read, and dismisses them.
#[async_trait]
pub trait NotificationsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Notification>, ApiError>;
    async fn mark_read(&self, id: Uuid) -> Result<Notification, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Gateway for the organization settings document.
#[async_trait]
pub trait SettingsGateway: Send + Sync {
    async fn get(&self) -> Result<AppSettings, ApiError>;
    async fn update(&self, settings: &AppSettings) -> Result<AppSettings, ApiError>;
}

/// Gateway for the aggregated dashboard metrics document.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    async fn get(&self) -> Result<DashboardMetrics, ApiError>;
}

/// Gateway for the authentication endpoints.
///
/// Consumed by the session manager, not the entity store. Token injection
/// and persistence stay in the session manager; this trait only speaks the
/// wire operations.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Submit credentials; may come back with a verification challenge.
    async fn login(&self, credentials: &Credentials) -> Result<AuthReply, ApiError>;

    /// Complete a verification challenge with the emailed code.
    async fn verify_code(&self, email: &str, code: &str) -> Result<AuthReply, ApiError>;

    /// Exchange a refresh token for a fresh grant.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthReply, ApiError>;

    /// Fetch the account behind the current access token.
    async fn me(&self) -> Result<UserAccount, ApiError>;

    /// Tell the backend the session is over. Best effort.
    async fn logout(&self) -> Result<(), ApiError>;
}
