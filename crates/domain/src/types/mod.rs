//! Domain types and models

pub mod entities;
pub mod envelope;
pub mod session;
pub mod settings;

pub use entities::{
    Assignment, AssignmentDraft, DashboardMetrics, Driver, DriverDraft, DriverStatus,
    Notification, NotificationSeverity, Route, RouteDraft, School, SchoolDraft, Shift, ShiftDraft,
    ShiftStatus, Student, StudentDraft, Trip, TripDraft, TripStatus,
};
pub use envelope::{ActionEnvelope, ActionKind, ActorContext};
pub use session::{
    AuthReply, Credentials, LoginOutcome, StoredSession, TokenGrant, UserAccount, UserRole,
};
pub use settings::{AppSettings, DistanceUnit, EndpointProfile};
