//! Fleet entity types
//!
//! The records an admin dashboard works with: schools served, drivers,
//! routes, scheduled trips, enrolled students, driver/route assignments,
//! driver shifts, operational notifications, and the aggregated dashboard
//! metrics document. Wire-format records (camelCase JSON as the backend
//! emits it) live in the infra service layer; these are the domain shapes
//! the rest of the client consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_status_conversions;

// ============================================================================
// Schools
// ============================================================================

/// A school served by the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    pub student_count: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub active: bool,
}

// ============================================================================
// Drivers
// ============================================================================

/// Employment status of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    Inactive,
    Suspended,
}

impl_status_conversions!(DriverStatus {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
});

/// A driver employed by the fleet operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_expires_on: Option<NaiveDate>,
    pub status: DriverStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hired_on: Option<NaiveDate>,
}

impl Driver {
    /// Display name in "First Last" form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating or replacing a driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_expires_on: Option<NaiveDate>,
    pub status: DriverStatus,
}

// ============================================================================
// Routes
// ============================================================================

/// A recurring bus route serving one school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub school_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stop_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub active: bool,
}

/// Payload for creating or replacing a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDraft {
    pub name: String,
    pub school_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stop_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub active: bool,
}

// ============================================================================
// Trips
// ============================================================================

/// Lifecycle state of a single trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    EnRoute,
    Completed,
    Cancelled,
}

impl_status_conversions!(TripStatus {
    Scheduled => "scheduled",
    EnRoute => "en_route",
    Completed => "completed",
    Cancelled => "cancelled",
});

/// One concrete run of a route on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub route_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    pub scheduled_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: TripStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_count: Option<u32>,
}

/// Payload for scheduling or replacing a trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDraft {
    pub route_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    pub scheduled_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<DateTime<Utc>>,
    pub status: TripStatus,
}

// ============================================================================
// Students
// ============================================================================

/// A student enrolled for transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub school_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_stop: Option<String>,
    pub active: bool,
}

/// Payload for enrolling or replacing a student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub school_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_stop: Option<String>,
    #[serde(default)]
    pub active: bool,
}

// ============================================================================
// Assignments
// ============================================================================

/// A driver-to-route assignment over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub starts_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for creating or replacing an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub starts_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ============================================================================
// Shifts
// ============================================================================

/// Lifecycle state of a driver shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Planned,
    InProgress,
    Completed,
    Missed,
}

impl_status_conversions!(ShiftStatus {
    Planned => "planned",
    InProgress => "in_progress",
    Completed => "completed",
    Missed => "missed",
});

/// A planned working window for one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ShiftStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_end: Option<DateTime<Utc>>,
}

/// Payload for planning or replacing a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDraft {
    pub driver_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ShiftStatus,
}

// ============================================================================
// Notifications
// ============================================================================

/// Severity of an operational notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    Info,
    Warning,
    Critical,
}

impl_status_conversions!(NotificationSeverity {
    Info => "info",
    Warning => "warning",
    Critical => "critical",
});

/// An operational notification shown to dispatchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub severity: NotificationSeverity,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    /// Optional reference to the entity the notification is about, e.g.
    /// `trip:7f3a...`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_ref: Option<String>,
}

// ============================================================================
// Dashboard metrics
// ============================================================================

/// Aggregated operational metrics, served as a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub active_trips: u32,
    pub total_drivers: u32,
    pub total_routes: u32,
    pub total_students: u32,
    pub on_time_rate: f64,
    pub alerts_today: u32,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn driver_full_name() {
        let driver = Driver {
            id: Uuid::nil(),
            first_name: "Rosa".into(),
            last_name: "Delgado".into(),
            email: "rosa@example.com".into(),
            phone: None,
            license_number: "CDL-4411".into(),
            license_expires_on: None,
            status: DriverStatus::Active,
            hired_on: None,
        };
        assert_eq!(driver.full_name(), "Rosa Delgado");
    }

    #[test]
    fn trip_status_string_forms() {
        assert_eq!(TripStatus::EnRoute.to_string(), "en_route");
        assert_eq!(TripStatus::from_str("CANCELLED").unwrap(), TripStatus::Cancelled);
    }

    #[test]
    fn entity_serde_uses_snake_case() {
        let school = School {
            id: Uuid::nil(),
            name: "Lakeside Elementary".into(),
            district: None,
            address: "12 Shore Rd".into(),
            contact_email: None,
            contact_phone: None,
            student_count: 412,
            active: true,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&school).unwrap();
        assert!(value.get("student_count").is_some());
        assert!(value.get("district").is_none(), "None fields are omitted");
    }
}
