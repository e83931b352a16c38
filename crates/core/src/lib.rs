//! # Fleetline Core
//!
//! Entity synchronization logic behind ports - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Gateway port traits, one per backend resource
//! - The staleness-aware entity store (fetch-or-skip, optimistic merge)
//!
//! ## Architecture Principles
//! - Only depends on `fleetline-common` and `fleetline-domain`
//! - No HTTP, no persistence code
//! - All external collaborators reached via traits
//! - Pure, testable synchronization logic

pub mod ports;
pub mod store;

// Re-export specific items to avoid ambiguity
pub use ports::{
    AssignmentsGateway, AuthGateway, DashboardGateway, DriversGateway, NotificationsGateway,
    RoutesGateway, SchoolsGateway, SettingsGateway, ShiftsGateway, StudentsGateway, TripsGateway,
};
pub use store::{
    DocumentSnapshot, EntityMeta, FetchOutcome, FleetGateways, FleetStore, MutationOutcome,
    Snapshot,
};
