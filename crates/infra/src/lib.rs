//! # Fleetline Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP transport (reqwest) and its test double
//! - The shared API client: caching, deduplication, retry, interceptors
//! - The session manager (token lifecycle, persistence, refresh)
//! - Per-entity gateway services over the API client
//! - Configuration loading from environment or file
//!
//! ## Architecture Principles
//! - Implements traits defined in `fleetline-core`
//! - All network effects live here; core and domain stay pure
//! - The transport is swapped wholesale for demo/test builds, never
//!   branched per method

pub mod api;
pub mod config;
pub mod http;
pub mod services;
pub mod session;

// Re-export main types for convenience
pub use api::{ApiClient, CallOptions, HttpMethod, InterceptorHandle, RequestCoordinator};
pub use http::{FakeTransport, HttpExecutor, PreparedRequest, Transport, TransportResponse};
pub use services::{
    ActorSource, AssignmentsService, AuthService, DashboardService, DriversService,
    NotificationsService, RoutesService, SchoolsService, SettingsService, ShiftsService,
    StudentsService, TripsService,
};
pub use session::{SessionListener, SessionManager};
