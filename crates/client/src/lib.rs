//! # Fleetline Client
//!
//! Composition root for embedding applications.
//!
//! This crate contains:
//! - [`FleetContext`]: wires the shared API client, session manager,
//!   gateway services, and entity store into one explicitly constructed
//!   object
//! - [`EnvironmentRegistry`]: named backend environments persisted across
//!   restarts
//!
//! ## Architecture Principles
//! - Everything is dependency-injected through `FleetContext::create`;
//!   there are no module-level singletons
//! - The embedding application holds the context for process lifetime and
//!   passes references down

pub mod context;
pub mod environments;

pub use context::FleetContext;
pub use environments::EnvironmentRegistry;
