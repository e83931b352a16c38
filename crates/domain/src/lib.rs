//! # Fleetline Domain
//!
//! Business domain types and models for Fleetline.
//!
//! This crate contains:
//! - Fleet entity types (School, Driver, Route, Trip, etc.)
//! - Domain error types and Result definitions
//! - Client configuration structures
//! - Domain constants (cache TTL classes, storage keys)
//!
//! ## Architecture
//! - No dependencies on other Fleetline crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
