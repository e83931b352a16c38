//! Session lifecycle management
//!
//! Owns the authenticated-user state: login and verification flows, durable
//! persistence across restarts, scheduled token refresh, and the teardown
//! that keeps "no session" and "no cached data" in lockstep.

mod manager;

pub use manager::{SessionListener, SessionManager};
