//! Configuration loading
//!
//! Resolves the [`fleetline_domain::ClientConfig`] from environment
//! variables, a config file, or the built-in defaults.

mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
