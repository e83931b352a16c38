//! Example: probing a Fleetline backend
//!
//! Loads the client configuration the same way an embedding application
//! would (environment first, then config file probe, then defaults),
//! builds the shared API client, and probes the backend's health endpoint.
//!
//! # Setup
//!
//! Point the client at a backend:
//! ```bash
//! export FLEETLINE_BASE_URL=https://fleet.example.com
//! ```
//! or drop a `fleetline.toml` next to the binary.
//!
//! # Run
//!
//! ```bash
//! cargo run -p fleetline-infra --example health_probe
//! ```

use fleetline_infra::{config, ApiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = config::load()?;
    println!("Fleetline health probe");
    println!("======================\n");
    println!("Base URL:    {}", cfg.base_url);
    println!("Path prefix: {}", cfg.path_prefix);

    let client = ApiClient::new(&cfg)?;
    if client.health().await {
        println!("\n✓ Backend is reachable");
    } else {
        println!("\n✗ Backend did not answer the health probe");
        std::process::exit(1);
    }

    Ok(())
}
