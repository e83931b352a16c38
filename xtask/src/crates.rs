use std::process::Command;

use anyhow::{Context, Result};

const WORKSPACE_CRATES: &[&str] = &[
    "fleetline-domain",
    "fleetline-common",
    "fleetline-core",
    "fleetline-infra",
    "fleetline-client",
];

/// Check each workspace crate on its own, in dependency order.
///
/// A workspace-wide check can mask a crate that forgot to declare a direct
/// dependency, because a sibling pulls it into the unified feature set.
/// Checking crate by crate catches that before CI does.
pub fn check_each_crate() -> Result<()> {
    println!("Checking {} crates individually...", WORKSPACE_CRATES.len());

    for (index, krate) in WORKSPACE_CRATES.iter().enumerate() {
        println!("\n[{}/{}] cargo check -p {krate}", index + 1, WORKSPACE_CRATES.len());

        let status = Command::new("cargo")
            .args(["check", "-p", krate, "--all-targets"])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{krate}'"))?;

        if !status.success() {
            anyhow::bail!("Crate '{krate}' failed to compile on its own");
        }

        println!("✅ '{krate}' compiled successfully");
    }

    println!("\n✅ All {} crates compile on their own!", WORKSPACE_CRATES.len());

    Ok(())
}
