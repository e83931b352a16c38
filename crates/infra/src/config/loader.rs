//! Configuration loader
//!
//! Resolution order:
//! 1. Environment variables, when `FLEETLINE_BASE_URL` is set
//! 2. A config file probed from the standard locations
//! 3. Built-in defaults
//!
//! ## Environment Variables
//! - `FLEETLINE_BASE_URL`: backend origin (required to load from env)
//! - `FLEETLINE_PATH_PREFIX`: endpoint prefix, e.g. `/api/v1`
//! - `FLEETLINE_REQUEST_TIMEOUT_SECS`: per-request timeout
//! - `FLEETLINE_HEALTH_TIMEOUT_SECS`: health probe timeout
//! - `FLEETLINE_RETRY_BASE_DELAY_MS`: linear backoff base delay
//! - `FLEETLINE_READ_RETRIES`: automatic retries for reads
//!
//! ## File Locations
//! `config.{json,toml}` and `fleetline.{json,toml}` are probed in the
//! working directory, its parent, and next to the executable. Files may
//! set any subset of fields; unset fields keep their defaults.

use std::path::{Path, PathBuf};

use fleetline_domain::{ClientConfig, FleetError, Result};
use serde::Deserialize;

/// Partial configuration as read from a file. Every field is optional so
/// a file only has to name what it changes.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PartialConfig {
    base_url: Option<String>,
    path_prefix: Option<String>,
    request_timeout_secs: Option<u64>,
    health_timeout_secs: Option<u64>,
    retry_base_delay_ms: Option<u64>,
    default_read_retries: Option<u32>,
}

impl PartialConfig {
    fn overlay(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            path_prefix: self.path_prefix.unwrap_or(defaults.path_prefix),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            health_timeout_secs: self.health_timeout_secs.unwrap_or(defaults.health_timeout_secs),
            retry_base_delay_ms: self.retry_base_delay_ms.unwrap_or(defaults.retry_base_delay_ms),
            default_read_retries: self
                .default_read_retries
                .unwrap_or(defaults.default_read_retries),
        }
    }
}

/// Load the client configuration with automatic fallback.
///
/// Environment first, then a probed config file, then defaults. The
/// resolved configuration is validated before it is returned.
///
/// # Errors
/// Returns [`FleetError::Config`] if an explicitly provided source is
/// malformed or the resolved configuration fails validation.
pub fn load() -> Result<ClientConfig> {
    let config = if std::env::var("FLEETLINE_BASE_URL").is_ok() {
        tracing::info!("configuration loaded from environment variables");
        load_from_env()?
    } else if let Some(path) = probe_config_paths() {
        load_from_file(Some(path))?
    } else {
        tracing::debug!("no configuration source found, using defaults");
        ClientConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables.
///
/// `FLEETLINE_BASE_URL` is required; the remaining variables override
/// defaults when present.
///
/// # Errors
/// Returns [`FleetError::Config`] if the base URL is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let base_url = std::env::var("FLEETLINE_BASE_URL").map_err(|_| {
        FleetError::Config("Missing required environment variable: FLEETLINE_BASE_URL".to_string())
    })?;
    let defaults = ClientConfig::default();

    Ok(ClientConfig {
        base_url,
        path_prefix: std::env::var("FLEETLINE_PATH_PREFIX").unwrap_or(defaults.path_prefix),
        request_timeout_secs: env_u64(
            "FLEETLINE_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout_secs,
        )?,
        health_timeout_secs: env_u64(
            "FLEETLINE_HEALTH_TIMEOUT_SECS",
            defaults.health_timeout_secs,
        )?,
        retry_base_delay_ms: env_u64(
            "FLEETLINE_RETRY_BASE_DELAY_MS",
            defaults.retry_base_delay_ms,
        )?,
        default_read_retries: u32::try_from(env_u64(
            "FLEETLINE_READ_RETRIES",
            u64::from(defaults.default_read_retries),
        )?)
        .map_err(|_| FleetError::Config("FLEETLINE_READ_RETRIES out of range".to_string()))?,
    })
}

/// Load configuration from a file, probing the standard locations when no
/// path is given. Format is detected by extension (`.json` or `.toml`).
///
/// # Errors
/// Returns [`FleetError::Config`] if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                return Err(FleetError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path
        }
        None => probe_config_paths().ok_or_else(|| {
            FleetError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|err| FleetError::Config(format!("Failed to read config file: {err}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("json");

    let partial: PartialConfig = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|err| FleetError::Config(format!("Invalid TOML format: {err}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|err| FleetError::Config(format!("Invalid JSON format: {err}")))?,
        _ => return Err(FleetError::Config(format!("Unsupported config format: {extension}"))),
    };
    Ok(partial.overlay())
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.json", "config.toml", "fleetline.json", "fleetline.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for name in names {
            candidates.push(cwd.join(name));
        }
        for name in names {
            candidates.push(cwd.join("..").join(name));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            for name in names {
                candidates.push(exe_dir.join(name));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|err| FleetError::Config(format!("Invalid value for {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
