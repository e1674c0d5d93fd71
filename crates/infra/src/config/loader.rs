//! Configuration loader
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the endpoint is not set there, falls back to a file
//! 3. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `EAGLEVIEW_ENDPOINT`: API base endpoint (required)
//! - `EAGLEVIEW_REQUEST_TIMEOUT`: per-call transport timeout in seconds
//! - `EAGLEVIEW_RETRY_TIMEOUT`: polling budget in seconds
//! - `EAGLEVIEW_RETRY_INTERVAL`: wait between polling attempts in seconds
//! - `EAGLEVIEW_USER_AGENT`: user agent sent with every call
//! - `EAGLEVIEW_SOURCE_ID` / `EAGLEVIEW_CLIENT_SECRET`: integration
//!   credentials, only used when both are set
//!
//! ## File Locations
//! `eagleview.json` or `eagleview.toml`, in the current working directory
//! and then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use eagleview_domain::{ClientConfig, Credentials, EagleViewError, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 2] = ["eagleview.json", "eagleview.toml"];

/// Load configuration from the environment, falling back to a file
///
/// # Errors
/// Returns `EagleViewError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!(endpoint = %config.endpoint, "configuration loaded from environment");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `EAGLEVIEW_ENDPOINT` is required; every other setting keeps its
/// default when unset.
///
/// # Errors
/// Returns `EagleViewError::Config` if the endpoint is missing or a number
/// does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let defaults = ClientConfig::default();

    let credentials = match (env_opt("EAGLEVIEW_SOURCE_ID"), env_opt("EAGLEVIEW_CLIENT_SECRET")) {
        (Some(source_id), Some(client_secret)) => Some(Credentials::new(source_id, client_secret)),
        _ => None,
    };

    Ok(ClientConfig {
        endpoint: env_var("EAGLEVIEW_ENDPOINT")?,
        request_timeout_secs: env_parse("EAGLEVIEW_REQUEST_TIMEOUT", defaults.request_timeout_secs)?,
        retry_timeout_secs: env_parse("EAGLEVIEW_RETRY_TIMEOUT", defaults.retry_timeout_secs)?,
        retry_interval_secs: env_parse("EAGLEVIEW_RETRY_INTERVAL", defaults.retry_interval_secs)?,
        user_agent: env_opt("EAGLEVIEW_USER_AGENT"),
        credentials,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, the standard locations are probed with
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `EagleViewError::Config` if the file is missing or unreadable,
/// or its format is invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EagleViewError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EagleViewError::Config("No eagleview.json or eagleview.toml found".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EagleViewError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration by file extension (`.json` or `.toml`)
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: ClientConfig = match extension {
        "toml" => toml::from_str(contents).map_err(InfraError::from)?,
        "json" => serde_json::from_str(contents).map_err(InfraError::from)?,
        _ => {
            return Err(EagleViewError::Config(format!("Unsupported config format: {extension}")))
        }
    };

    if config.endpoint.trim().is_empty() {
        return Err(EagleViewError::Config("endpoint must not be empty".to_string()));
    }
    Ok(config)
}

/// First existing `eagleview.{json,toml}` in the working directory, then
/// next to the executable
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        EagleViewError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty value of an optional variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| EagleViewError::Config(format!("Invalid value for {key}: {e}"))),
    }
}
