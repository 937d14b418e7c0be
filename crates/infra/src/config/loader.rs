//! Configuration loader
//!
//! Loads scheduler configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `CADENCE_TIMEZONE` is absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `CADENCE_TIMEZONE`: IANA working zone (required for env loading)
//! - `CADENCE_CONTEXT_CAPACITY`: turns remembered per session
//! - `CADENCE_MAX_PROPOSALS`: proposals returned per request
//! - `CADENCE_SEARCH_DAYS`: default search span in days
//! - `CADENCE_FETCH_TIMEOUT`: calendar fetch budget as a human duration (`"2s"`, `"1500ms"`)
//! - `CADENCE_WORKING_HOURS`: local working hours as `START-END` (`"9-17"`)
//! - `CADENCE_INCLUDE_WEEKENDS`: treat weekends as working days (true/false)
//! - `CADENCE_AVOID_WEEK_EDGES`: demote Monday mornings and Friday afternoons (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./cadence.toml` or `./cadence.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use cadence_common::time::parse_duration;
use cadence_domain::{RankingPolicy, Result, SchedulerConfig, SchedulingError, WorkingHours};

const CONFIG_FILE_NAMES: [&str; 4] = ["cadence.toml", "cadence.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If that fails, falls
/// back to a config file found by [`probe_config_paths`].
///
/// # Errors
/// Returns `SchedulingError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded values fail validation
pub fn load() -> Result<SchedulerConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `CADENCE_TIMEZONE` is required; every other setting keeps its
/// default when unset.
///
/// # Errors
/// Returns `SchedulingError::Config` if the timezone is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<SchedulerConfig> {
    let defaults = SchedulerConfig::default();

    let timezone = env_var("CADENCE_TIMEZONE")?;
    let context_capacity =
        env_parse("CADENCE_CONTEXT_CAPACITY", "context capacity")?.unwrap_or(defaults.context_capacity);
    let max_proposals =
        env_parse("CADENCE_MAX_PROPOSALS", "max proposals")?.unwrap_or(defaults.max_proposals);
    let default_search_days =
        env_parse("CADENCE_SEARCH_DAYS", "search days")?.unwrap_or(defaults.default_search_days);

    let fetch_timeout_ms = match std::env::var("CADENCE_FETCH_TIMEOUT").ok() {
        Some(raw) => {
            let timeout = parse_duration(&raw)
                .map_err(|e| SchedulingError::Config(format!("Invalid fetch timeout: {e}")))?;
            u64::try_from(timeout.as_millis())
                .map_err(|_| SchedulingError::Config(format!("Fetch timeout too large: {raw}")))?
        }
        None => defaults.fetch_timeout_ms,
    };

    let working_hours = match std::env::var("CADENCE_WORKING_HOURS").ok() {
        Some(raw) => Some(WorkingHours {
            exclude_weekends: !env_bool("CADENCE_INCLUDE_WEEKENDS", false),
            ..parse_hour_span(&raw)?
        }),
        None => defaults.working_hours,
    };

    let config = SchedulerConfig {
        timezone,
        context_capacity,
        max_proposals,
        default_search_days,
        working_hours,
        ranking: RankingPolicy { avoid_week_edges: env_bool("CADENCE_AVOID_WEEK_EDGES", false) },
        fetch_timeout_ms,
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Missing fields take their defaults.
///
/// # Errors
/// Returns `SchedulingError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded values fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<SchedulerConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SchedulingError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SchedulingError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SchedulingError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<SchedulerConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SchedulingError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SchedulingError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SchedulingError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory and its parent, then the
/// executable's directory, for `cadence.{toml,json}` and
/// `config.{toml,json}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
            roots.push(exe_dir.join(".."));
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SchedulingError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric environment variable.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| SchedulingError::Config(format!("Invalid {what}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

/// `"9-17"` -> working hours 09:00 to 17:00.
fn parse_hour_span(raw: &str) -> Result<WorkingHours> {
    let invalid = || SchedulingError::Config(format!("Invalid working hours `{raw}`, expected START-END"));
    let (start, end) = raw.split_once('-').ok_or_else(invalid)?;
    let hours = WorkingHours {
        start_hour: start.trim().parse().map_err(|_| invalid())?,
        end_hour: end.trim().parse().map_err(|_| invalid())?,
        ..WorkingHours::default()
    };
    hours.validate()?;
    Ok(hours)
}
