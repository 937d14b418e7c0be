//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a working scheduler from it.

use std::io::Write;

use cadence_core::SchedulingService;
use cadence_domain::{SchedulingError, WorkingHours};
use cadence_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "timezone": "America/Los_Angeles",
            "context_capacity": 10,
            "max_proposals": 3,
            "default_search_days": 5,
            "working_hours": { "start_hour": 8, "end_hour": 18, "exclude_weekends": false },
            "ranking": { "avoid_week_edges": true },
            "fetch_timeout_ms": 1500
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.timezone, "America/Los_Angeles");
    assert_eq!(config.context_capacity, 10);
    assert_eq!(config.max_proposals, 3);
    assert_eq!(config.default_search_days, 5);
    assert_eq!(
        config.working_hours,
        Some(WorkingHours { start_hour: 8, end_hour: 18, exclude_weekends: false })
    );
    assert!(config.ranking.avoid_week_edges);
    assert_eq!(config.fetch_timeout_ms, 1500);

    // The loaded configuration drives a working service
    assert!(SchedulingService::from_config(&config).is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
timezone = "Europe/London"
max_proposals = 4

[working_hours]
start_hour = 9
end_hour = 17
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.timezone, "Europe/London");
    assert_eq!(config.max_proposals, 4);
    assert_eq!(config.working_hours, Some(WorkingHours::default()));
    assert_eq!(config.context_capacity, 20);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_empty_file_uses_defaults() {
    let path = write_config("{}", "json");

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    assert_eq!(config, cadence_domain::SchedulerConfig::default());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/cadence.json".into()));

    match result {
        Err(SchedulingError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let path = write_config(r#"{ "timezone": "UTC" "#, "json");

    match config::load_from_file(Some(path.clone())) {
        Err(SchedulingError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_with_unknown_timezone() {
    let path = write_config(r#"timezone = "Atlantis/Capital""#, "toml");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert_eq!(err.label(), "config");
    assert!(err.to_string().contains("Atlantis/Capital"));

    std::fs::remove_file(path).ok();
}
