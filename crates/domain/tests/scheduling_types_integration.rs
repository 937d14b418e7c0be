//! Integration tests for scheduling domain types
//!
//! Exercises the types the way a caller sees them across the crate
//! boundary: JSON payloads from an intent front end, history snapshots
//! written for durability, and configuration documents.

use chrono::{DateTime, Duration, Utc};
use cadence_domain::{
    ContextEntry, ContextSnapshot, HourRange, Interval, RankReason, RawEvent, RelativeReference,
    SchedulerConfig, SchedulingError, SchedulingRequest, SlotProposal,
};

fn at(s: &str) -> DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

// ============================================================================
// Request payloads
// ============================================================================

/// A structured follow-up request ("same length, an hour later") as an intent
/// parser would emit it.
#[test]
fn test_follow_up_request_from_json() {
    let payload = r#"{
        "duration": 2700,
        "search_window": {"start": "2024-05-01T09:00:00-04:00", "end": "2024-05-01T17:00:00-04:00"},
        "preferred_times_of_day": [{"start_hour": 13, "end_hour": 17}],
        "relative": {"reference": {"kind": "latest"}, "shift": 3600, "keep_duration": true},
        "participants": ["ana@example.com", "raj@example.com"]
    }"#;

    let request: SchedulingRequest = serde_json::from_str(payload).unwrap();
    request.validate().unwrap();

    assert_eq!(request.duration, Duration::minutes(45));
    assert_eq!(request.search_window.start(), at("2024-05-01T13:00:00Z"));
    assert_eq!(request.preferred_times_of_day, vec![HourRange::new(13, 17).unwrap()]);
    let relative = request.relative.unwrap();
    assert_eq!(relative.reference, RelativeReference::Latest);
    assert_eq!(relative.shift, Duration::hours(1));
    assert!(relative.keep_duration);
    assert!(!request.full_gap);
}

/// Payloads that violate invariants are rejected at the boundary.
#[test]
fn test_invalid_payloads_rejected() {
    let inverted_window = r#"{
        "duration": 1800,
        "search_window": {"start": "2024-05-01T17:00:00Z", "end": "2024-05-01T09:00:00Z"}
    }"#;
    assert!(serde_json::from_str::<SchedulingRequest>(inverted_window).is_err());

    let zero_duration = r#"{
        "duration": 0,
        "search_window": {"start": "2024-05-01T09:00:00Z", "end": "2024-05-01T17:00:00Z"}
    }"#;
    let request: SchedulingRequest = serde_json::from_str(zero_duration).unwrap();
    assert!(matches!(request.validate(), Err(SchedulingError::InvalidInput(_))));
}

// ============================================================================
// Calendar records
// ============================================================================

#[test]
fn test_raw_event_batch_from_provider_json() {
    let payload = r#"[
        {"id": "1", "start": "2024-05-01T09:00:00Z", "end": "2024-05-01T10:00:00Z", "source_calendar_id": "work"},
        {"id": "2", "start": "2024-05-02", "end": "2024-05-03", "is_all_day": true, "source_calendar_id": "personal"},
        {"id": "3", "start": "2024-05-01T11:00:00", "end": "2024-05-01T11:30:00", "timezone": "Asia/Tokyo", "status": "cancelled"}
    ]"#;

    let events: Vec<RawEvent> = serde_json::from_str(payload).unwrap();
    assert_eq!(events.len(), 3);
    assert!(events[1].is_all_day);
    assert!(!events[2].effective_status().blocks_time());
}

// ============================================================================
// History snapshots
// ============================================================================

/// A snapshot survives a JSON round trip with chosen slots and tokens intact,
/// so a restarted process can resume follow-ups.
#[test]
fn test_context_snapshot_survives_json() {
    let window = Interval::new(at("2024-05-01T09:00:00Z"), at("2024-05-01T17:00:00Z")).unwrap();
    let request = SchedulingRequest::new(Duration::minutes(30), window).unwrap();
    let proposal = SlotProposal {
        interval: Interval::starting_at(at("2024-05-01T14:00:00Z"), Duration::minutes(30)).unwrap(),
        rank_score: 999_001.0,
        rank_reason: RankReason::WithinPreferredWindow,
    };
    let mut entry = ContextEntry::new(request, vec![proposal.clone()], Utc::now());
    entry.chosen = Some(proposal);

    let snapshot = ContextSnapshot { capacity: 20, entries: vec![entry.clone()] };
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: ContextSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.capacity, 20);
    assert_eq!(restored.entries[0].token, entry.token);
    assert_eq!(restored.entries[0].chosen, entry.chosen);
    assert!(json.contains("\"within-preferred-window\""));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_document_with_nested_sections() {
    let config: SchedulerConfig = serde_json::from_str(
        r#"{
            "timezone": "America/Los_Angeles",
            "max_proposals": 3,
            "working_hours": {"start_hour": 8, "end_hour": 18, "exclude_weekends": false},
            "ranking": {"avoid_week_edges": true}
        }"#,
    )
    .unwrap();

    config.validate().unwrap();
    assert_eq!(config.zone().unwrap(), chrono_tz::America::Los_Angeles);
    assert_eq!(config.max_proposals, 3);
    assert!(config.ranking.avoid_week_edges);
    assert_eq!(config.context_capacity, 20);
}
