//! Scheduling coordinator - runs the pipeline for one request
//!
//! timeline -> free slots -> ranking -> history. Relative follow-ups are
//! interpreted here and nowhere else: the referenced turn's chosen (or top)
//! proposal plus the requested shift becomes the new window start.

use std::sync::Arc;

use cadence_common::time::{Clock, SystemClock};
use cadence_domain::constants::DEFAULT_MAX_PROPOSALS;
use cadence_domain::{
    ContextEntry, EntryToken, Interval, RelativeAdjustment, Result, SchedulerConfig,
    SchedulingError, SchedulingRequest, SlotProposal,
};
use chrono_tz::Tz;
use tracing::{debug, instrument, warn};

use crate::context_memory::ContextMemory;
use crate::free_slots::FreeSlotFinder;
use crate::ranking::SlotRanker;
use crate::timeline::{BusyItem, EventTimeline};

/// A request with any relative reference already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRequest {
    pub request: SchedulingRequest,
    /// A relative reference was given but matched no history.
    pub context_miss: bool,
}

/// Outcome of one resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub proposals: Vec<SlotProposal>,
    pub no_availability: bool,
    pub entry_token: EntryToken,
    pub context_miss: bool,
    /// The request that actually ran.
    pub effective_request: SchedulingRequest,
}

/// Orchestrates timeline, free-slot search, ranking and history.
pub struct SchedulingCoordinator {
    zone: Tz,
    finder: FreeSlotFinder,
    ranker: SlotRanker,
    max_proposals: usize,
    clock: Arc<dyn Clock>,
}

impl SchedulingCoordinator {
    /// Coordinator with default limits and no working-hours mask.
    pub fn new(zone: Tz) -> Self {
        Self {
            zone,
            finder: FreeSlotFinder::new(),
            ranker: SlotRanker::new(zone),
            max_proposals: DEFAULT_MAX_PROPOSALS,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let zone = config.zone()?;
        Ok(Self {
            zone,
            finder: FreeSlotFinder::new().with_working_hours(config.working_hours.clone()),
            ranker: SlotRanker::new(zone).with_policy(config.ranking.clone()),
            max_proposals: config.max_proposals,
            clock: Arc::new(SystemClock),
        })
    }

    /// Clock used to stamp history entries.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_proposals(mut self, max_proposals: usize) -> Self {
        self.max_proposals = max_proposals.max(1);
        self
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Apply the request's relative reference, if any, against `context`.
    /// Never mutates history; a miss falls back to the request as given.
    pub fn plan(&self, request: &SchedulingRequest, context: &ContextMemory) -> Result<PlannedRequest> {
        request.validate()?;

        let Some(adjustment) = &request.relative else {
            return Ok(PlannedRequest { request: request.clone(), context_miss: false });
        };

        match context.resolve_relative(&adjustment.reference) {
            Some(base) => Ok(PlannedRequest {
                request: apply_adjustment(base, request, adjustment)?,
                context_miss: false,
            }),
            None => {
                warn!(
                    reference = ?adjustment.reference,
                    history = context.len(),
                    "Relative reference not found, resolving as a fresh request"
                );
                Ok(PlannedRequest { request: request.clone(), context_miss: true })
            }
        }
    }

    /// Resolve `request` against `events` and append the outcome to
    /// `context`. An empty proposal list is reported through
    /// `no_availability`; only malformed input is an error, and then nothing
    /// is appended.
    pub fn resolve<E: BusyItem>(
        &self,
        request: &SchedulingRequest,
        events: &[E],
        context: &mut ContextMemory,
    ) -> Result<Resolution> {
        let planned = self.plan(request, context)?;
        self.resolve_planned(planned, events, context)
    }

    /// Run the pipeline for a request that was already planned against
    /// `context`. Callers that fetch events between planning and resolving
    /// must make sure `context` has not changed in between.
    #[instrument(skip_all, fields(relative = planned.request.relative.is_some(), events = events.len()))]
    pub fn resolve_planned<E: BusyItem>(
        &self,
        planned: PlannedRequest,
        events: &[E],
        context: &mut ContextMemory,
    ) -> Result<Resolution> {
        let effective = planned.request;

        let timeline = EventTimeline::build(events, self.zone)?;
        let free = self.finder.find_free(&timeline, &effective.search_window, effective.duration);
        let mut proposals = self.ranker.rank(&free, &effective);
        proposals.truncate(self.max_proposals);

        let entry = ContextEntry::new(effective.clone(), proposals.clone(), self.clock.now());
        let entry_token = entry.token;
        context.append(entry);

        debug!(
            window = %effective.search_window,
            proposals = proposals.len(),
            context_miss = planned.context_miss,
            history = context.len(),
            "Request resolved"
        );

        Ok(Resolution {
            no_availability: proposals.is_empty(),
            proposals,
            entry_token,
            context_miss: planned.context_miss,
            effective_request: effective,
        })
    }
}

/// Derive the follow-up request from the referenced turn.
///
/// The window starts at the anchor proposal (chosen, else top, else the old
/// window start) moved by `shift`, and ends at the old window end moved by
/// the same amount, stretched to fit at least one meeting. Preferences and
/// participants carry over when the follow-up does not restate them.
fn apply_adjustment(
    base: &ContextEntry,
    request: &SchedulingRequest,
    adjustment: &RelativeAdjustment,
) -> Result<SchedulingRequest> {
    let duration = if adjustment.keep_duration { base.request.duration } else { request.duration };
    let anchor_start =
        base.anchor().map_or(base.request.search_window.start(), |proposal| proposal.interval.start());

    let overflow = || SchedulingError::InvalidInput("relative shift is out of range".to_string());
    let start = anchor_start.checked_add_signed(adjustment.shift).ok_or_else(overflow)?;
    let shifted_end =
        base.request.search_window.end().checked_add_signed(adjustment.shift).ok_or_else(overflow)?;
    let minimum_end = start.checked_add_signed(duration).ok_or_else(overflow)?;
    let search_window = Interval::new(start, shifted_end.max(minimum_end))?;

    let preferred_times_of_day = if request.preferred_times_of_day.is_empty() {
        base.request.preferred_times_of_day.clone()
    } else {
        request.preferred_times_of_day.clone()
    };
    let participants = if request.participants.is_empty() {
        base.request.participants.clone()
    } else {
        request.participants.clone()
    };

    Ok(SchedulingRequest {
        duration,
        search_window,
        preferred_times_of_day,
        participants,
        relative: request.relative.clone(),
        full_gap: request.full_gap,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
    use cadence_common::time::MockClock;
    use cadence_domain::{HourRange, RankReason, RawEvent, RelativeReference};

    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn span(start: &str, end: &str) -> Interval {
        Interval::new(at(start), at(end)).unwrap()
    }

    fn busy(id: &str, start: &str, end: &str) -> RawEvent {
        RawEvent::new(id, "work", start, end)
    }

    fn coordinator() -> SchedulingCoordinator {
        let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        SchedulingCoordinator::new(Tz::UTC).with_clock(Arc::new(clock))
    }

    #[test]
    fn test_fresh_request_runs_pipeline_and_records_history() {
        let events = vec![
            busy("a", "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z"),
            busy("b", "2024-05-01T11:00:00Z", "2024-05-01T11:30:00Z"),
        ];
        let request = SchedulingRequest::new(
            Duration::minutes(45),
            span("2024-05-01T09:00:00Z", "2024-05-01T12:00:00Z"),
        )
        .unwrap();
        let mut context = ContextMemory::new(20);

        let resolution = coordinator().resolve(&request, &events, &mut context).unwrap();

        assert_eq!(resolution.proposals.len(), 1);
        assert_eq!(resolution.proposals[0].interval, span("2024-05-01T10:00:00Z", "2024-05-01T10:45:00Z"));
        assert_eq!(resolution.proposals[0].rank_reason, RankReason::EarliestAvailable);
        assert!(!resolution.no_availability);
        assert_eq!(context.len(), 1);
        assert_eq!(context.latest().unwrap().token, resolution.entry_token);
        assert_eq!(
            context.latest().unwrap().created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_shift_from_chosen_slot() {
        let coordinator = coordinator();
        let mut context = ContextMemory::new(20);
        let first = SchedulingRequest::new(
            Duration::minutes(30),
            span("2024-05-01T09:00:00Z", "2024-05-01T17:00:00Z"),
        )
        .unwrap()
        .with_preferred(HourRange::new(14, 15).unwrap());
        let events = vec![busy("a", "2024-05-01T09:00:00Z", "2024-05-01T14:00:00Z")];

        let initial = coordinator.resolve(&first, &events, &mut context).unwrap();
        assert_eq!(initial.proposals[0].interval, span("2024-05-01T14:00:00Z", "2024-05-01T14:30:00Z"));
        context.record_choice(&initial.entry_token, 0).unwrap();

        let follow_up = SchedulingRequest::new(Duration::minutes(30), first.search_window)
            .unwrap()
            .with_relative(
                RelativeAdjustment::new(RelativeReference::Latest, Duration::hours(1))
                    .keeping_duration(),
            );
        let shifted = coordinator.resolve(&follow_up, &events, &mut context).unwrap();

        assert!(!shifted.context_miss);
        assert_eq!(shifted.effective_request.search_window.start(), at("2024-05-01T15:00:00Z"));
        assert_eq!(shifted.effective_request.search_window.end(), at("2024-05-01T18:00:00Z"));
        assert_eq!(shifted.proposals[0].interval.start(), at("2024-05-01T15:00:00Z"));
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_context_miss_falls_back_to_fresh_request() {
        let request = SchedulingRequest::new(
            Duration::minutes(30),
            span("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z"),
        )
        .unwrap()
        .with_relative(RelativeAdjustment::new(RelativeReference::StepsBack(3), Duration::hours(1)));
        let mut context = ContextMemory::new(20);

        let resolution = coordinator().resolve::<RawEvent>(&request, &[], &mut context).unwrap();

        assert!(resolution.context_miss);
        assert_eq!(resolution.effective_request.search_window, request.search_window);
        assert_eq!(resolution.proposals[0].interval.start(), at("2024-05-01T09:00:00Z"));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_no_availability_is_success_and_still_recorded() {
        let events = vec![busy("all", "2024-05-01T08:00:00Z", "2024-05-01T18:00:00Z")];
        let request = SchedulingRequest::new(
            Duration::minutes(30),
            span("2024-05-01T09:00:00Z", "2024-05-01T17:00:00Z"),
        )
        .unwrap();
        let mut context = ContextMemory::new(20);

        let resolution = coordinator().resolve(&request, &events, &mut context).unwrap();

        assert!(resolution.no_availability);
        assert!(resolution.proposals.is_empty());
        assert_eq!(context.len(), 1);
        assert!(context.latest().unwrap().proposals.is_empty());
    }

    #[test]
    fn test_normalization_error_is_fatal_and_not_recorded() {
        let events = vec![RawEvent { end: None, ..busy("broken", "2024-05-01T09:00:00Z", "") }];
        let request = SchedulingRequest::new(
            Duration::minutes(30),
            span("2024-05-01T09:00:00Z", "2024-05-01T17:00:00Z"),
        )
        .unwrap();
        let mut context = ContextMemory::new(20);

        let err = coordinator().resolve(&request, &events, &mut context).unwrap_err();

        assert!(matches!(err, SchedulingError::Normalization(ref e) if e.event_id == "broken"));
        assert!(context.is_empty());
    }

    #[test]
    fn test_max_proposals_truncates() {
        let window = span("2024-05-01T00:00:00Z", "2024-05-08T00:00:00Z");
        let events: Vec<RawEvent> = (1..=7)
            .map(|day| {
                busy(
                    &format!("night-{day}"),
                    &format!("2024-05-0{day}T18:00:00Z"),
                    &format!("2024-05-0{}T08:00:00Z", day + 1),
                )
            })
            .collect();
        let request = SchedulingRequest::new(Duration::minutes(30), window).unwrap();
        let mut context = ContextMemory::new(20);

        let resolution = coordinator()
            .with_max_proposals(3)
            .resolve(&request, &events, &mut context)
            .unwrap();
        assert_eq!(resolution.proposals.len(), 3);
        assert_eq!(context.latest().unwrap().proposals.len(), 3);
    }

    #[test]
    fn test_follow_up_inherits_preferences_and_anchor_falls_back_to_window() {
        let coordinator = coordinator();
        let mut context = ContextMemory::new(20);
        let first = SchedulingRequest::new(
            Duration::minutes(60),
            span("2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z"),
        )
        .unwrap()
        .with_preferred(HourRange::new(9, 12).unwrap())
        .with_participants(["ana@example.com"]);
        let blocked = vec![busy("x", "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z")];
        assert!(coordinator.resolve(&first, &blocked, &mut context).unwrap().no_availability);

        let next_day = SchedulingRequest::new(Duration::minutes(15), first.search_window)
            .unwrap()
            .with_relative(
                RelativeAdjustment::new(RelativeReference::Latest, Duration::days(1))
                    .keeping_duration(),
            );
        let planned = coordinator.plan(&next_day, &context).unwrap();

        assert_eq!(planned.request.duration, Duration::minutes(60));
        assert_eq!(planned.request.search_window, span("2024-05-02T09:00:00Z", "2024-05-02T10:00:00Z"));
        assert_eq!(planned.request.preferred_times_of_day, first.preferred_times_of_day);
        assert_eq!(planned.request.participants, vec!["ana@example.com".to_string()]);
    }
}
