//! Slot ranker - orders free intervals into proposals
//!
//! # Ordering
//!
//! Highest priority first:
//! 1. Start inside a preferred time-of-day range (local to the working zone)
//! 2. Fewer whole local days from the search window start
//! 3. Not on an avoided week edge (only when the policy asks for it)
//! 4. Not fragmenting: taking `duration` from the candidate leaves either
//!    nothing or a remainder at least `duration` long
//! 5. Earliest start
//!
//! Candidates are sorted on these keys directly. `rank_score` folds keys 1-4
//! into one number that never increases down the list; day distance is
//! capped in the score so it can never cancel the preferred tier. The same
//! inputs always produce the same proposals in the same order.
//!
//! A free interval that contains the start of a preferred range also yields a
//! candidate aligned to that start, so a long gap from 08:00 to 18:00 can be
//! proposed at 13:00 for a "13-17" preference.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use cadence_domain::constants::{
    SCORE_MAX_DAY_DISTANCE, SCORE_NON_FRAGMENTING_BONUS, SCORE_PER_DAY_DISTANCE,
    SCORE_PREFERRED_TIER, SCORE_WEEK_EDGE_PENALTY,
};
use cadence_domain::{Interval, RankReason, RankingPolicy, SchedulingRequest, SlotProposal};
use tracing::debug;

use crate::zone::{local_date, local_hour};

/// Scores and orders candidate slots.
#[derive(Debug, Clone)]
pub struct SlotRanker {
    zone: Tz,
    policy: RankingPolicy,
}

#[derive(Debug, Clone)]
struct Candidate {
    slot: Interval,
    preferred: bool,
    day_offset: i64,
    week_edge: bool,
    fragmenting: bool,
    score: f64,
}

impl Candidate {
    fn same_tier(&self, other: &Candidate) -> bool {
        self.preferred == other.preferred
            && self.day_offset == other.day_offset
            && self.week_edge == other.week_edge
    }

    /// Best first: preferred, nearer day, off the week edge, not
    /// fragmenting, earlier.
    fn ordering(&self, other: &Candidate) -> Ordering {
        other
            .preferred
            .cmp(&self.preferred)
            .then_with(|| self.day_offset.cmp(&other.day_offset))
            .then_with(|| self.week_edge.cmp(&other.week_edge))
            .then_with(|| self.fragmenting.cmp(&other.fragmenting))
            .then_with(|| self.slot.start().cmp(&other.slot.start()))
            .then_with(|| self.slot.end().cmp(&other.slot.end()))
    }
}

impl SlotRanker {
    pub fn new(zone: Tz) -> Self {
        Self { zone, policy: RankingPolicy::default() }
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Turn free intervals into ranked proposals. Intervals shorter than
    /// `request.duration` never become proposals.
    pub fn rank(&self, free_intervals: &[Interval], request: &SchedulingRequest) -> Vec<SlotProposal> {
        let window_day = local_date(&self.zone, &request.search_window.start());

        let mut candidates: Vec<Candidate> = free_intervals
            .iter()
            .filter(|gap| gap.duration() >= request.duration)
            .flat_map(|gap| self.candidate_starts(gap, request))
            .filter_map(|slot| self.evaluate(slot, request, window_day))
            .collect();

        candidates.sort_by(Candidate::ordering);
        candidates.dedup_by(|a, b| a.slot.start() == b.slot.start() && a.slot.end() == b.slot.end());

        let proposals: Vec<SlotProposal> = candidates
            .iter()
            .map(|candidate| SlotProposal {
                interval: self.proposal_interval(candidate, request),
                rank_score: candidate.score,
                rank_reason: reason_for(candidate, &candidates),
            })
            .collect();

        debug!(
            free = free_intervals.len(),
            proposals = proposals.len(),
            duration_minutes = request.duration.num_minutes(),
            "Slots ranked"
        );
        proposals
    }

    /// The free interval itself plus, for each preferred range, the part of
    /// it starting where that range begins.
    fn candidate_starts(&self, gap: &Interval, request: &SchedulingRequest) -> Vec<Interval> {
        let mut slots = vec![*gap];
        if request.preferred_times_of_day.is_empty() {
            return slots;
        }

        let first = local_date(&self.zone, &gap.start());
        let last = local_date(&self.zone, &gap.end());
        for date in first.iter_days().take_while(|date| *date <= last) {
            for range in &request.preferred_times_of_day {
                let Some(aligned) = local_hour(&self.zone, date, range.start_hour()) else {
                    continue;
                };
                let aligned = aligned.fixed_offset();
                if aligned <= gap.start() || aligned >= gap.end() {
                    continue;
                }
                if let Ok(tail) = Interval::new(aligned, gap.end()) {
                    if tail.duration() >= request.duration {
                        slots.push(tail.in_zone(&self.zone));
                    }
                }
            }
        }
        slots
    }

    fn evaluate(
        &self,
        slot: Interval,
        request: &SchedulingRequest,
        window_day: NaiveDate,
    ) -> Option<Candidate> {
        if slot.duration() < request.duration {
            return None;
        }
        let local = slot.start().with_timezone(&self.zone).naive_local();

        let week_edge = self.policy.is_week_edge(&local);
        let preferred = request.is_preferred_time(&local.time()) && !week_edge;
        let day_offset = (local.date() - window_day).num_days().max(0);
        let leftover = slot.duration() - request.duration;
        let fragmenting =
            !request.full_gap && leftover > Duration::zero() && leftover < request.duration;

        let mut score = -(day_offset.min(SCORE_MAX_DAY_DISTANCE) as f64) * SCORE_PER_DAY_DISTANCE;
        if preferred {
            score += SCORE_PREFERRED_TIER;
        }
        if week_edge {
            score -= SCORE_WEEK_EDGE_PENALTY;
        }
        if !fragmenting {
            score += SCORE_NON_FRAGMENTING_BONUS;
        }

        Some(Candidate { slot, preferred, day_offset, week_edge, fragmenting, score })
    }

    fn proposal_interval(&self, candidate: &Candidate, request: &SchedulingRequest) -> Interval {
        if request.full_gap {
            return candidate.slot;
        }
        candidate.slot.with_duration(request.duration).unwrap_or(candidate.slot)
    }
}

/// Preferred candidates keep their tier tag. Otherwise a candidate is
/// "least fragmenting" only when the bonus let it overtake an earlier,
/// fragmenting candidate of the same tier.
fn reason_for(candidate: &Candidate, all: &[Candidate]) -> RankReason {
    if candidate.preferred {
        return RankReason::WithinPreferredWindow;
    }
    let overtook_earlier = !candidate.fragmenting
        && all.iter().any(|other| {
            other.fragmenting
                && other.same_tier(candidate)
                && other.slot.start() < candidate.slot.start()
        });
    if overtook_earlier {
        RankReason::LeastFragmenting
    } else {
        RankReason::EarliestAvailable
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset};
    use chrono_tz::America::New_York;
    use cadence_domain::HourRange;

    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn span(start: &str, end: &str) -> Interval {
        Interval::new(at(start), at(end)).unwrap()
    }

    fn request(minutes: i64, window: Interval) -> SchedulingRequest {
        SchedulingRequest::new(Duration::minutes(minutes), window).unwrap()
    }

    #[test]
    fn test_clips_to_duration_and_tags_earliest() {
        let window = span("2024-05-01T09:00:00Z", "2024-05-01T12:00:00Z");
        let free = vec![
            span("2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z"),
            span("2024-05-01T11:30:00Z", "2024-05-01T12:00:00Z"),
        ];
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &request(45, window));

        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].interval, span("2024-05-01T10:00:00Z", "2024-05-01T10:45:00Z"));
        assert_eq!(proposals[0].rank_reason, RankReason::EarliestAvailable);
    }

    #[test]
    fn test_full_gap_keeps_whole_interval() {
        let window = span("2024-05-01T09:00:00Z", "2024-05-01T12:00:00Z");
        let free = vec![span("2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z")];
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &request(45, window).with_full_gap());
        assert_eq!(proposals[0].interval, free[0]);
    }

    #[test]
    fn test_preferred_window_outranks_earlier_slots() {
        let window = span("2024-05-01T08:00:00Z", "2024-05-01T18:00:00Z");
        let free = vec![
            span("2024-05-01T08:00:00Z", "2024-05-01T09:00:00Z"),
            span("2024-05-01T14:00:00Z", "2024-05-01T15:00:00Z"),
        ];
        let req = request(30, window).with_preferred(HourRange::new(13, 17).unwrap());
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &req);

        assert_eq!(proposals[0].interval.start(), at("2024-05-01T14:00:00Z"));
        assert_eq!(proposals[0].rank_reason, RankReason::WithinPreferredWindow);
        assert_eq!(proposals[1].rank_reason, RankReason::EarliestAvailable);
        assert!(proposals[0].rank_score > proposals[1].rank_score);
    }

    #[test]
    fn test_preferred_start_inside_long_gap_is_proposed() {
        let window = span("2024-05-01T08:00:00Z", "2024-05-01T18:00:00Z");
        let free = vec![window];
        let req = request(60, window).with_preferred(HourRange::new(13, 17).unwrap());
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &req);

        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].interval, span("2024-05-01T13:00:00Z", "2024-05-01T14:00:00Z"));
        assert_eq!(proposals[0].rank_reason, RankReason::WithinPreferredWindow);
        assert_eq!(proposals[1].interval.start(), at("2024-05-01T08:00:00Z"));
    }

    #[test]
    fn test_preference_is_judged_in_working_zone() {
        // 14:00 UTC is 10:00 in New York (EDT).
        let window = span("2024-05-01T12:00:00Z", "2024-05-01T22:00:00Z");
        let free = vec![span("2024-05-01T14:00:00Z", "2024-05-01T15:00:00Z")];
        let req = request(30, window).with_preferred(HourRange::new(9, 12).unwrap());

        let ny = SlotRanker::new(New_York).rank(&free, &req);
        let utc = SlotRanker::new(Tz::UTC).rank(&free, &req);
        assert_eq!(ny[0].rank_reason, RankReason::WithinPreferredWindow);
        assert_eq!(utc[0].rank_reason, RankReason::EarliestAvailable);
    }

    #[test]
    fn test_non_fragmenting_overtakes_same_day_fragmenting() {
        let window = span("2024-05-01T09:00:00Z", "2024-05-01T17:00:00Z");
        let free = vec![
            // 50 minutes for a 30 minute meeting strands 20 minutes.
            span("2024-05-01T09:00:00Z", "2024-05-01T09:50:00Z"),
            // Exact fit.
            span("2024-05-01T11:00:00Z", "2024-05-01T11:30:00Z"),
            // Leaves a full 30 minutes.
            span("2024-05-01T13:00:00Z", "2024-05-01T14:00:00Z"),
        ];
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &request(30, window));

        let starts: Vec<_> = proposals.iter().map(|p| p.interval.start()).collect();
        assert_eq!(
            starts,
            vec![at("2024-05-01T11:00:00Z"), at("2024-05-01T13:00:00Z"), at("2024-05-01T09:00:00Z")]
        );
        assert_eq!(proposals[0].rank_reason, RankReason::LeastFragmenting);
        assert_eq!(proposals[1].rank_reason, RankReason::LeastFragmenting);
        assert_eq!(proposals[2].rank_reason, RankReason::EarliestAvailable);
    }

    #[test]
    fn test_earlier_days_beat_later_days() {
        let window = span("2024-05-01T00:00:00Z", "2024-05-04T00:00:00Z");
        let free = vec![
            span("2024-05-02T10:00:00Z", "2024-05-02T10:50:00Z"),
            span("2024-05-03T10:00:00Z", "2024-05-03T11:00:00Z"),
        ];
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &request(30, window));
        assert_eq!(proposals[0].interval.start(), at("2024-05-02T10:00:00Z"));
        assert_eq!(proposals[0].rank_reason, RankReason::EarliestAvailable);
    }

    #[test]
    fn test_week_edges_demoted_when_policy_enabled() {
        // Monday 2024-05-06: a morning slot in the preferred range vs an afternoon one.
        let window = span("2024-05-06T00:00:00Z", "2024-05-08T00:00:00Z");
        let free = vec![
            span("2024-05-06T09:00:00Z", "2024-05-06T10:00:00Z"),
            span("2024-05-06T14:00:00Z", "2024-05-06T15:00:00Z"),
        ];
        let req = request(60, window).with_preferred(HourRange::new(9, 12).unwrap());
        let ranker = SlotRanker::new(Tz::UTC).with_policy(RankingPolicy { avoid_week_edges: true });

        let proposals = ranker.rank(&free, &req);
        assert_eq!(proposals[0].interval.start(), at("2024-05-06T14:00:00Z"));
        assert_eq!(proposals[1].rank_reason, RankReason::EarliestAvailable);

        let plain = SlotRanker::new(Tz::UTC).rank(&free, &req);
        assert_eq!(plain[0].rank_reason, RankReason::WithinPreferredWindow);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let window = span("2024-05-01T08:00:00Z", "2024-05-03T18:00:00Z");
        let free = vec![
            span("2024-05-01T08:00:00Z", "2024-05-01T08:40:00Z"),
            span("2024-05-01T12:00:00Z", "2024-05-01T16:00:00Z"),
            span("2024-05-02T09:00:00Z", "2024-05-02T09:30:00Z"),
            span("2024-05-03T15:00:00Z", "2024-05-03T18:00:00Z"),
        ];
        let req = request(30, window).with_preferred(HourRange::new(15, 17).unwrap());
        let ranker = SlotRanker::new(New_York);

        let first = ranker.rank(&free, &req);
        let second = ranker.rank(&free, &req);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|pair| pair[0].rank_score >= pair[1].rank_score));
    }

    /// Over a multi-year window the preferred tier still wins.
    ///
    /// # Test Steps
    /// 1. A plain slot on the first day and a preferred slot 1049 days later
    /// 2. The preferred slot ranks first despite the distance
    /// 3. Scores still never increase down the list
    #[test]
    fn test_preferred_tier_survives_very_long_windows() {
        let window = span("2024-01-01T00:00:00Z", "2027-01-01T00:00:00Z");
        let free = vec![
            span("2024-01-01T09:00:00Z", "2024-01-01T10:00:00Z"),
            span("2026-11-15T13:00:00Z", "2026-11-15T14:00:00Z"),
        ];
        let req = request(60, window).with_preferred(HourRange::new(13, 17).unwrap());
        let proposals = SlotRanker::new(Tz::UTC).rank(&free, &req);

        assert_eq!(proposals[0].interval.start(), at("2026-11-15T13:00:00Z"));
        assert_eq!(proposals[0].rank_reason, RankReason::WithinPreferredWindow);
        assert_eq!(proposals[1].interval.start(), at("2024-01-01T09:00:00Z"));
        assert!(proposals[0].rank_score > proposals[1].rank_score);
    }

    #[test]
    fn test_nothing_long_enough_yields_nothing() {
        let window = span("2024-05-01T09:00:00Z", "2024-05-01T12:00:00Z");
        let free = vec![span("2024-05-01T11:30:00Z", "2024-05-01T12:00:00Z")];
        assert!(SlotRanker::new(Tz::UTC).rank(&free, &request(45, window)).is_empty());
    }
}
