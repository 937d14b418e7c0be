//! Ranked slot proposals

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::impl_domain_status_conversions;

/// Why a proposal landed where it did in the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankReason {
    WithinPreferredWindow,
    EarliestAvailable,
    LeastFragmenting,
}

impl_domain_status_conversions!(RankReason {
    WithinPreferredWindow => "within-preferred-window",
    EarliestAvailable => "earliest-available",
    LeastFragmenting => "least-fragmenting",
});

/// One candidate meeting slot. Never mutated after ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotProposal {
    pub interval: Interval,
    pub rank_score: f64,
    pub rank_reason: RankReason,
}
