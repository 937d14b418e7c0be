//! Conversation history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::proposal::SlotProposal;
use super::request::SchedulingRequest;

/// Opaque handle to one resolved turn. Time-ordered (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryToken(Uuid);

impl EntryToken {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryToken {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntryToken {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for EntryToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for EntryToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One resolved scheduling turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub token: EntryToken,
    /// The request as actually executed (relative adjustments applied).
    pub request: SchedulingRequest,
    pub proposals: Vec<SlotProposal>,
    pub chosen: Option<SlotProposal>,
    pub created_at: DateTime<Utc>,
}

impl ContextEntry {
    pub fn new(
        request: SchedulingRequest,
        proposals: Vec<SlotProposal>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { token: EntryToken::new(), request, proposals, chosen: None, created_at }
    }

    /// The proposal follow-ups are measured from: the chosen one, else the
    /// top-ranked one.
    pub fn anchor(&self) -> Option<&SlotProposal> {
        self.chosen.as_ref().or_else(|| self.proposals.first())
    }
}

/// Serializable copy of a session's history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub capacity: usize,
    pub entries: Vec<ContextEntry>,
}
