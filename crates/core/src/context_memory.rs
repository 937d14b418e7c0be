//! Context memory - bounded per-session scheduling history
//!
//! Holds the most recent turns, oldest first. Overflow evicts the oldest
//! entry; that is the memory policy, not an error. A reference that matches
//! nothing resolves to `None` and the caller starts fresh.

use cadence_common::collections::RingBuffer;
use cadence_domain::constants::DEFAULT_CONTEXT_CAPACITY;
use cadence_domain::{
    ContextEntry, ContextSnapshot, EntryToken, RelativeReference, Result, SchedulingError,
    SlotProposal,
};
use tracing::debug;

/// Session-scoped history of resolved requests.
#[derive(Debug, Clone)]
pub struct ContextMemory {
    entries: RingBuffer<ContextEntry>,
}

impl Default for ContextMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_CAPACITY)
    }
}

impl ContextMemory {
    /// Create an empty history holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self { entries: RingBuffer::new(capacity) }
    }

    /// Rebuild a history from a snapshot. Entries beyond the capacity are
    /// dropped oldest first.
    pub fn restore(snapshot: ContextSnapshot) -> Self {
        Self { entries: RingBuffer::from_oldest_first(snapshot.capacity, snapshot.entries) }
    }

    /// Copy of the history for optional durability.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            capacity: self.entries.capacity(),
            entries: self.entries.iter().cloned().collect(),
        }
    }

    /// Append a resolved turn, returning the entry evicted to make room.
    pub fn append(&mut self, entry: ContextEntry) -> Option<ContextEntry> {
        let evicted = self.entries.push(entry);
        if let Some(old) = &evicted {
            debug!(evicted = %old.token, capacity = self.entries.capacity(), "Context entry evicted");
        }
        evicted
    }

    pub fn latest(&self) -> Option<&ContextEntry> {
        self.entries.last()
    }

    /// Look up a prior turn by position or token.
    pub fn resolve_relative(&self, reference: &RelativeReference) -> Option<&ContextEntry> {
        match reference {
            RelativeReference::Latest => self.latest(),
            RelativeReference::StepsBack(steps) => self.entries.get_from_newest(*steps),
            RelativeReference::Token(token) => self.get(token),
        }
    }

    pub fn get(&self, token: &EntryToken) -> Option<&ContextEntry> {
        self.entries.iter().rev().find(|entry| entry.token == *token)
    }

    /// Mark proposal `index` of turn `token` as the one the user picked.
    pub fn record_choice(&mut self, token: &EntryToken, index: usize) -> Result<SlotProposal> {
        let entry = self.entries.find_newest_mut(|entry| entry.token == *token).ok_or_else(|| {
            SchedulingError::InvalidInput(format!("no history entry for token {token}"))
        })?;

        let proposal = entry.proposals.get(index).cloned().ok_or_else(|| {
            SchedulingError::InvalidInput(format!(
                "entry {token} has {} proposals, index {index} is out of range",
                entry.proposals.len()
            ))
        })?;
        entry.chosen = Some(proposal.clone());
        Ok(proposal)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ContextEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Forget everything (session end).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
