//! Session registry - the engine's entry point for callers
//!
//! Each session owns one [`ContextMemory`] behind its own mutex, held for the
//! whole of a resolve, so two requests for the same session run one after
//! the other. Different sessions never share a lock.

use std::sync::Arc;

use cadence_domain::{
    ContextEntry, ContextSnapshot, EntryToken, Interval, Result, SchedulerConfig, SchedulingError,
    SchedulingRequest, SlotProposal,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::context_memory::ContextMemory;
use crate::coordinator::{PlannedRequest, Resolution, SchedulingCoordinator};
use crate::timeline::BusyItem;

/// Structured result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingResult {
    pub proposals: Vec<SlotProposal>,
    pub no_availability: bool,
    pub entry_token: EntryToken,
    /// A relative reference could not be resolved and the request ran fresh.
    pub context_miss: bool,
    /// The search window that was actually used.
    pub window: Interval,
}

impl From<Resolution> for SchedulingResult {
    fn from(resolution: Resolution) -> Self {
        Self {
            window: resolution.effective_request.search_window,
            proposals: resolution.proposals,
            no_availability: resolution.no_availability,
            entry_token: resolution.entry_token,
            context_miss: resolution.context_miss,
        }
    }
}

type SharedMemory = Arc<Mutex<ContextMemory>>;

/// Multi-session scheduling service.
pub struct SchedulingService {
    coordinator: SchedulingCoordinator,
    sessions: DashMap<String, SharedMemory>,
    context_capacity: usize,
}

impl SchedulingService {
    pub fn new(coordinator: SchedulingCoordinator, context_capacity: usize) -> Self {
        Self { coordinator, sessions: DashMap::new(), context_capacity: context_capacity.max(1) }
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self> {
        let coordinator = SchedulingCoordinator::from_config(config)?;
        Ok(Self::new(coordinator, config.context_capacity))
    }

    pub fn coordinator(&self) -> &SchedulingCoordinator {
        &self.coordinator
    }

    /// Resolve a request for `session_id`, creating the session on first use.
    #[instrument(skip(self, request, events), fields(session = %session_id))]
    pub fn resolve<E: BusyItem>(
        &self,
        session_id: &str,
        request: &SchedulingRequest,
        events: &[E],
    ) -> Result<SchedulingResult> {
        let shared = self.session(session_id)?;
        let mut memory = shared.lock();

        let resolution = self.coordinator.resolve(request, events, &mut memory)?;
        info!(
            proposals = resolution.proposals.len(),
            no_availability = resolution.no_availability,
            context_miss = resolution.context_miss,
            "Scheduling request resolved"
        );

        Ok(resolution.into())
    }

    /// Resolve a request whose events were fetched for `planned`.
    ///
    /// The request is planned again under the session lock. If the history
    /// moved since `planned` was computed the fetched events may not cover
    /// the new window, so nothing is resolved or recorded and `Ok(None)` is
    /// returned; the caller should plan and fetch again.
    #[instrument(skip(self, request, planned, events), fields(session = %session_id))]
    pub fn resolve_planned<E: BusyItem>(
        &self,
        session_id: &str,
        request: &SchedulingRequest,
        planned: &PlannedRequest,
        events: &[E],
    ) -> Result<Option<SchedulingResult>> {
        let shared = self.session(session_id)?;
        let mut memory = shared.lock();

        let current = self.coordinator.plan(request, &memory)?;
        if current != *planned {
            debug!(
                planned = %planned.request.search_window,
                current = %current.request.search_window,
                "Session history changed since planning"
            );
            return Ok(None);
        }

        let resolution = self.coordinator.resolve_planned(current, events, &mut memory)?;
        info!(
            proposals = resolution.proposals.len(),
            no_availability = resolution.no_availability,
            context_miss = resolution.context_miss,
            "Planned request resolved"
        );
        Ok(Some(resolution.into()))
    }

    /// Preview how `request` would be interpreted for `session_id` without
    /// touching its history. Unknown sessions behave as empty ones.
    pub fn plan(&self, session_id: &str, request: &SchedulingRequest) -> Result<PlannedRequest> {
        validate_session_id(session_id)?;
        match self.existing(session_id) {
            Some(shared) => {
                let memory = shared.lock();
                self.coordinator.plan(request, &memory)
            }
            None => self.coordinator.plan(request, &ContextMemory::new(self.context_capacity)),
        }
    }

    /// Record which proposal of a past turn the user picked.
    pub fn choose(&self, session_id: &str, token: &EntryToken, index: usize) -> Result<SlotProposal> {
        let memory = self.existing(session_id).ok_or_else(|| unknown_session(session_id))?;
        let chosen = memory.lock().record_choice(token, index)?;
        debug!(session = %session_id, %token, index, "Proposal chosen");
        Ok(chosen)
    }

    /// History of a session, oldest first. Empty for unknown sessions.
    pub fn history(&self, session_id: &str) -> Vec<ContextEntry> {
        let Some(shared) = self.existing(session_id) else {
            return Vec::new();
        };
        let entries = shared.lock().iter().cloned().collect();
        entries
    }

    pub fn snapshot(&self, session_id: &str) -> Option<ContextSnapshot> {
        let shared = self.existing(session_id)?;
        let snapshot = shared.lock().snapshot();
        Some(snapshot)
    }

    /// Replace a session's history with a previously saved snapshot.
    pub fn restore(&self, session_id: &str, snapshot: ContextSnapshot) -> Result<()> {
        validate_session_id(session_id)?;
        let restored = ContextMemory::restore(snapshot);
        debug!(session = %session_id, entries = restored.len(), "Session restored");
        self.sessions.insert(session_id.to_string(), Arc::new(Mutex::new(restored)));
        Ok(())
    }

    /// Drop a session and its history. Returns whether it existed.
    pub fn end_session(&self, session_id: &str) -> bool {
        match self.sessions.remove(session_id) {
            Some((_, memory)) => {
                memory.lock().clear();
                debug!(session = %session_id, "Session ended");
                true
            }
            None => false,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn session(&self, session_id: &str) -> Result<SharedMemory> {
        validate_session_id(session_id)?;
        // Clone the handle so the map shard is released before locking.
        let memory = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ContextMemory::new(self.context_capacity))))
            .clone();
        Ok(memory)
    }

    fn existing(&self, session_id: &str) -> Option<SharedMemory> {
        self.sessions.get(session_id).map(|entry| Arc::clone(entry.value()))
    }
}

fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.trim().is_empty() {
        return Err(SchedulingError::InvalidInput("session id must not be empty".into()));
    }
    Ok(())
}

fn unknown_session(session_id: &str) -> SchedulingError {
    SchedulingError::InvalidInput(format!("unknown session `{session_id}`"))
}
