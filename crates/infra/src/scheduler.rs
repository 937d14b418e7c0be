//! Assistant-facing scheduler
//!
//! Fetches events from every connected calendar concurrently, bounded by a
//! single caller-side timeout, then hands the snapshot to the core
//! [`SchedulingService`]. The core itself never waits on I/O.
//!
//! Turns for one session are serialized here as well: a per-session async
//! gate is held from planning through fetching to resolving. History changes
//! made around the scheduler (directly on the service) are caught when the
//! planned request is resolved, and the turn is planned and fetched again.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cadence_core::SchedulingService;
//! use cadence_domain::{SchedulerConfig, SchedulingRequest};
//! use cadence_infra::calendar::InMemoryCalendarSource;
//! use cadence_infra::AssistantScheduler;
//!
//! # async fn example(request: SchedulingRequest) -> cadence_domain::Result<()> {
//! let config = SchedulerConfig::default();
//! let scheduler = AssistantScheduler::from_config(
//!     &config,
//!     vec![Arc::new(InMemoryCalendarSource::new("work"))],
//! )?;
//!
//! let result = scheduler.schedule("session-1", &request).await?;
//! println!("{} proposals", result.proposals.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use cadence_common::time::{Clock, SystemClock};
use cadence_core::{CalendarSource, SchedulingService};
use cadence_domain::constants::{DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_SEARCH_DAYS};
use cadence_domain::{
    Interval, RawEvent, Result, SchedulerConfig, SchedulingError, SchedulingRequest,
};
use dashmap::DashMap;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

pub use cadence_core::SchedulingResult;

/// Plan/fetch rounds before giving up on a session whose history keeps
/// changing under it.
const MAX_PLAN_ATTEMPTS: u32 = 3;

/// Runs scheduling requests against live calendar sources.
pub struct AssistantScheduler {
    service: Arc<SchedulingService>,
    sources: Vec<Arc<dyn CalendarSource>>,
    fetch_timeout: Duration,
    default_search_days: u32,
    clock: Arc<dyn Clock>,
    session_gates: DashMap<String, Arc<AsyncMutex<()>>>,
}

impl AssistantScheduler {
    pub fn new(service: Arc<SchedulingService>, sources: Vec<Arc<dyn CalendarSource>>) -> Self {
        Self {
            service,
            sources,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            default_search_days: DEFAULT_SEARCH_DAYS,
            clock: Arc::new(SystemClock),
            session_gates: DashMap::new(),
        }
    }

    /// Build the service and the fetch budget from one configuration.
    pub fn from_config(
        config: &SchedulerConfig,
        sources: Vec<Arc<dyn CalendarSource>>,
    ) -> Result<Self> {
        let service = Arc::new(SchedulingService::from_config(config)?);
        Ok(Self {
            fetch_timeout: Duration::from_millis(config.fetch_timeout_ms),
            default_search_days: config.default_search_days,
            ..Self::new(service, sources)
        })
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Clock used for [`AssistantScheduler::default_window`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn add_source(&mut self, source: Arc<dyn CalendarSource>) {
        self.sources.push(source);
    }

    pub fn service(&self) -> &Arc<SchedulingService> {
        &self.service
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.source_id()).collect()
    }

    /// `[now, now + default_search_days)` in the working zone.
    pub fn default_window(&self) -> Result<Interval> {
        let zone = self.service.coordinator().zone();
        let now = self.clock.now().with_timezone(&zone);
        let span = chrono::Duration::days(i64::from(self.default_search_days));
        Interval::starting_at(now.fixed_offset(), span)
    }

    /// Resolve `request` for `session_id` against fresh calendar data.
    ///
    /// Events are fetched for the window the request will actually search,
    /// so relative follow-ups fetch around their shifted window.
    #[instrument(skip(self, request), fields(session = %session_id, sources = self.sources.len()))]
    pub async fn schedule(
        &self,
        session_id: &str,
        request: &SchedulingRequest,
    ) -> Result<SchedulingResult> {
        let gate = self.session_gate(session_id);
        let _turn = gate.lock().await;

        for attempt in 1..=MAX_PLAN_ATTEMPTS {
            let planned = self.service.plan(session_id, request)?;
            let events = self.fetch_all(&planned.request.search_window).await?;

            if let Some(result) =
                self.service.resolve_planned(session_id, request, &planned, &events)?
            {
                info!(
                    events = events.len(),
                    attempt,
                    proposals = result.proposals.len(),
                    no_availability = result.no_availability,
                    "Scheduling completed"
                );
                return Ok(result);
            }
            debug!(attempt, "Session history changed during fetch, planning again");
        }

        warn!(attempts = MAX_PLAN_ATTEMPTS, "Session history kept changing during fetch");
        Err(SchedulingError::Internal(format!(
            "session `{session_id}` changed during every calendar fetch"
        )))
    }

    /// Like [`AssistantScheduler::schedule`] for a fresh request over the
    /// default window.
    pub async fn schedule_soon(
        &self,
        session_id: &str,
        duration: chrono::Duration,
    ) -> Result<SchedulingResult> {
        let request = SchedulingRequest::new(duration, self.default_window()?)?;
        self.schedule(session_id, &request).await
    }

    /// Drop a session's history and its gate. Returns whether the session
    /// had any history.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.session_gates.remove(session_id);
        self.service.end_session(session_id)
    }

    /// Fetch every source concurrently. The whole fan-out shares one
    /// timeout; on expiry the outstanding fetches are aborted. The first
    /// failing source fails the batch.
    pub async fn fetch_all(&self, window: &Interval) -> Result<Vec<RawEvent>> {
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let window = *window;
            tasks.spawn(async move { source.fetch_events(&window).await });
        }

        let collected = tokio::time::timeout(self.fetch_timeout, async {
            let mut events = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                let fetched = joined.map_err(|e| {
                    SchedulingError::Internal(format!("calendar fetch task failed: {e}"))
                })?;
                match fetched {
                    Ok(batch) => events.extend(batch),
                    Err(e) => {
                        warn!(error = %e, kind = e.label(), "Calendar source failed");
                        return Err(e);
                    }
                }
            }
            Ok(events)
        })
        .await;

        match collected {
            Ok(events) => {
                let events = events?;
                debug!(events = events.len(), window = %window, "Calendar events fetched");
                Ok(events)
            }
            Err(_) => {
                let after_ms = u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(after_ms, "Calendar fetch timed out");
                Err(SchedulingError::Timeout {
                    operation: "fetch calendar events".to_string(),
                    after_ms,
                })
            }
        }
    }

    fn session_gate(&self, session_id: &str) -> Arc<AsyncMutex<()>> {
        // Clone out so the shard lock is not held across an await.
        let gate = self
            .session_gates
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        gate
    }
}
