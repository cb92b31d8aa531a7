//! Data refresh coordinator
//!
//! Keeps one cache slot per data source fresh. A cycle fans out every fetch at
//! once, bounds each by the fetch timeout, and swaps in the source's fallback
//! payload whenever a fetch fails. Cycles never fail and never overlap.

use super::cache::{Cache, SourceStatus};
use super::core::{EventSender, RefreshConfig};
use crate::consts::cli_consts::refresh;
use crate::display::DisplayModel;
use crate::error_classifier::ErrorClassifier;
use crate::events::{CycleState, EventType};
use crate::logging::LogLevel;
use crate::network::FetchError;
use crate::sources::{DataSource, Payload};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// What one source contributed to a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Live(Payload),
    Fallback { payload: Payload, reason: String },
}

impl SourceOutcome {
    pub fn payload(&self) -> &Payload {
        match self {
            SourceOutcome::Live(payload) => payload,
            SourceOutcome::Fallback { payload, .. } => payload,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SourceOutcome::Live(_))
    }
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Outcomes in source registration order.
    pub outcomes: Vec<(String, SourceOutcome)>,
}

impl CycleReport {
    pub fn live_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_live()).count()
    }

    pub fn outcome(&self, name: &str) -> Option<&SourceOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(CycleReport),
    /// Another cycle was already running; nothing was fetched.
    Skipped,
}

impl RefreshOutcome {
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            RefreshOutcome::Completed(report) => Some(report),
            RefreshOutcome::Skipped => None,
        }
    }
}

struct TimerHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct Shared {
    sources: Vec<Arc<dyn DataSource>>,
    config: RefreshConfig,
    cache: Mutex<Cache>,
    in_progress: AtomicBool,
    cycles: AtomicU64,
    timer: Mutex<Option<TimerHandle>>,
    shutdown: CancellationToken,
    events: EventSender,
    display: watch::Sender<DisplayModel>,
    classifier: ErrorClassifier,
}

/// Clears the in-progress flag even if the cycle future is dropped early.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Cheap to clone; all clones share one cache and one timer.
#[derive(Clone)]
pub struct RefreshCoordinator {
    shared: Arc<Shared>,
}

impl RefreshCoordinator {
    pub fn new(
        sources: Vec<Arc<dyn DataSource>>,
        config: RefreshConfig,
        events: EventSender,
    ) -> Self {
        let cache = Cache::new(sources.iter().map(|s| s.name()));
        let initial = DisplayModel::build(0, None, &sources, &cache);
        let (display, _) = watch::channel(initial);

        Self {
            shared: Arc::new(Shared {
                sources,
                config,
                cache: Mutex::new(cache),
                in_progress: AtomicBool::new(false),
                cycles: AtomicU64::new(0),
                timer: Mutex::new(None),
                shutdown: CancellationToken::new(),
                events,
                display,
                classifier: ErrorClassifier::new(),
            }),
        }
    }

    pub fn config(&self) -> RefreshConfig {
        self.shared.config
    }

    pub fn source_names(&self) -> Vec<String> {
        self.shared
            .sources
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Runs one cycle, waits for it, then makes sure the periodic timer runs.
    ///
    /// If a cycle is already running no second one starts and `Skipped` is
    /// returned, but the timer is still started when it is not running.
    pub async fn initialize(&self) -> RefreshOutcome {
        let outcome = self.refresh_all_data().await;
        if !self.is_auto_refreshing().await {
            self.start_auto_refresh().await;
        }
        outcome
    }

    /// Attempts every source concurrently and updates the cache.
    ///
    /// Returns `Skipped` without fetching when a cycle is already in flight.
    pub async fn refresh_all_data(&self) -> RefreshOutcome {
        if self
            .shared
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Refresh already in progress, skipping");
            self.shared.events.send_coordinator_event(
                "Refresh already in progress, skipped".to_string(),
                EventType::Waiting,
                LogLevel::Debug,
            );
            return RefreshOutcome::Skipped;
        }
        let _guard = CycleGuard(&self.shared.in_progress);

        RefreshOutcome::Completed(self.run_cycle().await)
    }

    async fn run_cycle(&self) -> CycleReport {
        let shared = &self.shared;
        let cycle = shared.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let started_at = Utc::now();
        shared.events.send_state(
            CycleState::Refreshing,
            format!("Refresh cycle {} started", cycle),
        );
        log::debug!(
            "Refresh cycle {} started for {} sources",
            cycle,
            shared.sources.len()
        );

        let timeout = shared.config.fetch_timeout;
        let cancel = &shared.shutdown;
        let fetches = shared.sources.iter().map(|source| async move {
            let result = match tokio::time::timeout(timeout, source.fetch(cancel)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };
            (source, result)
        });
        let results = join_all(fetches).await;

        let finished_at = Utc::now();
        let mut outcomes = Vec::with_capacity(results.len());
        {
            let mut cache = shared.cache.lock().await;
            for (source, result) in results {
                let name = source.name();
                let outcome = match result {
                    Ok(payload) => {
                        log::info!("{}: live data for {}", name, period_of(&payload));
                        shared.events.send_source_event(
                            name,
                            format!("Live data for {}", period_of(&payload)),
                            EventType::Success,
                            LogLevel::Info,
                        );
                        cache.record_live(name, payload.clone(), finished_at);
                        SourceOutcome::Live(payload)
                    }
                    Err(err) => {
                        let level = shared.classifier.classify_fetch_error(&err);
                        let reason = err.to_string();
                        let log_level: log::Level = level.into();
                        log::log!(log_level, "{}: unavailable, using fallback: {}", name, reason);
                        shared.events.send_source_event(
                            name,
                            format!("Unavailable, showing fallback data ({})", reason),
                            EventType::Error,
                            level,
                        );
                        let payload = source.fallback();
                        cache.record_fallback(name, payload.clone(), reason.clone(), finished_at);
                        SourceOutcome::Fallback { payload, reason }
                    }
                };
                outcomes.push((name.to_string(), outcome));
            }

            let model = DisplayModel::build(cycle, Some(finished_at), &shared.sources, &cache);
            shared.display.send_replace(model);
        }

        let report = CycleReport {
            cycle,
            started_at,
            finished_at,
            outcomes,
        };
        let summary = format!(
            "Refresh cycle {} finished: {}/{} sources live",
            cycle,
            report.live_count(),
            report.outcomes.len()
        );
        log::info!("{}", summary);
        shared.events.send_coordinator_event(
            summary.clone(),
            EventType::Refresh,
            if report.live_count() == report.outcomes.len() {
                LogLevel::Info
            } else {
                LogLevel::Warn
            },
        );
        shared.events.send_state(CycleState::Idle, summary);
        report
    }

    /// Starts the periodic timer, replacing any timer already running.
    pub async fn start_auto_refresh(&self) {
        let mut timer = self.shared.timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.cancel.cancel();
        }

        let cancel = self.shared.shutdown.child_token();
        let handle = spawn_timer(
            Arc::downgrade(&self.shared),
            self.shared.config,
            cancel.clone(),
        );
        *timer = Some(TimerHandle { cancel, handle });

        self.shared.events.send_coordinator_event(
            format!(
                "Auto-refresh every {}s",
                self.shared.config.interval.as_secs()
            ),
            EventType::Scheduled,
            LogLevel::Info,
        );
    }

    /// Cancels the periodic timer. A cycle already running is left to finish.
    pub async fn stop_auto_refresh(&self) {
        if let Some(timer) = self.shared.timer.lock().await.take() {
            timer.cancel.cancel();
            log::debug!("Auto-refresh stopped");
        }
    }

    pub async fn is_auto_refreshing(&self) -> bool {
        self.shared
            .timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished() && !t.cancel.is_cancelled())
    }

    pub fn is_refreshing(&self) -> bool {
        self.shared.in_progress.load(Ordering::Acquire)
    }

    /// Stops the timer and cancels fetches still in flight.
    pub async fn dispose(&self) {
        self.stop_auto_refresh().await;
        self.shared.shutdown.cancel();
    }

    /// Per-source status in registration order.
    pub async fn status(&self) -> Vec<SourceStatus> {
        let cache = self.shared.cache.lock().await;
        self.shared
            .sources
            .iter()
            .filter_map(|s| cache.get(s.name()).map(|e| e.status().clone()))
            .collect()
    }

    pub async fn all_online(&self) -> bool {
        self.status().await.iter().all(SourceStatus::is_live)
    }

    /// The cached payload for one source, live or fallback.
    pub async fn payload(&self, name: &str) -> Option<Payload> {
        self.shared
            .cache
            .lock()
            .await
            .get(name)
            .and_then(|e| e.payload().cloned())
    }

    pub fn display_model(&self) -> DisplayModel {
        self.shared.display.borrow().clone()
    }

    /// Receives a new display model after every completed cycle.
    pub fn subscribe(&self) -> watch::Receiver<DisplayModel> {
        self.shared.display.subscribe()
    }
}

fn period_of(payload: &Payload) -> &str {
    payload.period.as_deref().unwrap_or("latest period")
}

/// The timer only holds a weak reference, so dropping every coordinator
/// handle ends it at the next tick.
fn spawn_timer(
    shared: Weak<Shared>,
    config: RefreshConfig,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = config
            .interval
            .clamp(Duration::from_millis(1), refresh::max_refresh_interval());
        let start = Instant::now()
            .checked_add(period)
            .unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(shared) = shared.upgrade() else {
                        break;
                    };
                    shared.events.send_coordinator_event(
                        "Timer tick".to_string(),
                        EventType::Scheduled,
                        LogLevel::Debug,
                    );
                    let coordinator = RefreshCoordinator { shared };
                    // Spawned so that stopping the timer never aborts a running cycle.
                    tokio::spawn(async move {
                        coordinator.refresh_all_data().await;
                    });
                }
            }
        }
    })
}
