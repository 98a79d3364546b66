//! Wizard session controller.
//!
//! A [`WizardSession`] owns the run state, the submitted project
//! configuration and the log sink. It starts runs, drives them on a spawned
//! task, cancels them on reset and exposes snapshots and subscriptions to
//! observers.
//!
//! Every mutation happens under one state lock, and every write from a driver
//! is checked against the run generation it was started with, so a stale
//! driver can never touch a newer run.

mod state;

pub use state::{RunState, WizardStep};

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cancellation::CancellationToken;
use crate::config::WizardConfig;
use crate::context::ProjectConfig;
use crate::core::LogEntry;
use crate::errors::WizardError;
use crate::events::{EventSink, LogSink, NoOpEventSink, RunEvent};
use crate::observability::SpanTimer;
use crate::pipeline::{Phase, PhaseMap, Progress, RunOutcome, Sequencer, Step};
use crate::preview::DashboardPreview;
use crate::refine::Refiner;
use crate::timeline::Timeline;
use crate::utils::{generate_uuid, now_utc};

/// Reason recorded when a run is cancelled by [`WizardSession::reset`].
pub const RESET_REASON: &str = "reset";

/// Reason recorded when a session is dropped with a run in flight.
pub const DROPPED_REASON: &str = "session dropped";

#[derive(Debug)]
struct ActiveRun {
    id: Uuid,
    token: Arc<CancellationToken>,
}

#[derive(Debug, Default)]
struct SessionCore {
    state: RunState,
    phase: Phase,
    config: Option<ProjectConfig>,
    active: Option<ActiveRun>,
    generation: u64,
}

struct Shared {
    core: Mutex<SessionCore>,
    log: LogSink,
    state_tx: watch::Sender<RunState>,
    events: Arc<dyn EventSink>,
}

impl Shared {
    fn publish(&self, state: &RunState) {
        self.state_tx.send_replace(state.clone());
    }

    fn emit_all(&self, events: &[RunEvent]) {
        for event in events {
            self.events.try_emit(event);
        }
    }

    /// Records one emitted stage. The caller holds the state lock.
    fn record(&self, core: &mut SessionCore, run_id: Uuid, progress: &Progress) -> Vec<RunEvent> {
        self.log.append(progress.entry.clone());
        let mut events = vec![RunEvent::EntryAppended {
            run_id,
            index: progress.index,
            entry: progress.entry.clone(),
        }];
        if progress.phase != core.phase {
            events.push(RunEvent::PhaseChanged {
                run_id,
                from: core.phase,
                to: progress.phase,
            });
            core.phase = progress.phase;
        }
        core.state = RunState::Running {
            stage_index: progress.index,
            phase: progress.phase,
        };
        events
    }

    /// Applies one stage emitted by a driver. Returns false if the run is stale.
    fn apply(&self, generation: u64, run_id: Uuid, progress: &Progress) -> bool {
        let events = {
            let mut core = self.core.lock();
            if core.generation != generation || !core.state.is_running() {
                debug!(%run_id, index = progress.index, "Dropping stale stage");
                return false;
            }
            let events = self.record(&mut core, run_id, progress);
            self.publish(&core.state);
            events
        };
        self.emit_all(&events);
        true
    }

    fn complete(&self, generation: u64, run_id: Uuid, emitted: usize, duration_ms: f64) {
        {
            let mut core = self.core.lock();
            if core.generation != generation || !core.state.is_running() {
                return;
            }
            let Some(config) = core.config.clone() else {
                return;
            };
            info!(%run_id, project = %config.name, emitted, duration_ms, "Run completed");
            core.state = RunState::Complete(config);
            core.active = None;
            self.publish(&core.state);
        }
        self.events.try_emit(&RunEvent::RunCompleted {
            run_id,
            emitted,
            duration_ms,
        });
    }
}

/// A consistent view of a session, taken under its state lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current run state.
    pub state: RunState,
    /// Current derived phase.
    pub phase: Phase,
    /// Log entries in append order.
    pub log: Vec<LogEntry>,
    /// Active or completed project configuration.
    pub config: Option<ProjectConfig>,
}

/// Handle to a started run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: Uuid,
    token: Arc<CancellationToken>,
    emitted: Arc<AtomicUsize>,
    done: oneshot::Receiver<RunOutcome>,
}

impl RunHandle {
    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns true once the run has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns the number of stages emitted so far.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Acquire)
    }

    /// Waits for the run to finish.
    ///
    /// If the driver is dropped without reporting, for example because its
    /// runtime shut down, the run counts as cancelled with the stages emitted
    /// up to that point.
    pub async fn wait(self) -> RunOutcome {
        match self.done.await {
            Ok(outcome) => outcome,
            Err(_) => RunOutcome::Cancelled {
                reason: self
                    .token
                    .reason()
                    .unwrap_or_else(|| "driver stopped".to_string()),
                emitted: self.emitted.load(Ordering::Acquire),
            },
        }
    }
}

/// Builder for [`WizardSession`].
pub struct WizardSessionBuilder {
    timeline: Timeline,
    phase_map: PhaseMap,
    refiner: Refiner,
    events: Arc<dyn EventSink>,
}

impl Default for WizardSessionBuilder {
    fn default() -> Self {
        Self {
            timeline: Timeline::default(),
            phase_map: PhaseMap::default(),
            refiner: Refiner::offline(),
            events: Arc::new(NoOpEventSink),
        }
    }
}

impl WizardSessionBuilder {
    /// Sets the timeline each run replays.
    #[must_use]
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    /// Sets the category-to-phase table.
    #[must_use]
    pub fn with_phase_map(mut self, phase_map: PhaseMap) -> Self {
        self.phase_map = phase_map;
        self
    }

    /// Sets the refinement collaborator.
    #[must_use]
    pub fn with_refiner(mut self, refiner: Refiner) -> Self {
        self.refiner = refiner;
        self
    }

    /// Sets the run event observer.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Builds the session in [`RunState::Idle`].
    #[must_use]
    pub fn build(self) -> WizardSession {
        let (state_tx, _) = watch::channel(RunState::Idle);
        WizardSession {
            shared: Arc::new(Shared {
                core: Mutex::new(SessionCore::default()),
                log: LogSink::new(),
                state_tx,
                events: self.events,
            }),
            timeline: self.timeline,
            phase_map: self.phase_map,
            refiner: self.refiner,
        }
    }
}

/// Controller for one wizard.
pub struct WizardSession {
    shared: Arc<Shared>,
    timeline: Timeline,
    phase_map: PhaseMap,
    refiner: Refiner,
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("state", &self.state())
            .field("stages", &self.timeline.len())
            .field("refiner", &self.refiner)
            .finish_non_exhaustive()
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WizardSession {
    /// Creates a session from configuration.
    #[must_use]
    pub fn new(config: &WizardConfig) -> Self {
        Self::builder()
            .with_timeline(config.timeline.clone())
            .with_refiner(Refiner::from_config(&config.refine))
            .build()
    }

    /// Returns a builder with the reference timeline and an offline refiner.
    #[must_use]
    pub fn builder() -> WizardSessionBuilder {
        WizardSessionBuilder::default()
    }

    /// Starts a run for `config`.
    ///
    /// The first stage is emitted before this returns; the rest play back on a
    /// spawned task, so this must be called from within a Tokio runtime.
    pub fn start(&self, config: ProjectConfig) -> Result<RunHandle, WizardError> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| WizardError::Config(format!("no Tokio runtime: {e}")))?;

        let mut sequencer = Sequencer::with_phase_map(self.timeline.clone(), self.phase_map.clone());
        let token = Arc::new(CancellationToken::new());
        let run_id = generate_uuid();
        let timer = SpanTimer::start("run");
        let shared = &self.shared;

        let (first, generation, events) = {
            let mut core = shared.core.lock();
            if core.state.is_running() {
                warn!(project = %config.name, "Start rejected, a run is already in progress");
                return Err(WizardError::AlreadyRunning);
            }

            core.generation += 1;
            let generation = core.generation;
            shared.log.clear();
            core.phase = Phase::Init;
            core.active = Some(ActiveRun {
                id: run_id,
                token: Arc::clone(&token),
            });
            core.state = RunState::Running {
                stage_index: 0,
                phase: Phase::Init,
            };
            info!(
                %run_id,
                project = %config.name,
                stages = self.timeline.len(),
                "Run started"
            );
            let mut events = vec![RunEvent::RunStarted {
                run_id,
                project: config.name.clone(),
                stages: self.timeline.len(),
                started_at: now_utc(),
            }];
            core.config = Some(config);

            let first = sequencer.step();
            if let Step::Emit(progress) = &first {
                events.extend(shared.record(&mut core, run_id, progress));
            }
            shared.publish(&core.state);
            (first, generation, events)
        };
        shared.emit_all(&events);

        let emitted = Arc::new(AtomicUsize::new(usize::from(matches!(first, Step::Emit(_)))));
        let (done_tx, done) = oneshot::channel();
        let driver = Arc::clone(shared);
        let driver_token = Arc::clone(&token);
        let driver_emitted = Arc::clone(&emitted);
        runtime.spawn(async move {
            let outcome = sequencer
                .drive(
                    first,
                    |progress| {
                        driver_emitted.fetch_add(1, Ordering::AcqRel);
                        driver.apply(generation, run_id, progress);
                    },
                    &driver_token,
                )
                .await;
            match &outcome {
                RunOutcome::Completed { emitted } => {
                    driver.complete(generation, run_id, *emitted, timer.finish());
                }
                RunOutcome::Cancelled { reason, emitted } => {
                    debug!(%run_id, reason = %reason, emitted, "Driver stopped");
                }
            }
            let _ = done_tx.send(outcome);
        });

        Ok(RunHandle {
            run_id,
            token,
            emitted,
            done,
        })
    }

    /// Cancels any active run and returns to [`RunState::Configuring`].
    ///
    /// Clears the log, the phase and the stored configuration. Returns false,
    /// changing nothing, when no run has been started since the last reset.
    pub fn reset(&self) -> bool {
        let cancelled = {
            let mut core = self.shared.core.lock();
            if matches!(core.state, RunState::Idle | RunState::Configuring) {
                debug!("Reset ignored, no run to discard");
                return false;
            }

            core.generation += 1;
            let active = core.active.take();
            self.shared.log.clear();
            core.phase = Phase::Init;
            core.config = None;
            core.state = RunState::Configuring;
            self.shared.publish(&core.state);
            active
        };

        if let Some(run) = cancelled {
            run.token.cancel(RESET_REASON);
            info!(run_id = %run.id, "Run cancelled by reset");
            self.shared.events.try_emit(&RunEvent::RunCancelled {
                run_id: run.id,
                reason: RESET_REASON.to_string(),
            });
        }
        true
    }

    /// Refines the draft description of `config`.
    ///
    /// The draft is not modified; the caller decides whether to adopt the
    /// returned text.
    pub async fn refine_description(&self, config: &ProjectConfig) -> Result<String, WizardError> {
        if self.state().is_running() {
            return Err(WizardError::AlreadyRunning);
        }
        config.validate()?;
        Ok(self
            .refiner
            .refine(&config.description, &config.target_audience)
            .await)
    }

    /// Returns the current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.shared.core.lock().state.clone()
    }

    /// Returns the current derived phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.core.lock().phase
    }

    /// Returns the active or completed configuration.
    #[must_use]
    pub fn config(&self) -> Option<ProjectConfig> {
        self.shared.core.lock().config.clone()
    }

    /// Returns the identifier of the run in flight.
    #[must_use]
    pub fn active_run(&self) -> Option<Uuid> {
        self.shared.core.lock().active.as_ref().map(|run| run.id)
    }

    /// Returns a copy of the log.
    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.shared.log.snapshot()
    }

    /// Returns a handle to the log sink.
    #[must_use]
    pub fn log_sink(&self) -> LogSink {
        self.shared.log.clone()
    }

    /// Returns a consistent snapshot of state, phase, log and configuration.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let core = self.shared.core.lock();
        SessionSnapshot {
            state: core.state.clone(),
            phase: core.phase,
            log: self.shared.log.snapshot(),
            config: core.config.clone(),
        }
    }

    /// Subscribes to run state changes.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.shared.state_tx.subscribe()
    }

    /// Subscribes to log length changes.
    #[must_use]
    pub fn subscribe_log(&self) -> watch::Receiver<usize> {
        self.shared.log.subscribe()
    }

    /// Returns the dashboard preview of the completed run.
    pub fn preview(&self) -> Result<DashboardPreview, WizardError> {
        self.shared
            .core
            .lock()
            .state
            .completed_config()
            .map(DashboardPreview::from_config)
            .ok_or(WizardError::NoConfig)
    }

    /// Returns the timeline runs replay.
    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Returns the refinement collaborator.
    #[must_use]
    pub const fn refiner(&self) -> &Refiner {
        &self.refiner
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        if let Some(run) = self.shared.core.lock().active.take() {
            run.token.cancel(DROPPED_REASON);
        }
    }
}
