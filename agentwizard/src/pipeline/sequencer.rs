//! Timeline playback.
//!
//! [`Sequencer`] is an explicit state machine over a [`Timeline`]: each call
//! to [`Sequencer::step`] synchronously produces the next transition, and the
//! async drivers ([`Sequencer::run`], [`Sequencer::drive`],
//! [`Sequencer::stream`]) suspend between transitions. Every suspension races
//! its timer against a [`CancellationToken`].

use futures::stream::{self, Stream};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::phase::{Phase, PhaseMap, PhaseTracker};
use crate::cancellation::CancellationToken;
use crate::core::LogEntry;
use crate::timeline::Timeline;

/// Progress emitted for one visited stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based stage index.
    pub index: usize,
    /// The entry materialized for this visit.
    pub entry: LogEntry,
    /// Derived phase after this stage.
    pub phase: Phase,
    /// Suspension that follows this stage.
    pub delay: Duration,
}

/// One transition of the playback state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A stage was visited; suspend for `delay` before the next step.
    Emit(Progress),
    /// All stages are done; suspend for the trailing grace delay.
    Trailing(Duration),
    /// Playback is over.
    Finished,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage was emitted and the trailing delay elapsed.
    Completed {
        /// Number of entries emitted.
        emitted: usize,
    },
    /// The run was cancelled before completion.
    Cancelled {
        /// The cancellation reason.
        reason: String,
        /// Number of entries emitted before cancellation.
        emitted: usize,
    },
}

impl RunOutcome {
    /// Returns true if the run completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns the number of entries the run emitted.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        match self {
            Self::Completed { emitted } | Self::Cancelled { emitted, .. } => *emitted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Stage(usize),
    Finished,
}

/// Replays a timeline one stage at a time.
#[derive(Debug, Clone)]
pub struct Sequencer {
    timeline: Timeline,
    phases: PhaseTracker,
    cursor: Cursor,
    emitted: usize,
}

impl Sequencer {
    /// Creates a sequencer with the default phase map.
    #[must_use]
    pub fn new(timeline: Timeline) -> Self {
        Self::with_phase_map(timeline, PhaseMap::default())
    }

    /// Creates a sequencer with a custom phase map.
    #[must_use]
    pub fn with_phase_map(timeline: Timeline, map: PhaseMap) -> Self {
        Self {
            timeline,
            phases: PhaseTracker::new(map),
            cursor: Cursor::Stage(0),
            emitted: 0,
        }
    }

    /// Returns the timeline being replayed.
    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Returns the current derived phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phases.current()
    }

    /// Returns the number of entries emitted so far.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// Returns true once [`Step::Finished`] has been produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor == Cursor::Finished
    }

    /// Advances the state machine by one transition.
    ///
    /// After the last stage this yields [`Step::Trailing`] once, then
    /// [`Step::Finished`] forever.
    pub fn step(&mut self) -> Step {
        let Cursor::Stage(index) = self.cursor else {
            return Step::Finished;
        };

        match self.timeline.get(index) {
            Some(stage) => {
                let phase = self.phases.observe(stage.category);
                let entry = stage.to_entry();
                self.emitted += 1;
                self.cursor = Cursor::Stage(index + 1);
                debug!(
                    index,
                    agent = %stage.category,
                    phase = %phase,
                    delay_ms = stage.delay_ms,
                    "Stage emitted"
                );
                Step::Emit(Progress {
                    index,
                    entry,
                    phase,
                    delay: stage.delay(),
                })
            }
            None => {
                self.cursor = Cursor::Finished;
                Step::Trailing(self.timeline.trailing_delay())
            }
        }
    }

    /// Plays the whole timeline, calling `on_progress` for every stage.
    pub async fn run<F>(mut self, mut on_progress: F, token: &CancellationToken) -> RunOutcome
    where
        F: FnMut(&Progress),
    {
        let first = self.step();
        if let Step::Emit(progress) = &first {
            on_progress(progress);
        }
        self.drive(first, on_progress, token).await
    }

    /// Continues playback after `current`, which the caller has already
    /// delivered.
    ///
    /// This lets a caller apply the first stage synchronously and hand the
    /// rest of the run to a spawned task.
    pub async fn drive<F>(
        mut self,
        current: Step,
        mut on_progress: F,
        token: &CancellationToken,
    ) -> RunOutcome
    where
        F: FnMut(&Progress),
    {
        let mut current = current;
        loop {
            match current {
                Step::Emit(progress) => {
                    if !pause(progress.delay, token).await {
                        return self.cancelled(token);
                    }
                }
                Step::Trailing(delay) => {
                    if !pause(delay, token).await {
                        return self.cancelled(token);
                    }
                }
                Step::Finished => {
                    return RunOutcome::Completed {
                        emitted: self.emitted,
                    };
                }
            }

            current = self.step();
            if let Step::Emit(progress) = &current {
                on_progress(progress);
            }
        }
    }

    /// Plays the timeline as a lazy stream of progress values.
    ///
    /// Each item is yielded as soon as its stage is visited; the stage's delay
    /// is awaited when the next item is polled. The stream ends after the
    /// trailing delay, or early on cancellation.
    pub fn stream(self, token: Arc<CancellationToken>) -> impl Stream<Item = Progress> {
        stream::unfold(
            (self, token, None::<Duration>),
            |(mut sequencer, token, pending)| async move {
                if let Some(delay) = pending {
                    if !pause(delay, &token).await {
                        return None;
                    }
                }
                loop {
                    if token.is_cancelled() {
                        return None;
                    }
                    match sequencer.step() {
                        Step::Emit(progress) => {
                            let delay = progress.delay;
                            return Some((progress, (sequencer, token, Some(delay))));
                        }
                        Step::Trailing(delay) => {
                            if !pause(delay, &token).await {
                                return None;
                            }
                        }
                        Step::Finished => return None,
                    }
                }
            },
        )
    }

    fn cancelled(&self, token: &CancellationToken) -> RunOutcome {
        let reason = token.reason().unwrap_or_else(|| "cancelled".to_string());
        debug!(emitted = self.emitted, reason = %reason, "Playback cancelled");
        RunOutcome::Cancelled {
            reason,
            emitted: self.emitted,
        }
    }
}

/// Suspends for `delay` unless cancelled first. Returns false on cancellation.
async fn pause(delay: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        () = token.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentCategory;
    use crate::testing::quick_timeline;
    use crate::timeline::{reference_build, StageDescriptor};
    use futures::StreamExt;
    use tokio::time::Instant;

    #[test]
    fn test_step_walks_timeline_then_trails() {
        let mut sequencer = Sequencer::new(quick_timeline(2, 10).with_trailing_delay_ms(50));

        assert!(matches!(sequencer.step(), Step::Emit(Progress { index: 0, .. })));
        assert!(matches!(sequencer.step(), Step::Emit(Progress { index: 1, .. })));
        assert_eq!(sequencer.step(), Step::Trailing(Duration::from_millis(50)));
        assert_eq!(sequencer.step(), Step::Finished);
        assert_eq!(sequencer.step(), Step::Finished);
        assert!(sequencer.is_finished());
        assert_eq!(sequencer.emitted(), 2);
    }

    #[test]
    fn test_empty_timeline_only_trails() {
        let mut sequencer = Sequencer::new(Timeline::empty());

        assert_eq!(sequencer.step(), Step::Trailing(Duration::from_millis(1000)));
        assert_eq!(sequencer.step(), Step::Finished);
    }

    #[test]
    fn test_step_carries_stage_data() {
        let timeline = Timeline::new([StageDescriptor::success(
            AgentCategory::Design,
            "Design done",
            800,
        )]);
        let mut sequencer = Sequencer::new(timeline);

        let Step::Emit(progress) = sequencer.step() else {
            panic!("expected an emitted stage");
        };
        assert_eq!(progress.entry.category, "DESIGN");
        assert_eq!(progress.entry.message, "Design done");
        assert!(progress.entry.is_success());
        assert_eq!(progress.phase, Phase::Design);
        assert_eq!(progress.delay, Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_emits_every_stage_in_order() {
        let timeline = reference_build();
        let expected: Vec<String> = timeline.iter().map(|s| s.message.clone()).collect();
        let token = CancellationToken::new();
        let mut seen = Vec::new();

        let outcome = Sequencer::new(timeline)
            .run(|p| seen.push(p.entry.message.clone()), &token)
            .await;

        assert_eq!(outcome, RunOutcome::Completed { emitted: 16 });
        assert_eq!(seen, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_honours_delays() {
        let timeline = reference_build();
        let total = timeline.total_duration();
        let token = CancellationToken::new();
        let start = Instant::now();
        let mut offsets = Vec::new();

        Sequencer::new(timeline)
            .run(|_| offsets.push(start.elapsed()), &token)
            .await;

        assert_eq!(offsets[0], Duration::ZERO);
        assert_eq!(offsets[1], Duration::from_millis(800));
        assert_eq!(offsets[2], Duration::from_millis(1800));
        assert_eq!(start.elapsed(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_phases_are_monotonic() {
        let token = CancellationToken::new();
        let mut phases = Vec::new();

        Sequencer::new(reference_build())
            .run(|p| phases.push(p.phase), &token)
            .await;

        assert!(phases.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(phases.last(), Some(&Phase::Build));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_emission() {
        let token = Arc::new(CancellationToken::new());
        let canceller = Arc::clone(&token);
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let run = tokio::spawn(async move {
            Sequencer::new(quick_timeline(10, 100))
                .run(|p| sink.lock().push(p.index), &token)
                .await
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        canceller.cancel("reset");
        let outcome = run.await.unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Cancelled {
                reason: "reset".to_string(),
                emitted: 3
            }
        );
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_trailing_delay() {
        let token = Arc::new(CancellationToken::new());
        let canceller = Arc::clone(&token);

        let run = tokio::spawn(async move {
            Sequencer::new(quick_timeline(1, 10).with_trailing_delay_ms(1000))
                .run(|_| {}, &token)
                .await
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel("reset");

        let outcome = run.await.unwrap();
        assert!(!outcome.is_completed());
        assert_eq!(outcome.emitted(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_yields_lazily() {
        let token = Arc::new(CancellationToken::new());
        let start = Instant::now();
        let stream = Sequencer::new(quick_timeline(3, 100).with_trailing_delay_ms(1000))
            .stream(token);
        futures::pin_mut!(stream);

        let first = stream.next().await.unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);

        let second = stream.next().await.unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(start.elapsed(), Duration::from_millis(100));

        let rest: Vec<Progress> = stream.collect().await;
        assert_eq!(rest.len(), 1);
        assert_eq!(start.elapsed(), Duration::from_millis(1300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_ends_on_cancel() {
        let token = Arc::new(CancellationToken::new());
        let stream = Sequencer::new(quick_timeline(5, 100)).stream(Arc::clone(&token));
        futures::pin_mut!(stream);

        assert!(stream.next().await.is_some());
        token.cancel("reset");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_runs_share_no_state() {
        let timeline = quick_timeline(4, 10);
        let token = CancellationToken::new();

        let a = Sequencer::new(timeline.clone()).run(|_| {}, &token).await;
        let b = Sequencer::new(timeline).run(|_| {}, &token).await;

        assert_eq!(a, b);
        assert_eq!(a.emitted(), 4);
    }
}
