use crate::clock::SessionClock;
use crate::engine::{ScoringEngine, Snapshot};
use crate::reference::ReferenceText;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long the completion notice stays up before the session resets.
    pub reset_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Completed,
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct PendingReset {
    deadline: Instant,
    generation: u64,
}

/// Lifecycle around a [`ScoringEngine`]: owns its clock and the delayed
/// post-completion reset.
#[derive(Debug)]
pub struct Session {
    engine: ScoringEngine,
    clock: SessionClock,
    pending_reset: Option<PendingReset>,
    config: SessionConfig,
    generation: u64,
    last_result: Option<Snapshot>,
}

impl Session {
    pub fn new(reference: ReferenceText, config: SessionConfig) -> Self {
        Self {
            engine: ScoringEngine::new(reference),
            clock: SessionClock::new(),
            pending_reset: None,
            config,
            generation: 0,
            last_result: None,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Bumped on every reset; identifies which session a pending reset belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    /// Snapshot taken when the most recent test completed. Survives the reset.
    pub fn last_result(&self) -> Option<&Snapshot> {
        self.last_result.as_ref()
    }

    /// The last completed result, or the live state when nothing completed yet.
    pub fn final_snapshot(&self) -> Snapshot {
        self.last_result
            .clone()
            .unwrap_or_else(|| self.engine.snapshot())
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn reset_pending(&self) -> bool {
        self.pending_reset.is_some()
    }

    /// Time left before the scheduled reset fires.
    pub fn reset_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending_reset
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Forward the full input value to the engine.
    ///
    /// Returns [`SessionEvent::Completed`] the one time the test ends.
    pub fn input_changed(&mut self, value: &str, now: Instant) -> Option<SessionEvent> {
        self.sync_clock(now);

        let report = self.engine.on_input_changed(value);

        if report.started {
            self.clock.start(now);
            info!(generation = self.generation, "typing test started");
        }

        if report.completed {
            self.clock.stop();
            self.pending_reset = match now.checked_add(self.config.reset_delay) {
                Some(deadline) => Some(PendingReset {
                    deadline,
                    generation: self.generation,
                }),
                None => {
                    warn!(
                        delay = ?self.config.reset_delay,
                        "reset delay out of range, waiting for a manual restart"
                    );
                    None
                }
            };
            let snapshot = self.engine.snapshot();
            info!(
                generation = self.generation,
                wpm = snapshot.words_per_minute,
                accuracy = snapshot.accuracy_percent,
                errors = snapshot.error_count,
                elapsed = snapshot.elapsed_seconds,
                "typing test completed"
            );
            self.last_result = Some(snapshot);
            return Some(SessionEvent::Completed);
        }

        None
    }

    /// Deliver due clock ticks and fire the pending reset once its deadline passes.
    pub fn poll(&mut self, now: Instant) -> Option<SessionEvent> {
        self.sync_clock(now);

        let pending = self.pending_reset?;
        if now < pending.deadline {
            return None;
        }

        self.pending_reset = None;
        if pending.generation != self.generation {
            debug!(
                stale = pending.generation,
                current = self.generation,
                "dropping stale reset"
            );
            return None;
        }

        info!(generation = self.generation, "resetting after completion");
        self.reset();
        Some(SessionEvent::Reset)
    }

    /// Start over immediately, cancelling any scheduled reset.
    pub fn restart(&mut self) {
        if self.pending_reset.take().is_some() {
            debug!(generation = self.generation, "pending reset cancelled");
        }
        info!(generation = self.generation, "restarting test");
        self.reset();
    }

    fn reset(&mut self) {
        self.clock.stop();
        self.engine.reset();
        self.generation += 1;
    }

    fn sync_clock(&mut self, now: Instant) {
        for _ in 0..self.clock.due_ticks(now) {
            self.engine.on_session_tick();
        }
    }
}
