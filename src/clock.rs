use std::time::Instant;
use tracing::debug;

/// One-second session timer.
///
/// Owned by the session: started when typing begins, stopped on completion,
/// released with the session. Rather than relying on a periodic callback
/// firing exactly once per second, [`SessionClock::due_ticks`] reports how
/// many whole seconds passed since the last poll, so slow or bursty polling
/// never loses time.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    started_at: Option<Instant>,
    ticks_emitted: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// No-op when already running.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.ticks_emitted = 0;
            debug!("session clock started");
        }
    }

    /// No-op when already stopped.
    pub fn stop(&mut self) {
        if self.started_at.take().is_some() {
            debug!(ticks = self.ticks_emitted, "session clock stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whole seconds elapsed since the previous call.
    pub fn due_ticks(&mut self, now: Instant) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };

        let whole = now.saturating_duration_since(started_at).as_secs();
        let due = whole.saturating_sub(self.ticks_emitted);
        self.ticks_emitted = self.ticks_emitted.max(whole);
        due
    }
}
