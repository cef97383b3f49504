//! Named, cancellable, fire-once deferred actions
//!
//! A [`DeferredAction`] holds a deadline on tokio's clock. The host event loop
//! polls it with [`DeferredAction::fire_if_due`] on the same logical thread as
//! every other focus operation, so a fired action never overlaps one.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct DeferredAction {
    name: &'static str,
    delay: Duration,
    deadline: Option<Instant>,
}

impl DeferredAction {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            deadline: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule relative to now, replacing any pending deadline
    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    /// Schedule `delay` after `now`, replacing any pending deadline
    pub fn schedule_at(&mut self, now: Instant) {
        let deadline = now + self.delay;
        tracing::debug!(action = self.name, delay_ms = self.delay.as_millis() as u64, "Deferred action scheduled");
        self.deadline = Some(deadline);
    }

    /// Cancel the pending deadline; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.deadline.take().is_some();
        if was_pending {
            tracing::debug!(action = self.name, "Deferred action cancelled");
        }
        was_pending
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has elapsed at `now`
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                tracing::debug!(action = self.name, "Deferred action fired");
                true
            }
            _ => false,
        }
    }
}
