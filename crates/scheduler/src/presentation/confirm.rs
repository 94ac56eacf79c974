//! Two-click confirmation for destructive actions.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use tracing::debug;

/// State of a confirmation gate. A pending confirmation remembers what it
/// will act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState<T> {
    Idle,
    PendingConfirm { expires_at: Instant, target: T },
}

/// What a press on a guarded button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// First press: the gate is now waiting for a second press
    Armed,
    /// Second press on the same target within the timeout: perform the action
    Confirmed,
}

/// Guards an action behind a second press on the same target that must
/// arrive before the timeout. Callers pass the current `Instant` so the gate
/// never reads a clock on its own.
#[derive(Debug, Clone)]
pub struct ConfirmGate<T> {
    state: ConfirmState<T>,
    timeout: Duration,
}

impl<T: PartialEq + Debug> ConfirmGate<T> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: ConfirmState::Idle,
            timeout,
        }
    }

    /// Creates a gate with the default 5 second timeout.
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(5))
    }

    pub fn state(&self) -> &ConfirmState<T> {
        &self.state
    }

    /// The target awaiting confirmation at `now`, if it hasn't expired.
    pub fn pending(&self, now: Instant) -> Option<&T> {
        match &self.state {
            ConfirmState::PendingConfirm { expires_at, target } if now < *expires_at => {
                Some(target)
            }
            _ => None,
        }
    }

    /// Registers a press on `target` at `now`.
    ///
    /// Only a press on the target that is already pending confirms; a press on
    /// anything else re-arms the gate for the new target.
    pub fn press(&mut self, target: T, now: Instant) -> ConfirmOutcome {
        if self.pending(now) == Some(&target) {
            self.state = ConfirmState::Idle;
            debug!(?target, "Confirmation accepted");
            return ConfirmOutcome::Confirmed;
        }

        if let Some(previous) = self.pending(now) {
            debug!(?previous, "Dropped pending confirmation for another target");
        }
        debug!(
            ?target,
            timeout_ms = self.timeout.as_millis() as u64,
            "Confirmation armed"
        );
        self.state = ConfirmState::PendingConfirm {
            expires_at: now + self.timeout,
            target,
        };
        ConfirmOutcome::Armed
    }

    /// Drops any pending confirmation.
    pub fn cancel(&mut self) {
        self.state = ConfirmState::Idle;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<T: PartialEq + Debug> Default for ConfirmGate<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
