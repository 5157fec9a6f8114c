#![forbid(unsafe_code)]

//! Delayed phase transitions.
//!
//! Animations are modelled as "switch to phase X after duration D", never as
//! busy-waiting. A [`PhaseTimer`] holds at most one pending transition and
//! is polled on every tick; [`PhaseTimer::deadline`] tells the host when the
//! next tick is worth delivering. Cancelling or rescheduling replaces the
//! slot, so a tick that arrives after the state moved on is a no-op.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Pending<T> {
    deadline: Instant,
    payload: T,
}

/// A single-slot timer carrying the phase to enter when it fires.
#[derive(Debug, Clone)]
pub struct PhaseTimer<T> {
    pending: Option<Pending<T>>,
}

impl<T> Default for PhaseTimer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T: Copy> PhaseTimer<T> {
    /// Create an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire `delay` after `now`, replacing anything pending.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) {
        self.pending = Some(Pending {
            deadline: now + delay,
            payload,
        });
    }

    /// Drop the pending transition. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a transition is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending transition is due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Fire the pending transition if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.payload)
            }
            _ => None,
        }
    }
}
