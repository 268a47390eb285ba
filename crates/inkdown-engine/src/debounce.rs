//! Quiet-period coalescing for outbound notifications.
//!
//! Rapid keystrokes must produce one persisted write, not one per keystroke.
//! The debouncer is an explicit primitive - a deadline plus the last
//! scheduled payload, with cancel-and-reschedule semantics - rather than an
//! ad-hoc timer buried in the controller. The clock is injected as
//! [`Instant`] values so tests never sleep.

use std::time::{Duration, Instant};

/// Coalesces payloads until a quiet period has elapsed.
///
/// Each `schedule` replaces the pending payload and pushes the deadline out;
/// `poll` releases the payload once the deadline has passed.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    deadline: Option<Instant>,
    payload: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
            payload: None,
        }
    }

    /// Replace any pending payload and restart the quiet period.
    pub fn schedule(&mut self, payload: T, now: Instant) {
        self.payload = Some(payload);
        self.deadline = Some(now + self.quiet);
    }

    /// Release the pending payload if the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.payload.take()
            }
            _ => None,
        }
    }

    /// Release the pending payload immediately, deadline or not.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.payload.take()
    }

    /// Drop the pending payload without releasing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.payload = None;
    }

    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }
}
