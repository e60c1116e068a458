//! Process-wide rate-limit cooldown.
//!
//! Once any provider answers with a rate-limit signal, every outbound quote
//! call is suppressed until the window elapses. The state is a single
//! deadline: not per ticker, not per provider. It is in-memory and resets
//! when the process restarts.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::clock::{Clock, SystemClock};

/// Default cooldown window after a rate-limit signal.
pub const DEFAULT_COOLDOWN_WINDOW: Duration = Duration::from_secs(120);

/// Global cooldown gate for provider calls.
pub struct CooldownTracker {
    /// End of the current cooldown, if one was ever triggered.
    active_until: Mutex<Option<DateTime<Utc>>>,
    window: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl CooldownTracker {
    /// Create a tracker on the system clock.
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, Arc::new(SystemClock))
    }

    /// Create a tracker that reads time from `clock`.
    pub fn with_clock(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            active_until: Mutex::new(None),
            window: chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::weeks(52)),
            clock,
        }
    }

    fn lock_deadline(&self) -> MutexGuard<'_, Option<DateTime<Utc>>> {
        self.active_until.lock().unwrap_or_else(|poisoned| {
            warn!("Cooldown mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// True while the last trigger's window has not elapsed.
    pub fn is_cooling_down(&self) -> bool {
        match *self.lock_deadline() {
            Some(until) => self.clock.now() < until,
            None => false,
        }
    }

    /// Start (or restart) the cooldown at `now + window`.
    pub fn trigger(&self) {
        let now = self.clock.now();
        let until = now.checked_add_signed(self.window).unwrap_or(now);
        *self.lock_deadline() = Some(until);
        info!(
            "Rate limited by provider; suppressing quote calls until {}",
            until.to_rfc3339()
        );
    }

    /// Deadline of the active cooldown, `None` when not cooling down.
    pub fn active_until(&self) -> Option<DateTime<Utc>> {
        let until = (*self.lock_deadline())?;
        (self.clock.now() < until).then_some(until)
    }

    /// Time left before provider calls resume.
    pub fn remaining(&self) -> Duration {
        self.active_until()
            .and_then(|until| (until - self.clock.now()).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }

    /// Clear any active cooldown.
    pub fn reset(&self) {
        *self.lock_deadline() = None;
        debug!("Cooldown reset");
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_WINDOW)
    }
}
