//! Time source abstraction for note ids and timestamps.
//!
//! # Responsibility
//! - Supply creation ids (epoch milliseconds) and display timestamps.
//! - Allow tests to drive time explicitly.
//!
//! # Invariants
//! - `now_millis` and `now_local` of one clock describe the same instant.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Time source consumed by `NoteStore`.
pub trait Clock {
    /// Current instant as Unix epoch milliseconds.
    fn now_millis(&self) -> i64;
    /// Current instant as wall-clock time used for note display dates.
    fn now_local(&self) -> NaiveDateTime;
}

/// Clock backed by the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock.
///
/// Clones share the same instant, so a test can keep one handle while the
/// store owns another. Wall-clock time is the UTC rendering of the instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Rc::new(Cell::new(start_millis)),
        }
    }

    /// Moves the shared instant forward by `delta_millis`.
    pub fn advance_millis(&self, delta_millis: i64) {
        self.millis
            .set(self.millis.get().saturating_add(delta_millis));
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.get()
    }

    fn now_local(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.millis.get())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .naive_utc()
    }
}
