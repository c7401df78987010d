//! Table clock: elapsed time driven by the caller.
//!
//! The engine never reads the wall clock for reveal timing. The host
//! advances this clock (per frame, per IPC message, per test step) and
//! passes `now()` into the table.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableClock {
    elapsed: Duration,
}

impl TableClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.elapsed
    }

    /// Advance by `dt`. Returns the new time.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.elapsed
    }

    pub fn advance_millis(&mut self, ms: u64) -> Duration {
        self.advance(Duration::from_millis(ms))
    }
}
