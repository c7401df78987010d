//! The delayed reveal as an explicit, cancellable one-shot task.
//!
//! RULE: a timer fires at most once. After it fires or is cancelled it is
//! inert; polling it again never yields a second reveal.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Armed,
    Fired,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealTimer {
    due_at: Duration,
    state: TimerState,
}

impl RevealTimer {
    /// Arm a timer that becomes due `delay` after `now`.
    pub fn schedule(now: Duration, delay: Duration) -> Self {
        Self {
            due_at: now.saturating_add(delay),
            state: TimerState::Armed,
        }
    }

    pub fn due_at(&self) -> Duration {
        self.due_at
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == TimerState::Armed
    }

    /// Time left before the timer is due, zero once due or inert.
    pub fn remaining(&self, now: Duration) -> Duration {
        if self.is_armed() {
            self.due_at.saturating_sub(now)
        } else {
            Duration::ZERO
        }
    }

    /// Fire if armed and due. Returns true exactly once per timer.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        if self.is_armed() && now >= self.due_at {
            self.state = TimerState::Fired;
            true
        } else {
            false
        }
    }

    /// Cancel an armed timer. Returns false if it had already fired or
    /// been cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.is_armed() {
            self.state = TimerState::Cancelled;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_due() {
        let mut t = RevealTimer::schedule(Duration::from_millis(100), Duration::from_millis(5000));
        assert!(!t.fire_if_due(Duration::from_millis(5099)));
        assert_eq!(t.remaining(Duration::from_millis(5000)), Duration::from_millis(100));
        assert!(t.fire_if_due(Duration::from_millis(5100)));
        assert!(!t.fire_if_due(Duration::from_millis(9000)));
        assert_eq!(t.state(), TimerState::Fired);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = RevealTimer::schedule(Duration::ZERO, Duration::from_millis(10));
        assert!(t.cancel());
        assert!(!t.cancel());
        assert!(!t.fire_if_due(Duration::from_secs(60)));
        assert_eq!(t.state(), TimerState::Cancelled);
    }
}
