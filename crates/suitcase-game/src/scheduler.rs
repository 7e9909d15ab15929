//! Keyed single-shot timers on a virtual clock.
//!
//! Every timed transition in the game goes through a [`Scheduler`]: at most
//! one timer per [`TimerKey`] is pending, scheduling a key that is already
//! pending is a no-op, and cancelling an absent key is a no-op. Time is a
//! [`Duration`] since the controller was built, advanced explicitly by the
//! owner, so the same code runs under tokio and in tests.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use suitcase_game::scheduler::{Scheduler, TimerKey};
//!
//! let mut scheduler = Scheduler::new();
//! assert!(scheduler.schedule(TimerKey::BombTick, Duration::from_secs(1)));
//! assert!(!scheduler.schedule(TimerKey::BombTick, Duration::from_millis(10)));
//!
//! assert_eq!(scheduler.pop_due(Duration::from_millis(999)), None);
//! assert_eq!(scheduler.pop_due(Duration::from_secs(1)), Some(TimerKey::BombTick));
//! assert_eq!(scheduler.now(), Duration::from_secs(1));
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::trace;

/// Identity of a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKey {
    /// Countdown second.
    BombTick,
    /// Lockout second.
    BombLockTick,
    /// Next beep inside the current countdown second.
    BombBeep,
    /// End of the arm-sound window.
    BeepSuppression,
    /// Delayed end-of-game cue.
    GameEnd,
    /// Bunker holding second.
    BunkerTick,
    /// Bunker acknowledge beep.
    BunkerSignal,
    /// Menu key held long enough.
    MenuHold,
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerKey::BombTick => "bomb-tick",
            TimerKey::BombLockTick => "bomb-lock-tick",
            TimerKey::BombBeep => "bomb-beep",
            TimerKey::BeepSuppression => "beep-suppression",
            TimerKey::GameEnd => "game-end",
            TimerKey::BunkerTick => "bunker-tick",
            TimerKey::BunkerSignal => "bunker-signal",
            TimerKey::MenuHold => "menu-hold",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Duration,
    /// Scheduling order, breaks ties between equal deadlines.
    seq: u64,
}

/// Pending timers plus the virtual clock they are measured against.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    pending: HashMap<TimerKey, Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `key` to fire `delay` from now.
    ///
    /// Returns `false` (and keeps the existing deadline) if `key` is already
    /// pending.
    pub fn schedule(&mut self, key: TimerKey, delay: Duration) -> bool {
        if self.pending.contains_key(&key) {
            trace!(%key, "already scheduled");
            return false;
        }
        let deadline = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(key, Pending { deadline, seq });
        trace!(%key, ?deadline, "scheduled");
        true
    }

    /// Cancel `key`. Returns whether it was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    /// Cancel every pending timer. Returns how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of `key`, if pending.
    pub fn deadline(&self, key: TimerKey) -> Option<Duration> {
        self.pending.get(&key).map(|p| p.deadline)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// The clock moves to that timer's deadline, so anything scheduled while
    /// handling it is measured from the moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKey> {
        let (&key, pending) = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.seq))?;
        let deadline = pending.deadline;
        self.pending.remove(&key);
        self.now = self.now.max(deadline);
        Some(key)
    }

    /// Move the clock forward to `time`. The clock never goes backwards.
    pub fn advance_clock(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_duplicate_schedule_is_noop() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.schedule(TimerKey::BombTick, SEC));
        assert!(!scheduler.schedule(TimerKey::BombTick, 5 * SEC));
        assert_eq!(scheduler.deadline(TimerKey::BombTick), Some(SEC));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_absent_is_noop() {
        let mut scheduler = Scheduler::new();
        assert!(!scheduler.cancel(TimerKey::MenuHold));
        scheduler.schedule(TimerKey::MenuHold, SEC);
        assert!(scheduler.cancel(TimerKey::MenuHold));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_pop_order_by_deadline_then_sequence() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKey::BombTick, SEC);
        scheduler.schedule(TimerKey::BombBeep, Duration::from_millis(500));
        scheduler.schedule(TimerKey::GameEnd, SEC);

        let until = 2 * SEC;
        assert_eq!(scheduler.pop_due(until), Some(TimerKey::BombBeep));
        assert_eq!(scheduler.now(), Duration::from_millis(500));
        assert_eq!(scheduler.pop_due(until), Some(TimerKey::BombTick));
        assert_eq!(scheduler.pop_due(until), Some(TimerKey::GameEnd));
        assert_eq!(scheduler.pop_due(until), None);
    }

    #[test]
    fn test_schedule_relative_to_fired_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKey::BunkerTick, SEC);
        assert_eq!(scheduler.pop_due(10 * SEC), Some(TimerKey::BunkerTick));

        scheduler.schedule(TimerKey::BunkerTick, SEC);
        assert_eq!(scheduler.deadline(TimerKey::BunkerTick), Some(2 * SEC));
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerKey::BombTick, SEC);
        scheduler.schedule(TimerKey::BombLockTick, SEC);
        scheduler.schedule(TimerKey::MenuHold, 3 * SEC);

        assert_eq!(scheduler.cancel_all(), 3);
        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.pop_due(Duration::MAX), None);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_clock(5 * SEC);
        scheduler.advance_clock(2 * SEC);
        assert_eq!(scheduler.now(), 5 * SEC);
    }
}
