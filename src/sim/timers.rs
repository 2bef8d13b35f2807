//! Cancellable repeating timers on the simulation clock
//!
//! Boss attack patterns are repeating timers owned by the boss instance.
//! Owning them as an explicit set means defeat can tear all of them down
//! atomically - no repeating callback may survive its subject.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerId(u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer<K> {
    id: u32,
    kind: K,
    interval_ms: f64,
    next_fire_ms: f64,
    cancelled: bool,
}

/// A set of repeating timers keyed to `GameState::time_ms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSet<K> {
    timers: Vec<Timer<K>>,
    next_id: u32,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self { timers: Vec::new(), next_id: 0 }
    }
}

impl<K: Copy> TimerSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repeating timer; first fire at `now_ms + interval_ms`
    pub fn schedule(&mut self, kind: K, interval_ms: f64, now_ms: f64) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            interval_ms,
            next_fire_ms: now_ms + interval_ms,
            cancelled: false,
        });
        TimerId(id)
    }

    /// Cancel one timer. No-op on unknown or already-cancelled ids.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.id == id.0) {
            timer.cancelled = true;
        }
    }

    /// Cancel everything. Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Collect every timer kind due at `now_ms`, advancing each timer past
    /// the current time. A timer that fell far behind fires once per missed
    /// interval, in schedule order.
    pub fn fire_due(&mut self, now_ms: f64) -> Vec<K> {
        let mut fired = Vec::new();
        for timer in self.timers.iter_mut().filter(|t| !t.cancelled) {
            while timer.next_fire_ms <= now_ms {
                fired.push(timer.kind);
                timer.next_fire_ms += timer.interval_ms;
            }
        }
        self.timers.retain(|t| !t.cancelled);
        fired
    }

    pub fn is_empty(&self) -> bool {
        self.timers.iter().all(|t| t.cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut set = TimerSet::new();
        set.schedule('a', 100.0, 0.0);
        assert!(set.fire_due(50.0).is_empty());
        assert_eq!(set.fire_due(100.0), vec!['a']);
        // Does not re-fire until the next interval elapses
        assert!(set.fire_due(150.0).is_empty());
        assert_eq!(set.fire_due(200.0), vec!['a']);
    }

    #[test]
    fn test_catches_up_missed_intervals() {
        let mut set = TimerSet::new();
        set.schedule('a', 100.0, 0.0);
        assert_eq!(set.fire_due(350.0).len(), 3);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut set = TimerSet::new();
        let id = set.schedule('a', 100.0, 0.0);
        set.cancel(id);
        set.cancel(id);
        assert!(set.fire_due(1000.0).is_empty());
    }

    #[test]
    fn test_cancel_all_tears_down_set() {
        let mut set = TimerSet::new();
        set.schedule('a', 100.0, 0.0);
        set.schedule('b', 50.0, 0.0);
        set.cancel_all();
        set.cancel_all();
        assert!(set.fire_due(1000.0).is_empty());
        assert!(set.is_empty());
    }
}
