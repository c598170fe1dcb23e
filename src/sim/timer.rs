//! Deterministic timer scheduling
//!
//! Stands in for browser `setTimeout`/`setInterval`. Time is virtual
//! milliseconds supplied by the caller, and due timers are handed out one at
//! a time in deadline order. A cancelled timer is removed on the spot, so it
//! can never be returned by `pop_due` afterwards.

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown refresh
    ClockTick,
    /// Target has used half its lifetime
    TargetWarning { target_id: u32 },
    /// Target lifetime is over
    TargetExpiry { target_id: u32 },
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    due_ms: u64,
    /// Re-arm interval for repeating timers
    period_ms: Option<u64>,
    event: TimerEvent,
}

/// Single-threaded timer queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last fired timer or the last `pop_due` horizon
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Fire `event` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId {
        self.push(delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first time one period from now
    pub fn every(&mut self, period_ms: u64, event: TimerEvent) -> TimerId {
        let period_ms = period_ms.max(1);
        self.push(period_ms, Some(period_ms), event)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, event: TimerEvent) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            period_ms,
            event,
        });
        id
    }

    /// Remove a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|p| p.id == id) {
            Some(i) => {
                self.pending.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Take the earliest timer due at or before `until_ms`.
    ///
    /// Ties go to the timer scheduled first. While the caller handles the
    /// event, `now()` equals its deadline, so follow-up timers are scheduled
    /// relative to when the event happened. Once nothing is due, `now()`
    /// moves up to `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, TimerEvent)> {
        let next = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.id))
            .map(|(i, _)| i);

        let Some(index) = next else {
            self.now_ms = self.now_ms.max(until_ms);
            return None;
        };

        let pending = &mut self.pending[index];
        let fired = (pending.id, pending.event);
        self.now_ms = self.now_ms.max(pending.due_ms);
        match pending.period_ms {
            Some(period) => pending.due_ms += period,
            None => {
                self.pending.remove(index);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, until: u64) -> Vec<(u64, TimerEvent)> {
        let mut fired = Vec::new();
        while let Some((_, event)) = scheduler.pop_due(until) {
            fired.push((scheduler.now(), event));
        }
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut s = Scheduler::new();
        s.after(100, TimerEvent::TargetExpiry { target_id: 1 });

        assert!(drain(&mut s, 99).is_empty());
        assert_eq!(
            drain(&mut s, 100),
            vec![(100, TimerEvent::TargetExpiry { target_id: 1 })]
        );
        assert!(drain(&mut s, 1000).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut s = Scheduler::new();
        s.after(30, TimerEvent::TargetExpiry { target_id: 1 });
        s.after(15, TimerEvent::TargetWarning { target_id: 1 });
        s.every(10, TimerEvent::ClockTick);

        let fired = drain(&mut s, 30);
        assert_eq!(
            fired,
            vec![
                (10, TimerEvent::ClockTick),
                (15, TimerEvent::TargetWarning { target_id: 1 }),
                (20, TimerEvent::ClockTick),
                (30, TimerEvent::TargetExpiry { target_id: 1 }),
                (30, TimerEvent::ClockTick),
            ]
        );
        assert_eq!(s.now(), 30);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let warning = s.after(5, TimerEvent::TargetWarning { target_id: 1 });
        let expiry = s.after(10, TimerEvent::TargetExpiry { target_id: 1 });

        assert!(s.cancel(expiry));
        assert!(!s.cancel(expiry));
        assert!(s.is_pending(warning));

        let fired = drain(&mut s, 100);
        assert_eq!(fired, vec![(5, TimerEvent::TargetWarning { target_id: 1 })]);
        assert!(!s.cancel(warning));
    }

    #[test]
    fn test_cancel_during_drain() {
        let mut s = Scheduler::new();
        s.after(10, TimerEvent::TargetWarning { target_id: 1 });
        let expiry = s.after(10, TimerEvent::TargetExpiry { target_id: 1 });

        let first = s.pop_due(10);
        assert_eq!(first.map(|(_, e)| e), Some(TimerEvent::TargetWarning { target_id: 1 }));
        s.cancel(expiry);
        assert!(s.pop_due(10).is_none());
    }

    #[test]
    fn test_schedules_relative_to_fire_time() {
        let mut s = Scheduler::new();
        s.after(10, TimerEvent::TargetExpiry { target_id: 1 });
        let (_, _) = s.pop_due(50).expect("due");
        // Follow-up scheduled while handling the event at t=10
        s.after(10, TimerEvent::TargetExpiry { target_id: 2 });
        assert_eq!(
            drain(&mut s, 50),
            vec![(20, TimerEvent::TargetExpiry { target_id: 2 })]
        );
    }

    #[test]
    fn test_time_never_goes_backwards() {
        let mut s = Scheduler::new();
        assert!(s.pop_due(100).is_none());
        assert_eq!(s.now(), 100);
        assert!(s.pop_due(50).is_none());
        assert_eq!(s.now(), 100);
    }
}
