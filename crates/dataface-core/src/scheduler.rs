//! Timer queue driven by the host loop
//!
//! The face never blocks or spawns. It keeps a handful of named deadlines;
//! the host calls [`ClockFace::poll_timers`](crate::ClockFace::poll_timers)
//! regularly and due timers are popped one at a time.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{trace, warn};

/// Purpose of a timer. At most one timer per purpose is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One-shot that lines the tick up with the next wall-clock second
    TickAlign,
    /// Repeating clock redraw
    Tick,
    /// Repeating weather/sun refresh
    Refresh,
    /// One-shot refresh shortly after start
    InitialKick,
}

const TIMER_KINDS: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TimerKind,
    deadline: Instant,
    period: Option<Duration>,
}

/// Pending timers, keyed by [`TimerKind`].
#[derive(Debug, Default)]
pub struct Timers {
    pending: Vec<Timer, TIMER_KINDS>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `kind` once, `delay` from `now`. Replaces a pending timer of the
    /// same kind.
    pub fn schedule_once(&mut self, kind: TimerKind, now: Instant, delay: Duration) {
        self.insert(Timer {
            kind,
            deadline: now + delay,
            period: None,
        });
    }

    /// Fire `kind` every `period`, first at `now + period`.
    pub fn schedule_every(&mut self, kind: TimerKind, now: Instant, period: Duration) {
        self.insert(Timer {
            kind,
            deadline: now + period,
            period: Some(period),
        });
    }

    fn insert(&mut self, timer: Timer) {
        self.cancel(timer.kind);
        trace!("Scheduling {:?} at {:?}", timer.kind, timer.deadline);
        if self.pending.push(timer).is_err() {
            warn!("Timer queue full, dropping {:?}", timer.kind);
        }
    }

    /// Returns `true` if a timer was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.kind != kind);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Pop the earliest timer due at `now`.
    ///
    /// One-shots are removed. Repeating timers move one period ahead; if the
    /// host fell behind by more than a period the missed firings are dropped
    /// rather than replayed.
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerKind> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| t.deadline)
            .map(|(i, _)| i)?;

        let timer = self.pending[index];
        match timer.period {
            Some(period) => {
                let mut next = timer.deadline + period;
                if next <= now {
                    next = now + period;
                }
                self.pending[index].deadline = next;
            }
            None => {
                self.pending.swap_remove(index);
            }
        }
        Some(timer.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.schedule_once(TimerKind::InitialKick, at(0), Duration::from_millis(1_500));
        assert_eq!(timers.pop_due(at(1_499)), None);
        assert_eq!(timers.pop_due(at(1_500)), Some(TimerKind::InitialKick));
        assert_eq!(timers.pop_due(at(5_000)), None);
        assert!(timers.is_empty());
    }

    #[test]
    fn repeating_timer_advances_by_period() {
        let mut timers = Timers::new();
        timers.schedule_every(TimerKind::Tick, at(0), Duration::from_millis(1_000));
        assert_eq!(timers.pop_due(at(1_000)), Some(TimerKind::Tick));
        assert_eq!(timers.pop_due(at(1_500)), None);
        assert_eq!(timers.next_deadline(), Some(at(2_000)));

        // Host stalled for several periods: fire once, then resume.
        assert_eq!(timers.pop_due(at(9_300)), Some(TimerKind::Tick));
        assert_eq!(timers.pop_due(at(9_300)), None);
        assert_eq!(timers.next_deadline(), Some(at(10_300)));
    }

    #[test]
    fn earliest_due_first() {
        let mut timers = Timers::new();
        timers.schedule_every(TimerKind::Refresh, at(0), Duration::from_millis(300));
        timers.schedule_once(TimerKind::TickAlign, at(0), Duration::from_millis(100));
        assert_eq!(timers.pop_due(at(400)), Some(TimerKind::TickAlign));
        assert_eq!(timers.pop_due(at(400)), Some(TimerKind::Refresh));
    }

    #[test]
    fn rescheduling_replaces() {
        let mut timers = Timers::new();
        timers.schedule_once(TimerKind::TickAlign, at(0), Duration::from_millis(100));
        timers.schedule_once(TimerKind::TickAlign, at(0), Duration::from_millis(700));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pop_due(at(100)), None);
    }

    #[test]
    fn cancel_and_cancel_all() {
        let mut timers = Timers::new();
        timers.schedule_every(TimerKind::Tick, at(0), Duration::from_millis(1_000));
        timers.schedule_every(TimerKind::Refresh, at(0), Duration::from_millis(300_000));
        assert!(timers.cancel(TimerKind::Tick));
        assert!(!timers.cancel(TimerKind::Tick));
        assert!(timers.is_scheduled(TimerKind::Refresh));
        timers.cancel_all();
        assert_eq!(timers.len(), 0);
        assert_eq!(timers.next_deadline(), None);
    }
}
