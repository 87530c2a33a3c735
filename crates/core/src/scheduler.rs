use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerKind {
    /// Start the next reveal step.
    Step,
    /// Show the card hidden at the start of the current step.
    Flip,
    /// End of the sequence: offer a retry.
    ShowRetry,
    IndicatorFade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub due: Duration,
    pub kind: TimerKind,
}

/// Single-threaded one-shot timer queue on a virtual clock.
///
/// Times are offsets from whatever epoch the caller picked. Timers due at
/// the same instant fire in the order they were scheduled.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    now: Duration,
    next_id: u64,
    pending: Vec<Timer>,
}

impl Timeline {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            due: self.now + delay,
            kind,
        });
        id
    }

    /// Drops the timer. Unknown or already fired ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|timer| timer.id != id);
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|timer| timer.id == id)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|timer| timer.due).min()
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.id.0))?;
        let timer = self.pending.remove(pos);
        self.now = self.now.max(timer.due);
        Some(timer)
    }

    /// Moves the clock forward; never backwards.
    pub fn settle_at(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_in_due_order() {
        let mut timeline = Timeline::default();
        timeline.schedule(ms(50), TimerKind::Flip);
        timeline.schedule(ms(10), TimerKind::Step);
        timeline.schedule(ms(10), TimerKind::IndicatorFade);
        assert_eq!(timeline.pop_due(ms(5)), None);
        let first = timeline.pop_due(ms(100)).expect("first");
        assert_eq!(first.kind, TimerKind::Step);
        assert_eq!(timeline.now(), ms(10));
        let second = timeline.pop_due(ms(100)).expect("second");
        assert_eq!(second.kind, TimerKind::IndicatorFade);
        let third = timeline.pop_due(ms(100)).expect("third");
        assert_eq!(third.kind, TimerKind::Flip);
        assert!(timeline.is_empty());
    }

    #[test]
    fn delays_are_relative_to_clock() {
        let mut timeline = Timeline::default();
        timeline.settle_at(ms(1000));
        timeline.schedule(ms(40), TimerKind::Flip);
        assert_eq!(timeline.next_due(), Some(ms(1040)));
        timeline.settle_at(ms(500));
        assert_eq!(timeline.now(), ms(1000));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut timeline = Timeline::default();
        let id = timeline.schedule(ms(10), TimerKind::Step);
        assert!(timeline.is_pending(id));
        timeline.cancel(id);
        assert!(!timeline.is_pending(id));
        assert_eq!(timeline.pop_due(ms(100)), None);
        timeline.cancel(id);
    }
}
