//! Timed phase scheduling
//!
//! Lessons and screens stagger their reveals and run countdowns on a logical
//! clock that only moves when the owner calls [`Timeline::advance`] or
//! [`Timeline::pop_due`], normally once per rendered frame. Pending events
//! belong to the timeline: clearing it or dropping it cancels them, so nothing
//! can fire into a lesson that has been replayed or torn down.

use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// A queue of one-shot and repeating events keyed on logical time
#[derive(Debug)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of events still waiting to fire
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Fire `event` once, `delay` from now
    pub fn after(&mut self, delay: Duration, event: E) -> TimerId {
        self.push(self.now + delay, None, event)
    }

    /// Fire `event` every `period`, starting one period from now
    pub fn every(&mut self, period: Duration, event: E) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.every_from(period, period, event)
    }

    /// Fire `event` after `first`, then every `period`
    pub fn every_from(&mut self, first: Duration, period: Duration, event: E) -> TimerId {
        // A zero period would never let the clock move past it
        let period = period.max(MIN_PERIOD);
        self.push(self.now + first, Some(period), event)
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            period,
            event,
        });
        id
    }

    /// Cancel one event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending event
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!("Cancelling {} pending timer(s)", self.entries.len());
        }
        self.entries.clear();
    }

    /// Pop the earliest event due at or before `until`, moving the clock to its
    /// due time. Events scheduled while handling it are relative to that time,
    /// so chained delays inside one large step still land where they should.
    ///
    /// Call [`settle`](Self::settle) with the same `until` once this returns
    /// `None`.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let (pos, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.id.0))?;

        let entry = &mut self.entries[pos];
        self.now = self.now.max(entry.due);
        let period = entry.period;
        match period {
            Some(period) => {
                entry.due += period;
                Some(entry.event.clone())
            }
            None => Some(self.entries.remove(pos).event),
        }
    }

    /// Move the clock forward to `until` once all due events are drained
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advance by `dt` and return every event that fired, in order
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        let until = self.now + dt;
        let mut fired = Vec::new();
        while let Some(event) = self.pop_due(until) {
            fired.push(event);
        }
        self.settle(until);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timeline = Timeline::new();
        timeline.after(ms(100), "a");
        assert!(timeline.advance(ms(99)).is_empty());
        assert_eq!(timeline.advance(ms(1)), vec!["a"]);
        assert!(timeline.advance(ms(1000)).is_empty());
        assert_eq!(timeline.pending(), 0);
        assert_eq!(timeline.now(), ms(1100));
    }

    #[test]
    fn test_events_fire_in_due_order() {
        let mut timeline = Timeline::new();
        timeline.after(ms(300), "late");
        timeline.after(ms(100), "early");
        timeline.after(ms(100), "early-second");
        assert_eq!(timeline.advance(ms(500)), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn test_repeating() {
        let mut timeline = Timeline::new();
        let id = timeline.every(ms(50), 1);
        assert_eq!(timeline.advance(ms(175)).len(), 3);
        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
        assert!(timeline.advance(ms(500)).is_empty());
    }

    #[test]
    fn test_every_from_offset() {
        let mut timeline = Timeline::new();
        timeline.every_from(ms(750), ms(1500), ());
        assert_eq!(timeline.advance(ms(749)).len(), 0);
        assert_eq!(timeline.advance(ms(1)).len(), 1);
        assert_eq!(timeline.advance(ms(1500)).len(), 1);
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut timeline = Timeline::new();
        timeline.after(ms(10), 'x');
        timeline.every(ms(10), 'y');
        timeline.clear();
        assert!(timeline.advance(ms(100)).is_empty());
    }

    #[test]
    fn test_chained_schedule_within_one_step() {
        let mut timeline = Timeline::new();
        timeline.after(ms(100), 1);
        let until = timeline.now() + ms(1000);
        let mut seen = Vec::new();
        while let Some(event) = timeline.pop_due(until) {
            seen.push((event, timeline.now()));
            if event == 1 {
                // Relative to the time the first event fired, not the frame end
                timeline.after(ms(200), 2);
            }
        }
        timeline.settle(until);
        assert_eq!(seen, vec![(1, ms(100)), (2, ms(300))]);
        assert_eq!(timeline.now(), ms(1000));
    }

    #[test]
    fn test_zero_period_does_not_spin() {
        let mut timeline = Timeline::new();
        timeline.every(Duration::ZERO, ());
        assert_eq!(timeline.advance(ms(3)).len(), 3);
    }
}
