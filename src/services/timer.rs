use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Delayed callbacks on a virtual clock.
///
/// Time only moves when the owner pops due timers, so tests drive it
/// directly and the console driver feeds it real elapsed time. Timers that
/// share a deadline fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), E>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + delay;
        self.pending.insert((deadline, id), event);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Drops a pending timer. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.pending.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes the earliest timer due at or before `until` and moves the
    /// clock to its deadline. Once nothing is due the clock settles on
    /// `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, E)> {
        let key = match self.pending.keys().next() {
            Some(&(deadline, id)) if deadline <= until => (deadline, id),
            _ => {
                if until > self.now {
                    self.now = until;
                }
                return None;
            }
        };
        let event = self.pending.remove(&key)?;
        self.deadlines.remove(&key.1);
        if key.0 > self.now {
            self.now = key.0;
        }
        Some((key.1, event))
    }
}
