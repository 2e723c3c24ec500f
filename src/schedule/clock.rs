use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::foundation::core::Secs;
use crate::foundation::error::{LanderError, LanderResult};

struct Entry<E> {
    at: Secs,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    // Reversed so the max-heap pops the earliest (time, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Logical clock with an agenda of pending events.
///
/// Events at equal times are delivered in the order they were scheduled. Time only moves
/// forward, and only when the owner advances it.
pub struct Clock<E> {
    now: f64,
    seq: u64,
    agenda: BinaryHeap<Entry<E>>,
}

impl<E> Default for Clock<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clock<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            seq: 0,
            agenda: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.agenda.len()
    }

    pub fn is_idle(&self) -> bool {
        self.agenda.is_empty()
    }

    /// Time of the earliest pending event.
    pub fn next_at(&self) -> Option<f64> {
        self.agenda.peek().map(|e| e.at.0)
    }

    pub fn schedule_at(&mut self, at: f64, event: E) -> LanderResult<()> {
        if !at.is_finite() {
            return Err(LanderError::schedule(format!("event time {at} is not finite")));
        }
        if at < self.now {
            return Err(LanderError::schedule(format!(
                "event time {at} is before the current time {}",
                self.now
            )));
        }
        self.agenda.push(Entry {
            at: Secs(at),
            seq: self.seq,
            event,
        });
        self.seq += 1;
        Ok(())
    }

    pub fn schedule_in(&mut self, delay: f64, event: E) -> LanderResult<()> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(LanderError::schedule(format!(
                "delay {delay} must be finite and >= 0"
            )));
        }
        self.schedule_at(self.now + delay, event)
    }

    /// Remove the earliest event due at or before `until`, moving the clock to its time.
    pub fn pop_due(&mut self, until: f64) -> Option<(f64, E)> {
        if self.agenda.peek()?.at.0 > until {
            return None;
        }
        let entry = self.agenda.pop()?;
        self.now = self.now.max(entry.at.0);
        Some((entry.at.0, entry.event))
    }

    /// Move the clock to `t` without dispatching; never moves backwards.
    pub fn advance(&mut self, t: f64) {
        if t.is_finite() && t > self.now {
            self.now = t;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/clock.rs"]
mod tests;
