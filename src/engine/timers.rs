//! Deferred one-shot timers
//!
//! Timers are `(deadline, event)` pairs in a min-heap, polled once per frame.
//! They cannot be cancelled; handlers must re-check current state before
//! acting on an event.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Things that happen "later"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Place a new gem (no-op if one is already active)
    RespawnGem,
    /// Spoil the gem from the given placement
    SpoilGem { placement: u32 },
    /// Clear the points highlight set by the pickup with this stamp
    UnhighlightPoints { stamp: u64 },
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    deadline: f64,
    seq: u64,
    event: TimerEvent,
}

// BinaryHeap is a max-heap, so ordering is reversed: earliest deadline first,
// then insertion order.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .total_cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `now + delay_ms`, returns the deadline
    pub fn schedule(&mut self, now: f64, delay_ms: u32, event: TimerEvent) -> f64 {
        let deadline = now + f64::from(delay_ms) / 1000.0;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { deadline, seq, event });
        deadline
    }

    /// Pop the next event whose deadline has passed
    pub fn pop_due(&mut self, now: f64) -> Option<TimerEvent> {
        match self.heap.peek() {
            Some(next) if next.deadline <= now => self.heap.pop().map(|s| s.event),
            _ => None,
        }
    }

    /// All pending timers as `(deadline, event)`, earliest first
    pub fn pending(&self) -> Vec<(f64, TimerEvent)> {
        let mut all: Vec<Scheduled> = self.heap.iter().copied().collect();
        all.sort_by(|a, b| b.cmp(a));
        all.into_iter().map(|s| (s.deadline, s.event)).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
