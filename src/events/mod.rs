//! Event-scheduling abstraction for the discrete-event loop.
//!
//! The engine never blocks waiting for a solicited response; it schedules a
//! timeout event through [`TimerScheduler`] and returns to the loop.
//! [`EventQueue`] is the reference implementation: deterministic ordering by
//! (deadline, insertion sequence) and tombstone-based cancellation, so a
//! cancelled timer can never fire.

use std::collections::{BinaryHeap, HashSet};

use crate::common::{LinkId, SimTime};

/// Timer-driven events delivered back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedEvent {
    /// Response window for a solicited-uplink request expired.
    AccessReqTimeout { link_id: LinkId },
}

/// Handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Schedule-at/cancel abstraction injected into the scheduler.
pub trait TimerScheduler {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Schedule `event` to fire at simulated time `at`.
    fn schedule_at(&mut self, at: SimTime, event: SchedEvent) -> TimerHandle;

    /// Cancel a scheduled timer. Cancelling an already-fired or unknown
    /// handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    at: SimTime,
    handle: TimerHandle,
    event: SchedEvent,
}

// BinaryHeap is a max-heap; order entries so the earliest deadline pops
// first, same-instant entries in insertion order (handles are monotonic).
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.handle.0.cmp(&self.handle.0))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Discrete-event queue driving the scheduler's timers.
#[derive(Debug, Default)]
pub struct EventQueue {
    now: SimTime,
    next_handle: u64,
    heap: BinaryHeap<Entry>,
    /// Handles scheduled but not yet fired.
    live: HashSet<TimerHandle>,
    /// Cancelled handles, discarded when their entry surfaces.
    cancelled: HashSet<TimerHandle>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `at` and return all due events in firing order.
    pub fn advance_to(&mut self, at: SimTime) -> Vec<SchedEvent> {
        assert!(at >= self.now, "simulated time must not move backwards");
        self.now = at;

        let mut fired = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.at > at {
                break;
            }
            let entry = self.heap.pop().expect("peeked entry vanished");
            if self.cancelled.remove(&entry.handle) {
                continue;
            }
            self.live.remove(&entry.handle);
            tracing::trace!("firing {:?} at {}", entry.event, entry.at);
            fired.push(entry.event);
        }
        fired
    }

    /// Deadline of the next live event, if any.
    pub fn next_deadline(&mut self) -> Option<SimTime> {
        while let Some(top) = self.heap.peek() {
            if self.cancelled.contains(&top.handle) {
                let entry = self.heap.pop().expect("peeked entry vanished");
                self.cancelled.remove(&entry.handle);
                continue;
            }
            return Some(top.at);
        }
        None
    }

    pub fn is_idle(&self) -> bool {
        self.live.is_empty()
    }
}

impl TimerScheduler for EventQueue {
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule_at(&mut self, at: SimTime, event: SchedEvent) -> TimerHandle {
        assert!(at >= self.now, "deadline {} lies in the past (now {})", at, self.now);
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        self.heap.push(Entry { at, handle, event });
        tracing::trace!("scheduled {:?} for {}", event, at);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        // Only live handles become tombstones; stale cancels are no-ops
        if self.live.remove(&handle) {
            self.cancelled.insert(handle);
        }
    }
}
