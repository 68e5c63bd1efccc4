use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{Scheduler, Task, TimerHandle};

/// Scheduler driven by a virtual clock.
///
/// Time only moves when [`advance`](ManualScheduler::advance) is called. Due tasks
/// run on the advancing thread, one at a time, in deadline order; tasks with equal
/// deadlines run in the order they were scheduled. Before each task runs the clock
/// is moved to that task's deadline, so the task observes its own fire time.
///
/// Useful for deterministic tests and for single-threaded event loops that want to
/// pump timers themselves.
///
/// # Examples
///
/// ```
/// use std::{sync::{Arc, atomic::{AtomicUsize, Ordering}}, time::Duration};
/// use pacekit::{ManualScheduler, Scheduler};
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicUsize::new(0));
///
/// let counter = fired.clone();
/// scheduler.schedule(
///     scheduler.now() + Duration::from_millis(100),
///     Box::new(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// scheduler.advance(Duration::from_millis(99));
/// assert_eq!(fired.load(Ordering::SeqCst), 0);
///
/// scheduler.advance(Duration::from_millis(1));
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

struct ManualState {
    now: Instant,
    next_seq: u64,
    timers: BinaryHeap<Reverse<Entry>>,
}

struct Entry {
    deadline: Instant,
    seq: u64,
    handle: TimerHandle,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

impl ManualScheduler {
    /// Create a scheduler whose clock starts at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a scheduler whose clock starts at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            state: Mutex::new(ManualState {
                now: start,
                next_seq: 0,
                timers: BinaryHeap::new(),
            }),
        }
    }

    /// Move the clock forward by `by`, running every task that becomes due.
    ///
    /// Tasks scheduled by running tasks are run too if their deadline falls inside
    /// the advanced span.
    pub fn advance(&self, by: Duration) {
        let target = self.state.lock().now + by;
        self.advance_to(target);
    }

    /// Move the clock to `target`, running every task due at or before it.
    ///
    /// A `target` in the past only runs tasks that are already due.
    pub fn advance_to(&self, target: Instant) {
        loop {
            let entry = {
                let mut state = self.state.lock();

                match state.timers.pop() {
                    Some(Reverse(entry)) if entry.deadline <= target => {
                        state.now = state.now.max(entry.deadline);
                        entry
                    }
                    not_due => {
                        if let Some(entry) = not_due {
                            state.timers.push(entry);
                        }
                        state.now = state.now.max(target);
                        return;
                    }
                }
            };

            if entry.handle.begin_fire() {
                (entry.task)();
            }
        }
    }

    /// Run tasks that are already due without moving the clock.
    pub fn run_due(&self) {
        self.advance(Duration::ZERO);
    }

    /// Advance until no live timers remain.
    pub fn run_until_idle(&self) {
        loop {
            let next = {
                let mut state = self.state.lock();
                while let Some(Reverse(entry)) = state.timers.peek()
                    && !entry.handle.is_pending()
                {
                    state.timers.pop();
                }

                state.timers.peek().map(|Reverse(entry)| entry.deadline)
            };

            match next {
                Some(deadline) => self.advance_to(deadline),
                None => return,
            }
        }
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .timers
            .iter()
            .filter(|Reverse(entry)| entry.handle.is_pending())
            .count()
    }

    /// Deadline of the earliest live timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state
            .lock()
            .timers
            .iter()
            .filter(|Reverse(entry)| entry.handle.is_pending())
            .map(|Reverse(entry)| entry.deadline)
            .min()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        state.timers.push(Reverse(Entry {
            deadline,
            seq,
            handle: handle.clone(),
            task,
        }));

        handle
    }
}
