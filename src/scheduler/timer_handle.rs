use std::sync::{
    Arc,
    atomic::{AtomicU8, AtomicU64, Ordering},
};

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Cancellable handle to a scheduled task.
///
/// Clones refer to the same timer. Dropping a handle does **not** cancel the
/// timer; call [`TimerHandle::cancel`] for that.
///
/// The handle moves through `pending -> fired` or `pending -> cancelled` exactly
/// once. Both transitions are compare-and-swap, so a cancel racing the scheduler's
/// fire has a single winner.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    state: Arc<AtomicU8>,
}

impl TimerHandle {
    /// Create a handle in the pending state.
    ///
    /// Only needed by [`Scheduler`](crate::Scheduler) implementations.
    pub fn new() -> Self {
        Self {
            id: NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed),
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    /// Process-unique identifier of this timer.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancel the timer.
    ///
    /// Returns `true` if this call prevented the task from running, `false` if it
    /// had already fired or been cancelled.
    pub fn cancel(&self) -> bool {
        self.transition(CANCELLED)
    }

    /// Claim the timer for execution.
    ///
    /// Schedulers call this right before running the task and skip the task when
    /// it returns `false`.
    pub fn begin_fire(&self) -> bool {
        self.transition(FIRED)
    }

    /// Timer has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    /// Timer was cancelled before it fired.
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Timer was claimed for execution.
    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::Acquire) == FIRED
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}
