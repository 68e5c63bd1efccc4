use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Weak},
    time::Instant,
};

use parking_lot::{Mutex, ReentrantMutex};

use crate::{
    FailureReporter, Invocation, MaxPending, Scheduler, TimerHandle, WaitMs,
    rate_control::run_isolated,
};

/// Function whose calls are spaced at least one window apart. No call is dropped.
///
/// # Algorithm
///
/// The wrapper tracks the start of the latest reserved slot.
///
/// 1. If the window since that slot has elapsed, the function runs now and now
///    becomes the latest slot.
/// 2. Otherwise the next slot is `latest + wait`; the call is scheduled there and
///    the next slot becomes the latest.
///
/// Back-to-back calls therefore land `wait` apart: calls at t=0, t=10 and t=20
/// with a 100 ms window run at t=0, t=100 and t=200.
///
/// # Capacity
///
/// Every queued call holds a timer until it fires. With
/// [`PacerOptions::queue_capacity`](crate::PacerOptions::queue_capacity) set, a call
/// that would exceed the cap is rejected with [`Invocation::Rejected`] instead of
/// being queued. Without a cap the queue grows with the backlog.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
/// use pacekit::{Invocation, ManualScheduler, Pacer, PacerOptions, WaitMs};
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let pacer = Pacer::new(scheduler.clone(), PacerOptions::default());
/// let send = pacer.queue(|n: u32| n * 2, WaitMs::try_from(100).unwrap());
///
/// assert_eq!(send.call(1), Invocation::Executed(2));
/// assert!(matches!(send.call(2), Invocation::Scheduled { .. }));
/// assert!(matches!(send.call(3), Invocation::Scheduled { .. }));
/// assert_eq!(send.pending(), 2);
///
/// scheduler.advance(Duration::from_millis(200));
/// assert_eq!(send.pending(), 0);
/// assert_eq!(send.last_result(), Some(6));
/// ```
pub struct Queue<A, R> {
    inner: Arc<QueueInner<A, R>>,
}

struct QueueInner<A, R> {
    func: Box<dyn Fn(A) -> R + Send + Sync>,
    wait: WaitMs,
    capacity: Option<MaxPending>,
    scheduler: Arc<dyn Scheduler>,
    reporter: FailureReporter,
    state: Mutex<QueueState<R>>,
    exec: ReentrantMutex<()>,
}

struct QueueState<R> {
    /// Start of the latest reserved slot; may lie in the future.
    last_fired_at: Option<Instant>,
    /// Start of the latest run that actually began.
    last_started_at: Option<Instant>,
    pending: VecDeque<(Instant, TimerHandle)>,
    last_result: Option<R>,
}

impl<R> QueueState<R> {
    fn prune(&mut self) {
        self.pending.retain(|(_, handle)| handle.is_pending());
    }
}

impl<A, R> Queue<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    pub(crate) fn new<F>(
        func: F,
        wait: WaitMs,
        capacity: Option<MaxPending>,
        scheduler: Arc<dyn Scheduler>,
        reporter: FailureReporter,
    ) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(QueueInner {
                func: Box::new(func),
                wait,
                capacity,
                scheduler,
                reporter,
                state: Mutex::new(QueueState {
                    last_fired_at: None,
                    last_started_at: None,
                    pending: VecDeque::new(),
                    last_result: None,
                }),
                exec: ReentrantMutex::new(()),
            }),
        }
    } // end constructor

    /// Invoke the queued function.
    ///
    /// Runs it now if the latest slot's window has elapsed, otherwise queues it for
    /// the next free slot. A panic from a run that happens on this call unwinds to
    /// the caller.
    pub fn call(&self, args: A) -> Invocation<R> {
        let inner = &self.inner;
        let wait = inner.wait.as_duration();

        let mut state = inner.state.lock();
        let now = inner.scheduler.now();

        match state.last_fired_at {
            Some(last_fired_at) if now.saturating_duration_since(last_fired_at) < wait => {
                state.prune();

                if let Some(capacity) = inner.capacity
                    && state.pending.len() >= *capacity
                {
                    let retry_after = state
                        .pending
                        .front()
                        .map(|(slot, _)| slot.saturating_duration_since(now))
                        .unwrap_or_default();

                    tracing::warn!(
                        capacity = *capacity,
                        retry_after_ms = retry_after.as_millis() as u64,
                        "queue: at capacity, call rejected"
                    );

                    return Invocation::Rejected {
                        retry_after,
                        last_result: state.last_result.clone(),
                    };
                }

                let slot = last_fired_at + wait;
                let weak: Weak<QueueInner<A, R>> = Arc::downgrade(inner);

                let handle = inner.scheduler.schedule(
                    slot,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            inner.fire_queued(args);
                        }
                    }),
                );

                state.last_fired_at = Some(slot);
                state.pending.push_back((slot, handle));

                let fires_in = slot.saturating_duration_since(now);
                tracing::trace!(
                    fires_in_ms = fires_in.as_millis() as u64,
                    pending = state.pending.len(),
                    "queue: call queued"
                );

                Invocation::Scheduled {
                    fires_in,
                    last_result: state.last_result.clone(),
                }
            }
            _ => {
                state.last_fired_at = Some(now);
                state.last_started_at = Some(now);
                drop(state);

                tracing::trace!("queue: window elapsed, running now");
                Invocation::Executed(inner.execute(args))
            }
        }
    } // end method call

    /// Result of the most recent completed run.
    pub fn last_result(&self) -> Option<R> {
        self.inner.state.lock().last_result.clone()
    }

    /// Number of queued calls that have not started yet.
    pub fn pending(&self) -> usize {
        let mut state = self.inner.state.lock();
        state.prune();
        state.pending.len()
    }

    /// Cancel every queued call.
    ///
    /// Returns how many calls were prevented from running. Slot reservations are
    /// rolled back to the latest run that actually started, so the next call is
    /// paced from that run.
    pub fn cancel(&self) -> usize {
        let mut state = self.inner.state.lock();

        let cancelled = state
            .pending
            .drain(..)
            .filter(|(_, handle)| handle.cancel())
            .count();

        state.last_fired_at = state.last_started_at;
        cancelled
    }

    /// Window length.
    pub fn wait(&self) -> WaitMs {
        self.inner.wait
    }
} // end of impl

impl<A, R> QueueInner<A, R>
where
    R: Clone,
{
    fn execute(&self, args: A) -> R {
        let _exec = self.exec.lock();

        let result = (self.func)(args);
        self.state.lock().last_result = Some(result.clone());
        result
    }

    fn fire_queued(&self, args: A) {
        let _exec = self.exec.lock();

        {
            let mut state = self.state.lock();
            state.prune();
            state.last_started_at = Some(self.scheduler.now());
        }

        tracing::trace!("queue: queued call firing");

        if let Some(result) = run_isolated("queue", &self.reporter, || (self.func)(args)) {
            self.state.lock().last_result = Some(result);
        }
    }
}

impl<A, R> Drop for QueueInner<A, R> {
    fn drop(&mut self) {
        let cancelled = self
            .state
            .get_mut()
            .pending
            .drain(..)
            .filter(|(_, handle)| handle.cancel())
            .count();

        if cancelled > 0 {
            tracing::debug!(cancelled, "queue: wrapper dropped, queued calls cancelled");
        }
    }
}

impl<A, R> Clone for Queue<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, R> fmt::Debug for Queue<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();

        f.debug_struct("Queue")
            .field("wait", &self.inner.wait)
            .field("capacity", &self.inner.capacity)
            .field("last_fired_at", &state.last_fired_at)
            .field("pending", &state.pending.len())
            .finish_non_exhaustive()
    }
}
