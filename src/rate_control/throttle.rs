use std::{
    fmt,
    sync::{Arc, Weak},
    time::Instant,
};

use parking_lot::{Mutex, ReentrantMutex};

use crate::{
    FailureReporter, Invocation, Scheduler, TimerHandle, WaitMs, rate_control::run_isolated,
};

/// Function that runs at most once per window, keeping a single trailing call.
///
/// # State Machine
///
/// | State       | Call arrives                       | Result                                  |
/// |-------------|------------------------------------|-----------------------------------------|
/// | idle        | no prior run, or window elapsed    | run now, window opens ([`Invocation::Executed`]) |
/// | window open | no trailing call pending           | trailing call scheduled at window close ([`Invocation::Scheduled`]) |
/// | scheduled   | trailing call pending              | call dropped ([`Invocation::Absorbed`]) |
///
/// When the trailing call fires it runs with the arguments of the call that
/// scheduled it and opens a fresh window starting at its fire time.
///
/// # Semantics
///
/// - The wrapped function never runs on two threads at once.
/// - `last_result` only ever holds the result of a *completed* run.
/// - While a trailing call is pending every further call is absorbed, even if the
///   scheduler is running late past the window close.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
/// use pacekit::{Invocation, ManualScheduler, Pacer, PacerOptions, WaitMs};
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let pacer = Pacer::new(scheduler.clone(), PacerOptions::default());
/// let save = pacer.throttle(|doc: &'static str| doc.len(), WaitMs::try_from(100).unwrap());
///
/// assert_eq!(save.call("a"), Invocation::Executed(1));
///
/// scheduler.advance(Duration::from_millis(50));
/// assert!(matches!(save.call("abc"), Invocation::Scheduled { .. }));
/// assert!(matches!(save.call("abcd"), Invocation::Absorbed { .. }));
///
/// scheduler.advance(Duration::from_millis(50));
/// assert_eq!(save.last_result(), Some(3));
/// ```
pub struct Throttle<A, R> {
    inner: Arc<ThrottleInner<A, R>>,
}

struct ThrottleInner<A, R> {
    func: Box<dyn Fn(A) -> R + Send + Sync>,
    wait: WaitMs,
    scheduler: Arc<dyn Scheduler>,
    reporter: FailureReporter,
    state: Mutex<ThrottleState<R>>,
    exec: ReentrantMutex<()>,
}

struct ThrottleState<R> {
    last_fired_at: Option<Instant>,
    trailing: Option<TimerHandle>,
    last_result: Option<R>,
}

impl<A, R> Throttle<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    pub(crate) fn new<F>(
        func: F,
        wait: WaitMs,
        scheduler: Arc<dyn Scheduler>,
        reporter: FailureReporter,
    ) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ThrottleInner {
                func: Box::new(func),
                wait,
                scheduler,
                reporter,
                state: Mutex::new(ThrottleState {
                    last_fired_at: None,
                    trailing: None,
                    last_result: None,
                }),
                exec: ReentrantMutex::new(()),
            }),
        }
    } // end constructor

    /// Invoke the throttled function.
    ///
    /// Runs it now if the window is closed, otherwise schedules or absorbs the call.
    /// A panic from a run that happens on this call unwinds to the caller.
    pub fn call(&self, args: A) -> Invocation<R> {
        let inner = &self.inner;
        let wait = inner.wait.as_duration();

        let mut state = inner.state.lock();
        let now = inner.scheduler.now();

        if state.trailing.is_some() {
            tracing::trace!("throttle: trailing call already pending, call absorbed");
            return Invocation::Absorbed {
                last_result: state.last_result.clone(),
            };
        }

        match state.last_fired_at {
            Some(last_fired_at) if now.saturating_duration_since(last_fired_at) < wait => {
                let deadline = last_fired_at + wait;
                let weak: Weak<ThrottleInner<A, R>> = Arc::downgrade(inner);

                let handle = inner.scheduler.schedule(
                    deadline,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            inner.fire_trailing(args);
                        }
                    }),
                );

                state.trailing = Some(handle);

                let fires_in = deadline.saturating_duration_since(now);
                tracing::trace!(
                    fires_in_ms = fires_in.as_millis() as u64,
                    "throttle: trailing call scheduled"
                );

                Invocation::Scheduled {
                    fires_in,
                    last_result: state.last_result.clone(),
                }
            }
            _ => {
                state.last_fired_at = Some(now);
                drop(state);

                tracing::trace!("throttle: window closed, running now");
                Invocation::Executed(inner.execute(args))
            }
        }
    } // end method call

    /// Result of the most recent completed run.
    pub fn last_result(&self) -> Option<R> {
        self.inner.state.lock().last_result.clone()
    }

    /// Whether a trailing call is waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.inner.state.lock().trailing.is_some()
    }

    /// Cancel the pending trailing call, if any.
    ///
    /// Returns `true` if a trailing call was prevented from running. The window
    /// opened by the last run is left as it is.
    pub fn cancel(&self) -> bool {
        let trailing = self.inner.state.lock().trailing.take();

        match trailing {
            Some(handle) => handle.cancel(),
            None => false,
        }
    }

    /// Window length.
    pub fn wait(&self) -> WaitMs {
        self.inner.wait
    }
} // end of impl

impl<A, R> ThrottleInner<A, R>
where
    R: Clone,
{
    fn execute(&self, args: A) -> R {
        let _exec = self.exec.lock();

        let result = (self.func)(args);
        self.state.lock().last_result = Some(result.clone());
        result
    }

    fn fire_trailing(&self, args: A) {
        let _exec = self.exec.lock();

        {
            let mut state = self.state.lock();
            // A fired handle here is the one that scheduled this run.
            if state.trailing.as_ref().is_some_and(TimerHandle::has_fired) {
                state.trailing = None;
            }
            state.last_fired_at = Some(self.scheduler.now());
        }

        tracing::trace!("throttle: trailing call firing");

        if let Some(result) = run_isolated("throttle", &self.reporter, || (self.func)(args)) {
            self.state.lock().last_result = Some(result);
        }
    }
}

impl<A, R> Drop for ThrottleInner<A, R> {
    fn drop(&mut self) {
        if let Some(handle) = self.state.get_mut().trailing.take()
            && handle.cancel()
        {
            tracing::debug!("throttle: wrapper dropped, trailing call cancelled");
        }
    }
}

impl<A, R> Clone for Throttle<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, R> fmt::Debug for Throttle<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();

        f.debug_struct("Throttle")
            .field("wait", &self.inner.wait)
            .field("last_fired_at", &state.last_fired_at)
            .field("has_pending", &state.trailing.is_some())
            .finish_non_exhaustive()
    }
}
