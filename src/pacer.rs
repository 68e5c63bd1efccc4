//! Top-level entrypoint for the timer-backed decorators.
//!
//! A [`Pacer`] pairs a [`Scheduler`] with shared [`PacerOptions`] and hands out
//! [`Throttle`] and [`Queue`] wrappers and one-shot delayed calls. Wrappers built
//! from the same pacer share its scheduler but nothing else: each owns its own
//! window, timers and last result.

use std::{fmt, sync::Arc};

use crate::{
    FailureReporter, MaxPending, Queue, Scheduler, Throttle, TimerHandle, WaitMs,
    rate_control::schedule_delayed,
};

#[cfg(feature = "tokio")]
use crate::{PacekitError, TokioScheduler};

#[cfg(feature = "smol")]
use crate::SmolScheduler;

/// Configuration shared by every wrapper a [`Pacer`] creates.
#[derive(Clone, Debug, Default)]
pub struct PacerOptions {
    /// Receives failures of scheduled executions.
    ///
    /// Defaults to logging them through `tracing` at error level.
    pub on_failure: FailureReporter,
    /// Maximum number of outstanding queued calls per [`Queue`].
    ///
    /// `None` (the default) never rejects a call.
    pub queue_capacity: Option<MaxPending>,
}

/// Factory for timer-backed decorators.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
/// use pacekit::{ManualScheduler, Pacer, PacerOptions, WaitMs};
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let pacer = Pacer::new(scheduler.clone(), PacerOptions::default());
///
/// pacer.delay(|name: String| println!("hello {name}"), WaitMs::try_from(500).unwrap(), "world".to_string());
///
/// scheduler.advance(Duration::from_millis(500));
/// ```
pub struct Pacer {
    scheduler: Arc<dyn Scheduler>,
    options: PacerOptions,
}

impl Pacer {
    /// Create a pacer on the given scheduler.
    pub fn new(scheduler: Arc<dyn Scheduler>, options: PacerOptions) -> Self {
        Self { scheduler, options }
    }

    /// Create a pacer on the tokio runtime the caller is running on.
    #[cfg(feature = "tokio")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
    pub fn tokio(options: PacerOptions) -> Result<Self, PacekitError> {
        Ok(Self::new(Arc::new(TokioScheduler::current()?), options))
    }

    /// Create a pacer on smol's global executor.
    #[cfg(feature = "smol")]
    #[cfg_attr(docsrs, doc(cfg(feature = "smol")))]
    pub fn smol(options: PacerOptions) -> Self {
        Self::new(Arc::new(SmolScheduler::new()), options)
    }

    /// Scheduler backing this pacer.
    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    /// Options shared by wrappers from this pacer.
    pub fn options(&self) -> &PacerOptions {
        &self.options
    }

    /// Run `func(args)` once, no earlier than `wait` from now.
    ///
    /// Fire-and-forget: the caller is not blocked and the return value of `func`
    /// is discarded. The returned handle may be ignored; dropping it does not
    /// cancel the call. The arguments are moved into the deferred call and no other
    /// context is bound.
    pub fn delay<F, A, R>(&self, func: F, wait: WaitMs, args: A) -> TimerHandle
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
    {
        schedule_delayed(
            self.scheduler.as_ref(),
            self.options.on_failure.clone(),
            func,
            wait,
            args,
        )
    }

    /// Wrap `func` so it runs at most once per `wait`, keeping one trailing call.
    pub fn throttle<F, A, R>(&self, func: F, wait: WaitMs) -> Throttle<A, R>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        A: Send + 'static,
        R: Clone + Send + 'static,
    {
        Throttle::new(
            func,
            wait,
            self.scheduler.clone(),
            self.options.on_failure.clone(),
        )
    }

    /// Wrap `func` so that calls run one `wait` apart without being dropped.
    pub fn queue<F, A, R>(&self, func: F, wait: WaitMs) -> Queue<A, R>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        A: Send + 'static,
        R: Clone + Send + 'static,
    {
        Queue::new(
            func,
            wait,
            self.options.queue_capacity,
            self.scheduler.clone(),
            self.options.on_failure.clone(),
        )
    }
}

impl fmt::Debug for Pacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pacer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
