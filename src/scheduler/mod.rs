//! Timer facility used by the deferred and rate-limited decorators.
//!
//! A [`Scheduler`] owns a clock and runs boxed tasks once their deadline has
//! passed. Every scheduled task is paired with a [`TimerHandle`] that can cancel
//! it before it fires.
//!
//! # Implementations
//!
//! - [`ManualScheduler`]: virtual clock advanced explicitly by the caller. Tasks run
//!   on the thread that calls [`ManualScheduler::advance`].
//! - `TokioScheduler` (feature `tokio`): one spawned task per timer on a tokio runtime.
//! - `SmolScheduler` (feature `smol`): one detached task per timer on smol's global executor.

use std::time::Instant;

mod timer_handle;
pub use timer_handle::*;

mod manual_scheduler;
pub use manual_scheduler::*;

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
mod tokio_scheduler;
#[cfg(feature = "tokio")]
pub use tokio_scheduler::*;

#[cfg(feature = "smol")]
#[cfg_attr(docsrs, doc(cfg(feature = "smol")))]
mod smol_scheduler;
#[cfg(feature = "smol")]
pub use smol_scheduler::*;

/// Unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Clock plus one-shot timers.
///
/// # Contract
///
/// - `schedule` must never run `task` synchronously, even for deadlines in the past.
///   Decorators call it while holding their own state lock.
/// - Before running a task the scheduler must call [`TimerHandle::begin_fire`] and
///   skip the task if that returns `false`.
pub trait Scheduler: Send + Sync {
    /// Current time on this scheduler's clock.
    fn now(&self) -> Instant;

    /// Run `task` no earlier than `deadline`.
    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle;
}
