//! Decorators that change *when* a function runs.
//!
//! - [`delay`](crate::Pacer::delay): one deferred call, fire-and-forget.
//! - [`Throttle`]: at most one execution per window; one trailing call is kept,
//!   extra calls are dropped.
//! - [`Queue`]: every call runs, spaced one window apart.
//!
//! All three hand their scheduled work to a [`Scheduler`](crate::Scheduler) and
//! keep only a weak reference to wrapper state inside scheduled tasks, so dropping
//! the last wrapper clone stops anything still pending.
//!
//! # Failures
//!
//! A panic inside the wrapped function during a synchronous call unwinds to the
//! caller. A panic during a scheduled execution is caught, converted into
//! [`PacekitError::ExecutionFailure`] and passed to the wrapper's
//! [`FailureReporter`]. Window bookkeeping advances either way.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crate::{FailureReporter, PacekitError};

mod delay;
pub(crate) use delay::*;

mod throttle;
pub use throttle::*;

mod queue;
pub use queue::*;

/// Run `f`, turning a panic into a reported [`PacekitError::ExecutionFailure`].
pub(crate) fn run_isolated<T>(
    origin: &'static str,
    reporter: &FailureReporter,
    f: impl FnOnce() -> T,
) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            reporter.report(PacekitError::ExecutionFailure {
                origin,
                message: panic_message(payload.as_ref()),
            });
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
