use std::{
    fmt,
    ops::Deref,
    sync::Arc,
    time::Duration,
};

use crate::PacekitError;

/// Window length in milliseconds for rate-limited decorators.
///
/// Validated newtype: must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaitMs(u64);

impl WaitMs {
    /// Window length as a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Deref for WaitMs {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for WaitMs {
    type Error = PacekitError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(PacekitError::InvalidArgument(
                "Wait must be at least 1 ms".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<Duration> for WaitMs {
    type Error = PacekitError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        let millis = u64::try_from(value.as_millis()).map_err(|_| {
            PacekitError::InvalidArgument("Wait does not fit in u64 milliseconds".to_string())
        })?;

        Self::try_from(millis)
    }
}

/// Upper bound on queued executions a [`Queue`](crate::Queue) keeps outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxPending(usize);

impl Deref for MaxPending {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<usize> for MaxPending {
    type Error = PacekitError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(PacekitError::InvalidArgument(
                "Queue capacity must be greater than 0".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }
}

/// What a rate-limited wrapper did with a call.
///
/// Only [`Invocation::Executed`] carries a result computed by this call. The other
/// variants report the last completed result, which may be `None` if the wrapped
/// function has never finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation<R> {
    /// The wrapped function ran synchronously on this call.
    Executed(R),
    /// A deferred execution was scheduled for this call.
    Scheduled {
        /// Time until the deferred execution is due.
        fires_in: Duration,
        /// Result of the most recent completed execution.
        last_result: Option<R>,
    },
    /// A trailing execution was already pending; the call was dropped.
    Absorbed {
        /// Result of the most recent completed execution.
        last_result: Option<R>,
    },
    /// The queue is at capacity; the call was dropped.
    Rejected {
        /// Time until the oldest pending execution is due to fire.
        retry_after: Duration,
        /// Result of the most recent completed execution.
        last_result: Option<R>,
    },
}

impl<R> Invocation<R> {
    /// Whether the wrapped function ran on this call.
    pub fn is_executed(&self) -> bool {
        matches!(self, Invocation::Executed(_))
    }

    /// The freshest result visible to the caller.
    pub fn last_result(&self) -> Option<&R> {
        match self {
            Invocation::Executed(result) => Some(result),
            Invocation::Scheduled { last_result, .. }
            | Invocation::Absorbed { last_result }
            | Invocation::Rejected { last_result, .. } => last_result.as_ref(),
        }
    }

    /// Consume the decision and return the freshest result.
    pub fn into_last_result(self) -> Option<R> {
        match self {
            Invocation::Executed(result) => Some(result),
            Invocation::Scheduled { last_result, .. }
            | Invocation::Absorbed { last_result }
            | Invocation::Rejected { last_result, .. } => last_result,
        }
    }
}

/// Channel for failures of scheduled executions.
///
/// A scheduled execution has no caller left to propagate to, so its failures
/// are handed to this reporter. The default reporter logs through `tracing` at
/// error level.
#[derive(Clone)]
pub struct FailureReporter(Arc<dyn Fn(PacekitError) + Send + Sync>);

impl FailureReporter {
    /// Build a reporter from a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(PacekitError) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Hand a failure to the reporter.
    pub fn report(&self, error: PacekitError) {
        (self.0)(error)
    }
}

impl Default for FailureReporter {
    fn default() -> Self {
        Self::new(|error| {
            tracing::error!(error = %error, "scheduled execution failed");
        })
    }
}

impl fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FailureReporter").finish_non_exhaustive()
    }
}
