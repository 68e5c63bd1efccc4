use std::time::Instant;

use tokio::runtime::Handle;

use crate::{PacekitError, Scheduler, Task, TimerHandle};

/// Scheduler backed by a tokio runtime.
///
/// Each timer is a spawned task that sleeps until its deadline. The clock is
/// [`tokio::time::Instant`], so code under `#[tokio::test(start_paused = true)]`
/// sees virtual time.
///
/// Cancelled timers still wake at their deadline and then exit without running
/// the task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Use the given runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    ///
    /// Fails with [`PacekitError::RuntimeUnavailable`] outside a runtime context.
    pub fn current() -> Result<Self, PacekitError> {
        let handle =
            Handle::try_current().map_err(|e| PacekitError::RuntimeUnavailable(e.to_string()))?;

        Ok(Self::new(handle))
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle {
        let timer = TimerHandle::new();
        let claim = timer.clone();

        self.handle.spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;

            if claim.begin_fire() {
                task();
            }
        });

        timer
    }
}
