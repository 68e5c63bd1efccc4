use std::time::Instant;

use crate::{Scheduler, Task, TimerHandle};

/// Scheduler backed by smol's global executor.
///
/// Each timer is a detached task awaiting [`smol::Timer::at`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SmolScheduler;

impl SmolScheduler {
    /// Create a scheduler on smol's global executor.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for SmolScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule(&self, deadline: Instant, task: Task) -> TimerHandle {
        let timer = TimerHandle::new();
        let claim = timer.clone();

        smol::spawn(async move {
            smol::Timer::at(deadline).await;

            if claim.begin_fire() {
                task();
            }
        })
        .detach();

        timer
    }
}
