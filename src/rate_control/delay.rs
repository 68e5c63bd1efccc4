use crate::{FailureReporter, Scheduler, TimerHandle, WaitMs, rate_control::run_isolated};

/// Schedule `func(args)` to run once, `wait` after now.
///
/// The arguments are moved into the deferred call; nothing else is bound. The
/// return value is discarded and a panic goes to `reporter`.
pub(crate) fn schedule_delayed<F, A, R>(
    scheduler: &dyn Scheduler,
    reporter: FailureReporter,
    func: F,
    wait: WaitMs,
    args: A,
) -> TimerHandle
where
    F: FnOnce(A) -> R + Send + 'static,
    A: Send + 'static,
{
    let deadline = scheduler.now() + wait.as_duration();

    tracing::trace!(wait_ms = *wait, "delay: call scheduled");

    scheduler.schedule(
        deadline,
        Box::new(move || {
            let _ = run_isolated("delay", &reporter, move || func(args));
        }),
    )
}
