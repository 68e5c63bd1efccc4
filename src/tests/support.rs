use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{FailureReporter, ManualScheduler, PacekitError, Pacer, PacerOptions, Scheduler, WaitMs};

pub(super) fn wait(ms: u64) -> WaitMs {
    WaitMs::try_from(ms).unwrap()
}

pub(super) fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

pub(super) fn manual_pacer(options: PacerOptions) -> (Arc<ManualScheduler>, Pacer) {
    let scheduler = Arc::new(ManualScheduler::new());
    let pacer = Pacer::new(scheduler.clone(), options);
    (scheduler, pacer)
}

/// Records `(milliseconds since start, argument)` for every run of a wrapped function.
#[derive(Clone)]
pub(super) struct Recorder<T> {
    scheduler: Arc<ManualScheduler>,
    start: Instant,
    runs: Arc<Mutex<Vec<(u64, T)>>>,
}

impl<T: Clone> Recorder<T> {
    pub(super) fn new(scheduler: &Arc<ManualScheduler>) -> Self {
        Self {
            scheduler: scheduler.clone(),
            start: scheduler.now(),
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn record(&self, value: T) {
        let at = self.scheduler.now().duration_since(self.start).as_millis() as u64;
        self.runs.lock().push((at, value));
    }

    pub(super) fn runs(&self) -> Vec<(u64, T)> {
        self.runs.lock().clone()
    }

    pub(super) fn times(&self) -> Vec<u64> {
        self.runs.lock().iter().map(|(at, _)| *at).collect()
    }

    pub(super) fn count(&self) -> usize {
        self.runs.lock().len()
    }
}

/// Reporter that collects every failure it receives.
pub(super) fn collecting_reporter() -> (FailureReporter, Arc<Mutex<Vec<PacekitError>>>) {
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = failures.clone();
    let reporter = FailureReporter::new(move |error| sink.lock().push(error));
    (reporter, failures)
}
