use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{Invocation, MaxPending, PacekitError, PacerOptions};

use super::support::{Recorder, collecting_reporter, manual_pacer, ms, wait};

#[test]
fn burst_is_spaced_one_window_apart() {
    let (scheduler, pacer) = manual_pacer(PacerOptions::default());
    let recorder = Recorder::new(&scheduler);
    let rec = recorder.clone();
    let queued = pacer.queue(move |n: u32| rec.record(n), wait(100));

    assert!(queued.call(1).is_executed());

    scheduler.advance(ms(10));
    assert!(matches!(
        queued.call(2),
        Invocation::Scheduled { fires_in, .. } if fires_in == ms(90)
    ));

    scheduler.advance(ms(10));
    assert!(matches!(
        queued.call(3),
        Invocation::Scheduled { fires_in, .. } if fires_in == ms(180)
    ));

    scheduler.run_until_idle();

    assert_eq!(recorder.runs(), vec![(0, 1), (100, 2), (200, 3)]);
}

#[test]
fn no_call_is_dropped() {
    let (scheduler, pacer) = manual_pacer(PacerOptions::default());
    let recorder = Recorder::new(&scheduler);
    let rec = recorder.clone();
    let queued = pacer.queue(move |n: u32| rec.record(n), wait(50));

    for n in 0..20 {
        queued.call(n);
    }
    assert_eq!(queued.pending(), 19);

    scheduler.run_until_idle();

    let runs = recorder.runs();
    assert_eq!(runs.len(), 20);
    assert_eq!(
        runs.iter().map(|(_, n)| *n).collect::<Vec<_>>(),
        (0..20).collect::<Vec<_>>()
    );
    assert!(runs.windows(2).all(|pair| pair[1].0 - pair[0].0 == 50));
}

#[test]
fn idle_gap_longer_than_window_runs_immediately() {
    let (scheduler, pacer) = manual_pacer(PacerOptions::default());
    let recorder = Recorder::new(&scheduler);
    let rec = recorder.clone();
    let queued = pacer.queue(move |n: u32| rec.record(n), wait(100));

    queued.call(1);
    queued.call(2); // slot at t=100

    scheduler.advance(ms(150));
    // Latest slot was t=100, so the window is still open until t=200.
    assert!(matches!(
        queued.call(3),
        Invocation::Scheduled { fires_in, .. } if fires_in == ms(50)
    ));

    scheduler.advance(ms(300)); // t=450
    assert!(queued.call(4).is_executed());

    assert_eq!(recorder.times(), vec![0, 100, 200, 450]);
}

#[test]
fn scheduled_results_report_the_last_completed_run() {
    let (scheduler, pacer) = manual_pacer(PacerOptions::default());
    let queued = pacer.queue(|n: u32| n * 10, wait(100));

    assert_eq!(queued.call(1), Invocation::Executed(10));
    assert_eq!(
        queued.call(2),
        Invocation::Scheduled {
            fires_in: ms(100),
            last_result: Some(10)
        }
    );

    scheduler.advance(ms(100));
    assert_eq!(queued.last_result(), Some(20));

    assert_eq!(queued.call(3).into_last_result(), Some(20));
}

#[test]
fn capacity_rejects_calls_beyond_the_cap() {
    let (scheduler, pacer) = manual_pacer(PacerOptions {
        queue_capacity: Some(MaxPending::try_from(2).unwrap()),
        ..PacerOptions::default()
    });
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let queued = pacer.queue(
        move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
        wait(100),
    );

    assert!(queued.call(()).is_executed());
    assert!(matches!(queued.call(()), Invocation::Scheduled { .. }));
    assert!(matches!(queued.call(()), Invocation::Scheduled { .. }));

    scheduler.advance(ms(30));
    assert!(matches!(
        queued.call(()),
        Invocation::Rejected { retry_after, .. } if retry_after == ms(70)
    ));

    // Once the first queued call fires there is room again.
    scheduler.advance(ms(70));
    assert_eq!(queued.pending(), 1);
    assert!(matches!(
        queued.call(()),
        Invocation::Scheduled { fires_in, .. } if fires_in == ms(200)
    ));

    scheduler.run_until_idle();
    assert_eq!(runs.load(Ordering::SeqCst), 4);
}

#[test]
fn cancel_drops_queued_calls_and_rolls_back_reservations() {
    let (scheduler, pacer) = manual_pacer(PacerOptions::default());
    let recorder = Recorder::new(&scheduler);
    let rec = recorder.clone();
    let queued = pacer.queue(move |n: u32| rec.record(n), wait(100));

    queued.call(1);
    queued.call(2);
    queued.call(3);

    assert_eq!(queued.cancel(), 2);
    assert_eq!(queued.pending(), 0);

    // Paced from the run at t=0, not from the cancelled reservation at t=200.
    scheduler.advance(ms(100));
    assert!(queued.call(4).is_executed());

    scheduler.run_until_idle();
    assert_eq!(recorder.runs(), vec![(0, 1), (100, 4)]);
}

#[test]
fn dropping_the_wrapper_cancels_queued_calls() {
    let (scheduler, pacer) = manual_pacer(PacerOptions::default());
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let queued = pacer.queue(
        move |_: u8| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
        wait(10),
    );

    for n in 0..5 {
        queued.call(n);
    }
    assert_eq!(scheduler.pending(), 4);

    drop(queued);
    assert_eq!(scheduler.pending(), 0);

    scheduler.advance(ms(1_000));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn queued_panic_is_reported_and_later_calls_still_run() {
    let (reporter, failures) = collecting_reporter();
    let (scheduler, pacer) = manual_pacer(PacerOptions {
        on_failure: reporter,
        ..PacerOptions::default()
    });
    let recorder = Recorder::new(&scheduler);
    let rec = recorder.clone();
    let queued = pacer.queue(
        move |n: u32| {
            if n == 2 {
                panic!("bad input {n}");
            }
            rec.record(n);
            n
        },
        wait(100),
    );

    queued.call(1);
    queued.call(2);
    queued.call(3);

    scheduler.run_until_idle();

    assert_eq!(recorder.runs(), vec![(0, 1), (200, 3)]);
    assert_eq!(
        *failures.lock(),
        vec![PacekitError::ExecutionFailure {
            origin: "queue",
            message: "bad input 2".to_string(),
        }]
    );
    assert_eq!(queued.last_result(), Some(3));
    assert_eq!(queued.pending(), 0);
}
