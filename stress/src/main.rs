use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use clap::{Parser, ValueEnum};
use hdrhistogram::Histogram;

use pacekit::{
    Invocation, MaxPending, Pacer, PacerOptions, Queue, Throttle, TokioScheduler, WaitMs,
};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Decorator {
    Throttle,
    Queue,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Mode {
    Max,
    TargetQps,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pacekit-stress",
    about = "Load test / benchmark harness for pacekit decorators"
)]
struct Args {
    #[arg(long, value_enum, default_value_t = Decorator::Throttle)]
    decorator: Decorator,

    #[arg(long, value_enum, default_value_t = Mode::Max)]
    mode: Mode,

    #[arg(long, default_value_t = 8)]
    threads: usize,

    #[arg(long, default_value_t = 4)]
    timer_threads: usize,

    #[arg(long, default_value_t = 10)]
    duration_s: u64,

    #[arg(long, default_value_t = 10)]
    wait_ms: u64,

    /// Only used with `--decorator queue`.
    #[arg(long, default_value_t = 1024)]
    queue_capacity: usize,

    /// Simulated work inside the wrapped function.
    #[arg(long, default_value_t = 0)]
    work_us: u64,

    #[arg(long, default_value_t = 100)]
    sample_every: u64,

    /// Per-thread call rate. Only used with `--mode target-qps`.
    #[arg(long)]
    target_qps: Option<u64>,
}

#[derive(Default)]
struct Counts {
    executed: AtomicU64,
    scheduled: AtomicU64,
    absorbed: AtomicU64,
    rejected: AtomicU64,
    runs: AtomicU64,
}

#[derive(Clone)]
enum Target {
    Throttle(Throttle<u64, u64>),
    Queue(Queue<u64, u64>),
}

impl Target {
    fn call(&self, n: u64) -> Invocation<u64> {
        match self {
            Target::Throttle(throttled) => throttled.call(n),
            Target::Queue(queued) => queued.call(n),
        }
    }

    fn drain(&self) -> usize {
        match self {
            Target::Throttle(throttled) => throttled.cancel() as usize,
            Target::Queue(queued) => queued.cancel(),
        }
    }
}

fn should_sample(iter: u64, sample_every: u64) -> bool {
    if sample_every <= 1 {
        return true;
    }

    iter.is_multiple_of(sample_every)
}

fn build_target(args: &Args, pacer: &Pacer, counts: &Arc<Counts>) -> Target {
    let runs = Arc::clone(counts);
    let work = Duration::from_micros(args.work_us);
    let func = move |n: u64| {
        if !work.is_zero() {
            std::thread::sleep(work);
        }
        runs.runs.fetch_add(1, Ordering::Relaxed);
        n
    };

    let wait = WaitMs::try_from(args.wait_ms).unwrap();
    match args.decorator {
        Decorator::Throttle => Target::Throttle(pacer.throttle(func, wait)),
        Decorator::Queue => Target::Queue(pacer.queue(func, wait)),
    }
}

fn print_results(
    args: &Args,
    elapsed: Duration,
    ops: u64,
    ops_s: f64,
    hist: &Histogram<u64>,
    counts: &Counts,
    cancelled: usize,
) {
    println!("decorator={:?} mode={:?}", args.decorator, args.mode);
    println!(
        "threads={} timer_threads={} duration_s={} wait_ms={} work_us={}",
        args.threads, args.timer_threads, args.duration_s, args.wait_ms, args.work_us
    );
    println!(
        "elapsed_s={:.3} ops={} ops_per_s={:.0}",
        elapsed.as_secs_f64(),
        ops,
        ops_s
    );
    println!(
        "executed={} scheduled={} absorbed={} rejected={} runs={} cancelled_at_end={}",
        counts.executed.load(Ordering::Relaxed),
        counts.scheduled.load(Ordering::Relaxed),
        counts.absorbed.load(Ordering::Relaxed),
        counts.rejected.load(Ordering::Relaxed),
        counts.runs.load(Ordering::Relaxed),
        cancelled
    );

    let max_runs = elapsed.as_millis() as u64 / args.wait_ms + 2;
    println!("max_runs_for_window={max_runs}");

    if !hist.is_empty() {
        let p50 = hist.value_at_quantile(0.50);
        let p95 = hist.value_at_quantile(0.95);
        let p99 = hist.value_at_quantile(0.99);
        let p999 = hist.value_at_quantile(0.999);
        println!(
            "lat_us p50={} p95={} p99={} p999={} max={}",
            p50,
            p95,
            p99,
            p999,
            hist.max()
        );
        println!("sample_every={} samples={}", args.sample_every, hist.len());
    } else {
        println!("no latency samples collected");
    }
}

fn run(args: &Args) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.timer_threads.max(1))
        .enable_time()
        .build()
        .unwrap();

    let pacer = Pacer::new(
        Arc::new(TokioScheduler::new(rt.handle().clone())),
        PacerOptions {
            queue_capacity: Some(MaxPending::try_from(args.queue_capacity).unwrap()),
            ..PacerOptions::default()
        },
    );

    let stop = Arc::new(AtomicBool::new(false));
    let counts = Arc::new(Counts::default());
    let total_ops = Arc::new(AtomicU64::new(0));
    let target = build_target(args, &pacer, &counts);

    let started = Instant::now();
    let deadline = started + Duration::from_secs(args.duration_s);

    let mut handles = Vec::with_capacity(args.threads);
    for _ in 0..args.threads {
        let target = target.clone();
        let stop = Arc::clone(&stop);
        let counts = Arc::clone(&counts);
        let total_ops = Arc::clone(&total_ops);
        let args = args.clone();

        handles.push(std::thread::spawn(move || {
            let mut hist = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).unwrap();
            let mut i = 0_u64;
            let mut next_deadline = Instant::now();

            while !stop.load(Ordering::Relaxed) {
                if Instant::now() >= deadline {
                    break;
                }

                if args.mode == Mode::TargetQps
                    && let Some(qps) = args.target_qps
                {
                    let per_op_ns = 1_000_000_000u64 / qps.max(1);
                    let now = Instant::now();
                    if now < next_deadline {
                        std::thread::sleep(next_deadline - now);
                    }
                    next_deadline += Duration::from_nanos(per_op_ns);
                }

                i = i.wrapping_add(1);
                let sample = should_sample(i, args.sample_every);
                let t0 = if sample { Some(Instant::now()) } else { None };

                let invocation = target.call(i);

                if let Some(t0) = t0 {
                    let us = t0.elapsed().as_micros() as u64;
                    let _ = hist.record(us.max(1));
                }

                total_ops.fetch_add(1, Ordering::Relaxed);
                let counter = match invocation {
                    Invocation::Executed(_) => &counts.executed,
                    Invocation::Scheduled { .. } => &counts.scheduled,
                    Invocation::Absorbed { .. } => &counts.absorbed,
                    Invocation::Rejected { .. } => &counts.rejected,
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }

            hist
        }));
    }

    std::thread::sleep(Duration::from_secs(args.duration_s));
    stop.store(true, Ordering::Relaxed);

    let mut merged = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).unwrap();
    for h in handles {
        let hist = h.join().unwrap();
        merged.add(&hist).unwrap();
    }

    let elapsed = started.elapsed();
    let cancelled = target.drain();
    let ops = total_ops.load(Ordering::Relaxed);
    let ops_s = ops as f64 / elapsed.as_secs_f64();
    print_results(args, elapsed, ops, ops_s, &merged, &counts, cancelled);
}

fn main() {
    let args = Args::parse();
    if args.wait_ms == 0 || args.queue_capacity == 0 {
        eprintln!("--wait-ms and --queue-capacity must be greater than 0");
        std::process::exit(2);
    }

    run(&args);
}
