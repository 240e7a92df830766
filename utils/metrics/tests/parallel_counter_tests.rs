use std::sync::Arc;
use std::thread;

use vantage_metrics::ParallelCounter;

#[test]
fn concurrent_increments_lose_no_peak_updates() {
    const THREADS: usize = 8;
    const INCREMENTS: usize = 5_000;

    let counter = Arc::new(ParallelCounter::new());
    let mut handles = Vec::with_capacity(THREADS);

    for _ in 0..THREADS {
        let counter = Arc::clone(&counter);
        handles.push(thread::spawn(move || {
            for _ in 0..INCREMENTS {
                counter.increment(1);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // With increments only, the maximum total is the final total. Any lost
    // peak update would leave the peak strictly below it.
    let expected = (THREADS * INCREMENTS) as i64;
    assert_eq!(counter.count(), expected);
    assert_eq!(counter.peak(), expected);
}

#[test]
fn concurrent_mixed_deltas_sum_to_net_total() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 10_000;

    let counter = Arc::new(ParallelCounter::new());
    let mut handles = Vec::with_capacity(THREADS);

    for _ in 0..THREADS {
        let counter = Arc::clone(&counter);
        handles.push(thread::spawn(move || {
            for _ in 0..ROUNDS {
                counter.increment(1);
                counter.decrement(1);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.count(), 0);
    // At most THREADS callers were ever between their increment and
    // decrement, and at least one increment completed before any decrement.
    let peak = counter.peak();
    assert!(peak >= 1, "peak {peak} lost every update");
    assert!(peak <= THREADS as i64, "peak {peak} exceeds possible overlap");
}

#[test]
fn rotation_concurrent_with_increments_keeps_totals() {
    const THREADS: usize = 4;
    const INCREMENTS: usize = 2_000;

    let counter = Arc::new(ParallelCounter::new());
    let mut handles = Vec::with_capacity(THREADS);

    for _ in 0..THREADS {
        let counter = Arc::clone(&counter);
        handles.push(thread::spawn(move || {
            for _ in 0..INCREMENTS {
                counter.increment(1);
            }
        }));
    }
    for _ in 0..20 {
        counter.rotate();
        thread::yield_now();
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // Rotation never perturbs the running total, only the peak bookkeeping.
    assert_eq!(counter.count(), (THREADS * INCREMENTS) as i64);

    let snapshot = counter.snapshot();
    assert!(snapshot.history.len() <= ParallelCounter::WINDOW_CAPACITY);
    // Every rotated peak was a total the counter actually reached.
    for rotated in &snapshot.history {
        assert!(*rotated >= 0);
        assert!(*rotated <= (THREADS * INCREMENTS) as i64);
    }
}

#[test]
fn history_grows_to_capacity_then_evicts_oldest() {
    let counter = ParallelCounter::new();

    for round in 1..=9 {
        counter.increment(round);
        counter.rotate();
        counter.decrement(round);
    }
    assert_eq!(counter.snapshot().history.len(), 9);

    counter.increment(42);
    counter.rotate();
    let snapshot = counter.snapshot();
    assert_eq!(snapshot.history.len(), 10);
    assert_eq!(snapshot.history[0], 42);
    assert_eq!(counter.peak(), 0);

    // One more rotation stays capped and drops the oldest peak.
    counter.decrement(42);
    counter.rotate();
    let snapshot = counter.snapshot();
    assert_eq!(snapshot.history.len(), 10);
    assert_eq!(snapshot.history[0], 0);
    assert_eq!(snapshot.history[9], 2);
}
