use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A concurrency-safe counter that tracks the number of simultaneously
/// outstanding occurrences of something (in-flight requests, open sessions,
/// parallel invocations) together with a rolling window of past peaks.
///
/// The counter keeps three pieces of state:
/// - the current total, adjusted by [`increment`](Self::increment) and
///   [`decrement`](Self::decrement)
/// - the peak: the maximum total observed since the last rotation
/// - a bounded history of the last [`Self::WINDOW_CAPACITY`] rotated peaks,
///   most recent first
///
/// # Peak correctness under concurrency
///
/// Every increment first applies its delta with a single `fetch_add`, then
/// raises the peak to the post-add total through a compare-exchange loop.
/// The post-add totals observed across all threads always include the true
/// maximum the counter ever reached, and the compare-exchange loop never
/// replaces a peak with a smaller candidate, so after any interleaving of
/// increments the peak equals the true maximum total of the window. A naive
/// load-compare-store sequence would allow two racing increments to publish
/// a stale, lower peak over a higher one.
///
/// # Rotation
///
/// [`rotate`](Self::rotate) atomically swaps the peak to zero and pushes the
/// captured value onto the front of the history, evicting the oldest entry
/// beyond capacity. Rotation is safe to run concurrently with increments: an
/// increment that completes after the swap raises the fresh peak and is
/// accounted to the next window.
///
/// # Examples
///
/// ```rust
/// use vantage_metrics::ParallelCounter;
///
/// let counter = ParallelCounter::new();
/// counter.increment(5);
/// counter.decrement(2);
///
/// assert_eq!(counter.count(), 3);
/// assert_eq!(counter.peak(), 5);
///
/// counter.rotate();
/// assert_eq!(counter.peak(), 0);
/// assert_eq!(counter.window()[0], 5);
/// ```
#[derive(Debug, Default)]
pub struct ParallelCounter {
    /// Current total. Signed: caller discipline decides whether decrements
    /// can outnumber increments.
    count: AtomicI64,
    /// Maximum total observed since the last rotation.
    peak: AtomicI64,
    /// Rotated peaks, most recent first, capped at `WINDOW_CAPACITY`.
    history: RwLock<VecDeque<i64>>,
}

/// A consistent read of a [`ParallelCounter`].
///
/// The three fields are not captured under one lock; each individually
/// reflects a value the counter actually held at some instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelSnapshot {
    /// Current total at capture time.
    pub count: i64,
    /// Peak of the in-progress window at capture time.
    pub peak: i64,
    /// Rotated peaks, most recent first. At most `WINDOW_CAPACITY` entries;
    /// shorter until that many rotations have happened.
    pub history: Vec<i64>,
}

impl ParallelCounter {
    /// Number of rotated peaks retained in the history window.
    pub const WINDOW_CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self {
            count: AtomicI64::new(0),
            peak: AtomicI64::new(0),
            history: RwLock::new(VecDeque::with_capacity(Self::WINDOW_CAPACITY)),
        }
    }

    /// Add `n` (≥ 1) to the total and raise the window peak to the new total
    /// if it is higher.
    pub fn increment(&self, n: i64) {
        debug_assert!(n >= 1, "increment delta must be >= 1");
        let total = self.count.fetch_add(n, Ordering::AcqRel) + n;
        self.raise_peak(total);
    }

    /// Subtract `n` (≥ 1) from the total. Decrements never lower the peak.
    pub fn decrement(&self, n: i64) {
        debug_assert!(n >= 1, "decrement delta must be >= 1");
        self.count.fetch_sub(n, Ordering::AcqRel);
    }

    /// Current total.
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Acquire)
    }

    /// Maximum total observed since the last rotation.
    pub fn peak(&self) -> i64 {
        self.peak.load(Ordering::Acquire)
    }

    /// Move the current peak into the history window and reset it to zero.
    ///
    /// The oldest entry is evicted once the window holds
    /// [`Self::WINDOW_CAPACITY`] peaks.
    pub fn rotate(&self) {
        let rotated = self.peak.swap(0, Ordering::AcqRel);
        let mut history = self.history.write();
        history.push_front(rotated);
        if history.len() > Self::WINDOW_CAPACITY {
            history.pop_back();
        }
    }

    /// Fixed-width view of the history window, most recent first, zero-filled
    /// until enough rotations have happened.
    pub fn window(&self) -> [i64; Self::WINDOW_CAPACITY] {
        let history = self.history.read();
        let mut window = [0i64; Self::WINDOW_CAPACITY];
        for (slot, value) in window.iter_mut().zip(history.iter()) {
            *slot = *value;
        }
        window
    }

    /// Capture the current total, peak, and history.
    pub fn snapshot(&self) -> ParallelSnapshot {
        ParallelSnapshot {
            count: self.count(),
            peak: self.peak(),
            history: self.history.read().iter().copied().collect(),
        }
    }

    /// Raise the peak to `candidate` unless a higher peak is already
    /// published. Compare-exchange so racing increments cannot regress it.
    fn raise_peak(&self, candidate: i64) {
        let mut current = self.peak.load(Ordering::Acquire);
        while candidate > current {
            match self.peak.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_tracks_count_and_peak() {
        let counter = ParallelCounter::new();
        counter.increment(2);
        counter.increment(3);
        counter.decrement(4);

        assert_eq!(counter.count(), 1);
        assert_eq!(counter.peak(), 5);
    }

    #[test]
    fn decrement_does_not_lower_peak() {
        let counter = ParallelCounter::new();
        counter.increment(10);
        counter.decrement(10);

        assert_eq!(counter.count(), 0);
        assert_eq!(counter.peak(), 10);
    }

    #[test]
    fn peak_resumes_below_previous_after_rotation() {
        let counter = ParallelCounter::new();
        counter.increment(10);
        counter.decrement(8);
        counter.rotate();

        // Window restarts at zero; the remaining total only becomes the new
        // peak once another increment observes it.
        assert_eq!(counter.peak(), 0);
        counter.increment(1);
        assert_eq!(counter.peak(), 3);
    }

    #[test]
    fn window_is_zero_filled() {
        let counter = ParallelCounter::new();
        assert_eq!(counter.window(), [0; 10]);

        counter.increment(7);
        counter.rotate();
        let window = counter.window();
        assert_eq!(window[0], 7);
        assert_eq!(&window[1..], &[0; 9]);
    }
}
