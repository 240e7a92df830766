use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

const SLOT_COUNT: usize = 12;

/// A thread-safe, fixed-memory histogram for sampled numeric values.
///
/// Values are clamped to the configured bounds and distributed across
/// 12 equally sized slots; count, sum, min, max, and the latest sample are
/// tracked alongside the distribution. All updates are atomic, so the
/// histogram can be shared across threads behind an `Arc` without locks.
///
/// # Examples
///
/// ```rust
/// use vantage_metrics::Histogram;
///
/// let histogram = Histogram::new();
/// histogram.set_bounds(0.0, 100.0);
///
/// histogram.record(25.0);
/// histogram.record(50.0);
/// histogram.record(150.0); // clamped to 100.0
///
/// assert_eq!(histogram.count(), 3);
/// assert_eq!(histogram.max(), 100.0);
/// ```
#[derive(Debug)]
pub struct Histogram {
    /// Sample counts per slot; slot 0 holds the lowest in-bounds values.
    slots: [AtomicU64; SLOT_COUNT],
    /// Lower and upper clamping bounds, stored as f64 bit patterns.
    bounds: (AtomicU64, AtomicU64),
    count: AtomicU64,
    /// Running sum of clamped samples, stored as f64 bits and updated with a
    /// compare-exchange loop.
    sum: AtomicU64,
    /// Seeded with +inf so the first sample always wins the exchange.
    min: AtomicU64,
    /// Seeded with -inf, mirroring `min`.
    max: AtomicU64,
    latest: AtomicU64,
}

/// Serializable point-in-time summary of a [`Histogram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: f64,
    pub mean: f64,
    /// Minimum clamped sample, 0.0 when empty.
    pub min: f64,
    /// Maximum clamped sample, 0.0 when empty.
    pub max: f64,
    pub latest: f64,
    /// Active clamping bounds as `(lower, upper)`.
    pub bounds: (f64, f64),
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create a histogram with wide default bounds of `[-1e6, 1e6]`.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| AtomicU64::new(0)),
            bounds: (
                AtomicU64::new((-1e6_f64).to_bits()),
                AtomicU64::new(1e6_f64.to_bits()),
            ),
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0.0_f64.to_bits()),
            min: AtomicU64::new(f64::INFINITY.to_bits()),
            max: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            latest: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Replace the clamping bounds. Ignored unless `lower <= upper`.
    /// Previously recorded samples are unaffected.
    pub fn set_bounds(&self, lower: f64, upper: f64) {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return;
        }
        self.bounds.0.store(lower.to_bits(), Ordering::Relaxed);
        self.bounds.1.store(upper.to_bits(), Ordering::Relaxed);
    }

    /// Record a single sample. NaN samples are skipped.
    pub fn record(&self, value: f64) {
        self.record_many(value, 1);
    }

    /// Record `occurrences` identical samples with one pass over the shared
    /// state, which is substantially cheaper than repeated single records.
    pub fn record_many(&self, value: f64, occurrences: u64) {
        if value.is_nan() || occurrences == 0 {
            return;
        }
        let (lower, upper) = self.bounds();
        let clamped = value.clamp(lower, upper);

        self.slots[self.slot_index(clamped, lower, upper)]
            .fetch_add(occurrences, Ordering::Relaxed);
        self.count.fetch_add(occurrences, Ordering::Relaxed);
        self.add_sum(clamped * occurrences as f64);
        self.exchange_min(clamped);
        self.exchange_max(clamped);
        self.latest.store(clamped.to_bits(), Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> f64 {
        f64::from_bits(self.sum.load(Ordering::Relaxed))
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() / count as f64
        }
    }

    pub fn min(&self) -> f64 {
        if self.count() == 0 {
            0.0
        } else {
            f64::from_bits(self.min.load(Ordering::Relaxed))
        }
    }

    pub fn max(&self) -> f64 {
        if self.count() == 0 {
            0.0
        } else {
            f64::from_bits(self.max.load(Ordering::Relaxed))
        }
    }

    pub fn latest(&self) -> f64 {
        f64::from_bits(self.latest.load(Ordering::Relaxed))
    }

    pub fn lower(&self) -> f64 {
        f64::from_bits(self.bounds.0.load(Ordering::Relaxed))
    }

    pub fn upper(&self) -> f64 {
        f64::from_bits(self.bounds.1.load(Ordering::Relaxed))
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower(), self.upper())
    }

    /// Per-slot sample counts, lowest value range first.
    pub fn slots(&self) -> [u64; SLOT_COUNT] {
        std::array::from_fn(|i| self.slots[i].load(Ordering::Relaxed))
    }

    pub fn summary(&self) -> HistogramSummary {
        HistogramSummary {
            count: self.count(),
            sum: self.sum(),
            mean: self.mean(),
            min: self.min(),
            max: self.max(),
            latest: self.latest(),
            bounds: self.bounds(),
        }
    }

    fn slot_index(&self, clamped: f64, lower: f64, upper: f64) -> usize {
        let span = upper - lower;
        if span <= 0.0 {
            return 0;
        }
        let position = (clamped - lower) / span * SLOT_COUNT as f64;
        (position as usize).min(SLOT_COUNT - 1)
    }

    fn add_sum(&self, delta: f64) {
        let mut current = self.sum.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match self
                .sum
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    fn exchange_min(&self, value: f64) {
        let mut current = self.min.load(Ordering::Relaxed);
        while value < f64::from_bits(current) {
            match self.min.compare_exchange_weak(
                current,
                value.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    fn exchange_max(&self, value: f64) {
        let mut current = self.max.load(Ordering::Relaxed);
        while value > f64::from_bits(current) {
            match self.max.compare_exchange_weak(
                current,
                value.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
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
    fn records_clamp_to_bounds() {
        let histogram = Histogram::new();
        histogram.set_bounds(0.0, 100.0);

        histogram.record(150.0);
        histogram.record(-25.0);

        assert_eq!(histogram.count(), 2);
        assert_eq!(histogram.min(), 0.0);
        assert_eq!(histogram.max(), 100.0);
        assert_eq!(histogram.sum(), 100.0);
    }

    #[test]
    fn nan_samples_are_skipped() {
        let histogram = Histogram::new();
        histogram.record(f64::NAN);
        assert_eq!(histogram.count(), 0);
    }

    #[test]
    fn slot_distribution_covers_range() {
        let histogram = Histogram::new();
        histogram.set_bounds(0.0, 120.0);

        for value in [0.0, 15.0, 115.0, 120.0] {
            histogram.record(value);
        }

        let slots = histogram.slots();
        assert_eq!(slots[0], 1); // 0.0
        assert_eq!(slots[1], 1); // 15.0
        assert_eq!(slots[11], 2); // 115.0 and upper bound
    }
}
