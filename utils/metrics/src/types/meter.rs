use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Counts marked events and derives their mean rate since creation.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    started: Instant,
}

/// Serializable point-in-time summary of a [`Meter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterSummary {
    pub count: u64,
    /// Events per second averaged over the meter's lifetime.
    pub mean_rate: f64,
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

impl Meter {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn mark(&self) {
        self.mark_many(1);
    }

    pub fn mark_many(&self, occurrences: u64) {
        self.count.fetch_add(occurrences, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Events per second averaged over the meter's lifetime. Zero until the
    /// first event.
    pub fn mean_rate(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        count as f64 / elapsed
    }

    pub fn summary(&self) -> MeterSummary {
        MeterSummary {
            count: self.count(),
            mean_rate: self.mean_rate(),
        }
    }
}
