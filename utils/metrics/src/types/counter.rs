use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter that can also be overwritten with an
/// absolute value when it mirrors an externally maintained total.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn increment(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Release);
    }

    /// Overwrite the counter with an observed absolute value.
    pub fn absolute(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }
}
