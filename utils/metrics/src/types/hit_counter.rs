use std::sync::atomic::{AtomicU64, Ordering};

/// A strictly monotonic invocation counter. Unlike [`Counter`](super::Counter)
/// it offers no decrement path; hits only ever accumulate.
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Overwrite with an observed absolute value when the counter mirrors an
    /// externally maintained total.
    pub fn absolute(&self, value: u64) {
        self.hits.store(value, Ordering::Relaxed);
    }
}
