use std::sync::atomic::{AtomicU64, Ordering};

/// A point-in-time floating point value, stored as an atomic bit pattern for
/// lock-free access.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f64) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn increment(&self, value: f64) {
        self.fetch_update(|current| current + value);
    }

    pub fn decrement(&self, value: f64) {
        self.fetch_update(|current| current - value);
    }

    fn fetch_update(&self, apply: impl Fn(f64) -> f64) {
        let mut current = self.value.load(Ordering::Relaxed);
        loop {
            let next = apply(f64::from_bits(current)).to_bits();
            match self.value.compare_exchange_weak(
                current,
                next,
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
    fn set_and_get() {
        let gauge = Gauge::new();
        gauge.set(128.5);
        assert_eq!(gauge.get(), 128.5);
    }

    #[test]
    fn increment_and_decrement() {
        let gauge = Gauge::new();
        gauge.set(10.0);
        gauge.increment(2.5);
        gauge.decrement(0.5);
        assert_eq!(gauge.get(), 12.0);
    }
}
