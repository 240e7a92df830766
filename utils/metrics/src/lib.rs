//! # Vantage Metrics
//!
//! Thread-safe typed metric primitives used by the Vantage collection engine.
//!
//! ## Overview
//!
//! This crate provides the live value holders that back a metric catalog:
//! counters, gauges, histograms, meters, hit counters, and the
//! [`ParallelCounter`] rolling high-water-mark counter. All holders are safe
//! to share across threads behind an `Arc` and keep their hot paths lock-free
//! via atomic primitives.
//!
//! ## Features
//!
//! - **Lock-free hot paths**: increments, gauge stores, and histogram records
//!   are single atomic operations
//! - **Race-free peak tracking**: [`ParallelCounter`] maintains its high-water
//!   mark with a compare-exchange loop, so no concurrent increment can
//!   overwrite a higher peak with a stale one
//! - **Bounded rolling history**: rotated peaks are kept in a fixed-capacity,
//!   most-recent-first window
//! - **Serializable summaries**: every holder produces a `serde`-friendly
//!   summary type for export
//!
//! ## Quick Start
//!
//! ```rust
//! use vantage_metrics::ParallelCounter;
//!
//! let counter = ParallelCounter::new();
//!
//! counter.increment(3);
//! counter.decrement(1);
//! assert_eq!(counter.count(), 2);
//! assert_eq!(counter.peak(), 3);
//!
//! // A background task rotates the peak into the history window.
//! counter.rotate();
//! assert_eq!(counter.peak(), 0);
//! assert_eq!(counter.snapshot().history, vec![3]);
//! ```

pub mod types;

pub use types::{
    Counter, Gauge, Histogram, HistogramSummary, HitCounter, Meter, MeterSummary, ParallelCounter,
    ParallelSnapshot,
};
