pub mod counter;
pub mod gauge;
pub mod histogram;
pub mod hit_counter;
pub mod meter;
pub mod parallel;

pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::{Histogram, HistogramSummary};
pub use hit_counter::HitCounter;
pub use meter::{Meter, MeterSummary};
pub use parallel::{ParallelCounter, ParallelSnapshot};
