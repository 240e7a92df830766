//! Service layer: the periodic collection driver.

pub mod collection;

pub use collection::CollectionService;
