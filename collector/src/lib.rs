//! # Vantage Collector
//!
//! A runtime-metrics collection engine for managed processes that expose a
//! hierarchical, introspectable attribute tree, featuring:
//! - A declarative, scope-partitioned metric catalog with typed semantics
//! - Template expansion over dynamically discovered instances (e.g. one
//!   counter per garbage collector, whichever collectors exist at runtime)
//! - A periodic collection loop refreshing attribute-backed metrics with
//!   per-definition failure isolation
//! - Race-free rolling high-water-mark counters rotated on their own cadence
//!
//! ## Architecture
//!
//! The engine is built from explicitly constructed, handle-passed parts
//! with no global registries:
//! - **Attribute Layer**: [`attribute::AttributeSource`] abstracts the
//!   managed process's introspection channel (batched queries, instance
//!   enumeration)
//! - **Catalog Layer**: [`catalog::Registry`] bundles the base, vendor, and
//!   application scope catalogs; [`catalog::CatalogExpander`] materializes
//!   templated definitions against the live tree
//! - **Service Layer**: [`services::CollectionService`] drives the two
//!   independent periodic activities (attribute polling, peak rotation)
//! - **Configuration**: TOML-based with environment overrides and fail-fast
//!   validation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vantage_collector::catalog::{CatalogExpander, Registry, Scope};
//! use vantage_collector::config::Config;
//! use vantage_collector::mock::MockAttributeSource;
//! use vantage_collector::services::CollectionService;
//!
//! #[tokio::main]
//! async fn main() -> vantage_collector::Result<()> {
//!     let config = Config::load_from_env()?;
//!     let registry = Arc::new(Registry::with_global_tags(config.global_tags()?));
//!     registry.install_platform()?;
//!
//!     // Any AttributeSource implementation works here.
//!     let source = Arc::new(MockAttributeSource::new());
//!
//!     // Discover dynamic instances, then start collecting.
//!     CatalogExpander::new(source.clone()).expand(&registry).await?;
//!     let service = CollectionService::new(registry, source, config)?;
//!     service.start().await?;
//!
//!     let snapshot = service.snapshot(Scope::Base);
//!     println!("{} base metrics", snapshot.metrics.len());
//!
//!     service.stop();
//!     Ok(())
//! }
//! ```

/// Abstraction over the managed process's attribute tree
pub mod attribute;

/// Metric definitions, per-scope registries, and template expansion
pub mod catalog;

/// Recognized options with validation and environment overrides
pub mod config;

/// Typed error taxonomy for the engine
pub mod error;

/// In-memory attribute tree for tests
pub mod mock;

/// Periodic collection and rotation driver
pub mod services;

// === PUBLIC API EXPORTS ===

/// Recognized collection options.
pub use config::Config;

/// Error types and result alias for the engine.
pub use error::{AttributeError, CollectorError, ConfigError, Result};

/// The scope-partitioned metric catalog bundle.
pub use catalog::{CatalogExpander, MetricDefinition, MetricKind, Registry, Scope};

/// The periodic collection driver.
pub use services::CollectionService;
