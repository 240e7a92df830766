//! The metric catalog: typed definitions, per-scope registries, template
//! expansion, and the built-in platform definition set.
//!
//! A [`Catalog`] maps metric names to a [`MetricDefinition`] plus a live
//! typed holder. Catalogs are partitioned into independent [`Scope`]s that
//! never share a namespace; the [`Registry`] bundles the three scopes and is
//! built once at startup, before the collection scheduler starts, and is
//! read-only thereafter (holders mutate through interior atomics).
//!
//! Definitions marked [`templated`](MetricDefinition::templated) reference a
//! variable-cardinality resource through a `%s` placeholder and are never
//! registered directly; the [`CatalogExpander`] discovers the current
//! instance set and materializes one concrete entry per instance.

pub mod definition;
pub mod expander;
pub mod platform;
pub mod registry;
pub mod snapshot;

pub use definition::{AttributeBinding, MetricDefinition, MetricKind};
pub use expander::CatalogExpander;
pub use registry::{Catalog, Metric, RegisteredMetric, Registry, Scope};
pub use snapshot::{MetricSnapshot, MetricValue, ScopeSnapshot};
