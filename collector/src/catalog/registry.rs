use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use vantage_metrics::{Counter, Gauge, Histogram, HitCounter, Meter, ParallelCounter};

use crate::catalog::definition::{MetricDefinition, MetricKind};
use crate::catalog::snapshot::{MetricSnapshot, MetricValue, ScopeSnapshot};
use crate::error::{CollectorError, Result};

/// An independent metric namespace. Names never collide across scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Platform-level metrics every managed process exposes.
    Base,
    /// Metrics specific to this runtime vendor.
    Vendor,
    /// Metrics registered by application code.
    Application,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Base, Scope::Vendor, Scope::Application];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Base => "base",
            Scope::Vendor => "vendor",
            Scope::Application => "application",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The live typed holder registered next to a definition.
#[derive(Debug, Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Histogram(Arc<Histogram>),
    Meter(Arc<Meter>),
    HitCounter(Arc<HitCounter>),
    ParallelCounter(Arc<ParallelCounter>),
}

impl Metric {
    fn for_kind(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Counter => Metric::Counter(Arc::new(Counter::new())),
            MetricKind::Gauge => Metric::Gauge(Arc::new(Gauge::new())),
            MetricKind::Histogram => Metric::Histogram(Arc::new(Histogram::new())),
            MetricKind::Meter => Metric::Meter(Arc::new(Meter::new())),
            MetricKind::HitCounter => Metric::HitCounter(Arc::new(HitCounter::new())),
            MetricKind::ParallelCounter => {
                Metric::ParallelCounter(Arc::new(ParallelCounter::new()))
            }
        }
    }

    /// Capture the holder's current value for export.
    pub fn value(&self) -> MetricValue {
        match self {
            Metric::Counter(counter) => MetricValue::Counter {
                count: counter.get(),
            },
            Metric::Gauge(gauge) => MetricValue::Gauge { value: gauge.get() },
            Metric::Histogram(histogram) => MetricValue::Histogram(histogram.summary()),
            Metric::Meter(meter) => MetricValue::Meter(meter.summary()),
            Metric::HitCounter(counter) => MetricValue::HitCounter {
                count: counter.hits(),
            },
            Metric::ParallelCounter(counter) => {
                MetricValue::ParallelCounter(counter.snapshot())
            }
        }
    }
}

/// A definition together with its live holder and poll-time bookkeeping.
#[derive(Debug)]
pub struct RegisteredMetric {
    definition: MetricDefinition,
    metric: Metric,
    /// Set when the backing attribute turned out not to exist; the entry is
    /// skipped by every later poll until the catalog is rebuilt.
    unavailable: AtomicBool,
}

impl RegisteredMetric {
    pub fn definition(&self) -> &MetricDefinition {
        &self.definition
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_unavailable(&self) {
        self.unavailable.store(true, Ordering::Relaxed);
    }
}

/// One scope's metric catalog, mapping each name to its definition and live
/// holder.
///
/// `define` runs during startup, before the scheduler exists; lookups and
/// holder access are concurrent and lock-free afterwards.
#[derive(Debug)]
pub struct Catalog {
    scope: Scope,
    global_tags: BTreeMap<String, String>,
    entries: DashMap<String, Arc<RegisteredMetric>>,
    templates: RwLock<Vec<MetricDefinition>>,
}

impl Catalog {
    pub fn new(scope: Scope) -> Self {
        Self::with_global_tags(scope, BTreeMap::new())
    }

    pub fn with_global_tags(scope: Scope, global_tags: BTreeMap<String, String>) -> Self {
        Self {
            scope,
            global_tags,
            entries: DashMap::new(),
            templates: RwLock::new(Vec::new()),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Add a definition to the catalog.
    ///
    /// Global tags are merged in here; a definition's own tags win on
    /// conflict. Templated definitions are stored for expansion without
    /// allocating a holder. Fails with [`CollectorError::DuplicateName`] when
    /// a concrete name is already registered in this scope.
    pub fn define(&self, mut definition: MetricDefinition) -> Result<()> {
        for (key, value) in &self.global_tags {
            definition
                .tags
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        if definition.templated {
            let has_placeholder_source = definition
                .source
                .as_ref()
                .is_some_and(|binding| binding.path.has_placeholder());
            if !definition.name_has_placeholder() || !has_placeholder_source {
                return Err(CollectorError::InvalidTemplate {
                    name: definition.name,
                    reason: "templated definition needs a '%s' placeholder in both \
                             its name and its binding path"
                        .into(),
                });
            }
            let mut templates = self
                .templates
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            templates.push(definition);
            return Ok(());
        }

        if definition.name_has_placeholder() {
            return Err(CollectorError::InvalidTemplate {
                name: definition.name,
                reason: "concrete definition must not contain the '%s' placeholder".into(),
            });
        }
        if definition.source.is_some() && !definition.kind.supports_binding() {
            return Err(CollectorError::UnsupportedBinding {
                name: definition.name,
                kind: definition.kind.to_string(),
            });
        }

        match self.entries.entry(definition.name.clone()) {
            Entry::Occupied(_) => Err(CollectorError::DuplicateName {
                name: definition.name,
                scope: self.scope.to_string(),
            }),
            Entry::Vacant(slot) => {
                let metric = Metric::for_kind(definition.kind);
                slot.insert(Arc::new(RegisteredMetric {
                    definition,
                    metric,
                    unavailable: AtomicBool::new(false),
                }));
                Ok(())
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<RegisteredMetric>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered (concrete) entries, in no particular order.
    pub fn entries(&self) -> Vec<Arc<RegisteredMetric>> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// The templated definitions awaiting expansion.
    pub fn templates(&self) -> Vec<MetricDefinition> {
        self.templates
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn counter(&self, name: &str) -> Option<Arc<Counter>> {
        match self.get(name)?.metric() {
            Metric::Counter(counter) => Some(Arc::clone(counter)),
            _ => None,
        }
    }

    pub fn gauge(&self, name: &str) -> Option<Arc<Gauge>> {
        match self.get(name)?.metric() {
            Metric::Gauge(gauge) => Some(Arc::clone(gauge)),
            _ => None,
        }
    }

    pub fn histogram(&self, name: &str) -> Option<Arc<Histogram>> {
        match self.get(name)?.metric() {
            Metric::Histogram(histogram) => Some(Arc::clone(histogram)),
            _ => None,
        }
    }

    pub fn meter(&self, name: &str) -> Option<Arc<Meter>> {
        match self.get(name)?.metric() {
            Metric::Meter(meter) => Some(Arc::clone(meter)),
            _ => None,
        }
    }

    pub fn hit_counter(&self, name: &str) -> Option<Arc<HitCounter>> {
        match self.get(name)?.metric() {
            Metric::HitCounter(counter) => Some(Arc::clone(counter)),
            _ => None,
        }
    }

    pub fn parallel_counter(&self, name: &str) -> Option<Arc<ParallelCounter>> {
        match self.get(name)?.metric() {
            Metric::ParallelCounter(counter) => Some(Arc::clone(counter)),
            _ => None,
        }
    }

    /// Every parallel counter in this scope, for the rotation tick.
    pub fn parallel_counters(&self) -> Vec<Arc<ParallelCounter>> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.value().metric() {
                Metric::ParallelCounter(counter) => Some(Arc::clone(counter)),
                _ => None,
            })
            .collect()
    }

    /// Capture the scope's current values, sorted by metric name.
    pub fn snapshot(&self) -> ScopeSnapshot {
        let mut metrics: Vec<MetricSnapshot> = self
            .entries
            .iter()
            .map(|entry| MetricSnapshot::capture(entry.value()))
            .collect();
        metrics.sort_by(|a, b| a.name.cmp(&b.name));

        ScopeSnapshot {
            scope: self.scope,
            captured_at: chrono::Utc::now(),
            metrics,
        }
    }
}

/// The bundle of the three scope catalogs, constructed once at startup and
/// passed by handle to the scheduler and to application code.
#[derive(Debug)]
pub struct Registry {
    base: Catalog,
    vendor: Catalog,
    application: Catalog,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_global_tags(BTreeMap::new())
    }

    /// Build a registry whose catalogs merge `global_tags` into every
    /// definition.
    pub fn with_global_tags(global_tags: BTreeMap<String, String>) -> Self {
        Self {
            base: Catalog::with_global_tags(Scope::Base, global_tags.clone()),
            vendor: Catalog::with_global_tags(Scope::Vendor, global_tags.clone()),
            application: Catalog::with_global_tags(Scope::Application, global_tags),
        }
    }

    pub fn scope(&self, scope: Scope) -> &Catalog {
        match scope {
            Scope::Base => &self.base,
            Scope::Vendor => &self.vendor,
            Scope::Application => &self.application,
        }
    }

    pub fn scopes(&self) -> [&Catalog; 3] {
        [&self.base, &self.vendor, &self.application]
    }

    /// Install the built-in platform definition set into the base scope.
    pub fn install_platform(&self) -> Result<()> {
        for definition in crate::catalog::platform::definitions() {
            self.base.define(definition)?;
        }
        Ok(())
    }

    pub fn snapshot(&self, scope: Scope) -> ScopeSnapshot {
        self.scope(scope).snapshot()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::definition::AttributeBinding;

    #[test]
    fn duplicate_names_fail_within_a_scope() {
        let catalog = Catalog::new(Scope::Base);
        catalog
            .define(MetricDefinition::new("thread.count", MetricKind::Counter))
            .unwrap();

        let err = catalog
            .define(MetricDefinition::new("thread.count", MetricKind::Gauge))
            .unwrap_err();
        assert!(matches!(err, CollectorError::DuplicateName { .. }));
    }

    #[test]
    fn scopes_are_independent_namespaces() {
        let registry = Registry::new();
        let definition = MetricDefinition::new("requests.active", MetricKind::ParallelCounter);

        registry.scope(Scope::Base).define(definition.clone()).unwrap();
        registry
            .scope(Scope::Vendor)
            .define(definition.clone())
            .unwrap();
        registry
            .scope(Scope::Application)
            .define(definition)
            .unwrap();
    }

    #[test]
    fn templates_are_not_registered_directly() {
        let catalog = Catalog::new(Scope::Base);
        catalog
            .define(
                MetricDefinition::new("gc.%s.count", MetricKind::Counter)
                    .with_source(AttributeBinding::new(
                        "platform/garbage-collector/%s",
                        "collection-count",
                    ))
                    .templated(),
            )
            .unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.templates().len(), 1);
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let catalog = Catalog::new(Scope::Base);
        let err = catalog
            .define(
                MetricDefinition::new("gc.count", MetricKind::Counter)
                    .with_source(AttributeBinding::new(
                        "platform/garbage-collector",
                        "collection-count",
                    ))
                    .templated(),
            )
            .unwrap_err();
        assert!(matches!(err, CollectorError::InvalidTemplate { .. }));
    }

    #[test]
    fn bindings_on_caller_driven_kinds_are_rejected() {
        let catalog = Catalog::new(Scope::Base);
        let err = catalog
            .define(
                MetricDefinition::new("requests.active", MetricKind::ParallelCounter)
                    .with_source(AttributeBinding::new("platform/threading", "thread-count")),
            )
            .unwrap_err();
        assert!(matches!(err, CollectorError::UnsupportedBinding { .. }));
    }

    #[test]
    fn global_tags_merge_without_overriding() {
        let mut tags = BTreeMap::new();
        tags.insert("app".to_string(), "shop".to_string());
        tags.insert("tier".to_string(), "web".to_string());
        let catalog = Catalog::with_global_tags(Scope::Application, tags);

        catalog
            .define(
                MetricDefinition::new("orders.open", MetricKind::ParallelCounter)
                    .with_tag("tier", "backend"),
            )
            .unwrap();

        let entry = catalog.get("orders.open").unwrap();
        let tags = &entry.definition().tags;
        assert_eq!(tags.get("app").map(String::as_str), Some("shop"));
        // The definition's own tag wins.
        assert_eq!(tags.get("tier").map(String::as_str), Some("backend"));
    }
}
