//! The periodic collection driver.
//!
//! Two independent activities run on their own cadences: refreshing
//! attribute-backed metrics from the [`AttributeSource`], and rotating every
//! [`ParallelCounter`](vantage_metrics::ParallelCounter) peak into its
//! history window. Each is its own tokio task so their intervals and failure
//! domains stay separate, and both are aborted rather than awaited on
//! shutdown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant};
use tracing::{debug, info, warn};

use crate::attribute::{AttributePath, AttributeSource, AttributeValue};
use crate::catalog::{Catalog, Metric, RegisteredMetric, Registry, Scope, ScopeSnapshot};
use crate::config::Config;
use crate::error::{AttributeError, Result};

/// Budget for one attribute query round trip. A path that exceeds it keeps
/// its last values and is retried on the next tick, without stalling the
/// remaining paths indefinitely.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives attribute polling and parallel-counter rotation over a built
/// registry.
///
/// The registry must be fully populated (including template expansion)
/// before [`start`](Self::start) is called; the service only reads catalog
/// structure and mutates holders through their interior atomics.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vantage_collector::catalog::Registry;
/// use vantage_collector::config::Config;
/// use vantage_collector::mock::MockAttributeSource;
/// use vantage_collector::services::CollectionService;
///
/// # #[tokio::main]
/// # async fn main() -> vantage_collector::Result<()> {
/// let registry = Arc::new(Registry::new());
/// registry.install_platform()?;
///
/// let source = Arc::new(MockAttributeSource::new());
/// let service = CollectionService::new(registry, source, Config::default())?;
/// service.start().await?;
/// // ...
/// service.stop();
/// # Ok(())
/// # }
/// ```
pub struct CollectionService {
    registry: Arc<Registry>,
    source: Arc<dyn AttributeSource>,
    config: Config,
    query_timeout: Duration,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl CollectionService {
    /// Create a service over a built registry.
    ///
    /// The configuration is validated here, so malformed options surface
    /// before any periodic activity exists.
    pub fn new(
        registry: Arc<Registry>,
        source: Arc<dyn AttributeSource>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            source,
            config,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Override the per-query timeout budget.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Spawn the two periodic tasks. Call once.
    pub async fn start(&self) -> Result<()> {
        info!(
            poll_interval_secs = self.config.attribute_poll_interval_secs,
            rotation_interval_secs = self.config.rotation_interval_secs,
            "starting metric collection"
        );

        let mut tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let registry = Arc::clone(&self.registry);
        let source = Arc::clone(&self.source);
        let poll_interval = self.config.attribute_poll_interval();
        let query_timeout = self.query_timeout;
        tasks.push(tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            loop {
                ticker.tick().await;
                debug!("refreshing attribute-backed metrics");
                Self::poll_registry(&registry, source.as_ref(), query_timeout).await;
            }
        }));

        let registry = Arc::clone(&self.registry);
        let rotation_interval = self.config.rotation_interval();
        tasks.push(tokio::spawn(async move {
            // The first window should span a full interval, so the first
            // tick is delayed rather than immediate.
            let mut ticker =
                interval_at(Instant::now() + rotation_interval, rotation_interval);
            loop {
                ticker.tick().await;
                Self::rotate_registry(&registry);
            }
        }));

        Ok(())
    }

    /// Abort both periodic tasks. In-flight polls are abandoned: bounded
    /// shutdown takes priority over completing a slow external query.
    pub fn stop(&self) {
        let mut tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if tasks.is_empty() {
            return;
        }
        for task in tasks.drain(..) {
            task.abort();
        }
        info!("stopped metric collection");
    }

    /// Run one attribute-poll tick immediately.
    pub async fn poll_once(&self) {
        Self::poll_registry(&self.registry, self.source.as_ref(), self.query_timeout).await;
    }

    /// Rotate every parallel counter in every scope immediately.
    pub fn rotate_all(&self) {
        Self::rotate_registry(&self.registry);
    }

    /// Capture the current values of one scope.
    pub fn snapshot(&self, scope: Scope) -> ScopeSnapshot {
        self.registry.snapshot(scope)
    }

    async fn poll_registry(
        registry: &Registry,
        source: &dyn AttributeSource,
        query_timeout: Duration,
    ) {
        for catalog in registry.scopes() {
            Self::poll_catalog(catalog, source, query_timeout).await;
        }
    }

    /// Refresh one scope. Definitions are grouped by binding path so every
    /// path costs a single round trip per tick, and a failure for one path
    /// never aborts the remaining ones.
    async fn poll_catalog(catalog: &Catalog, source: &dyn AttributeSource, query_timeout: Duration) {
        let mut groups: HashMap<AttributePath, Vec<Arc<RegisteredMetric>>> = HashMap::new();
        for entry in catalog.entries() {
            if entry.is_unavailable() {
                continue;
            }
            let path = match entry.definition().source.as_ref() {
                Some(binding) => binding.path.clone(),
                None => continue,
            };
            groups.entry(path).or_default().push(entry);
        }

        for (path, entries) in groups {
            let mut attributes: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.definition().source.as_ref())
                .map(|binding| binding.attribute.as_str())
                .collect();
            attributes.sort_unstable();
            attributes.dedup();

            match tokio::time::timeout(query_timeout, source.query(&path, &attributes)).await {
                Ok(Ok(values)) => {
                    for entry in &entries {
                        Self::apply_value(catalog.scope(), entry, &values);
                    }
                }
                Ok(Err(err)) if err.is_transient() => {
                    warn!(
                        scope = %catalog.scope(),
                        path = %path,
                        error = %err,
                        "attribute query failed; keeping last values until next tick"
                    );
                }
                Ok(Err(err)) => {
                    warn!(
                        scope = %catalog.scope(),
                        path = %path,
                        metrics = entries.len(),
                        error = %err,
                        "attribute path unavailable; dropping its metrics from polling"
                    );
                    for entry in &entries {
                        entry.mark_unavailable();
                    }
                }
                Err(_) => {
                    let err = AttributeError::Timeout {
                        timeout: query_timeout,
                    };
                    warn!(
                        scope = %catalog.scope(),
                        path = %path,
                        error = %err,
                        "attribute query timed out; keeping last values until next tick"
                    );
                }
            }
        }
    }

    /// Push one queried value into the bound holder.
    fn apply_value(
        scope: Scope,
        entry: &RegisteredMetric,
        values: &std::collections::BTreeMap<String, AttributeValue>,
    ) {
        let definition = entry.definition();
        let Some(binding) = definition.source.as_ref() else {
            return;
        };

        let Some(raw) = values.get(&binding.attribute) else {
            warn!(
                scope = %scope,
                metric = %definition.name,
                attribute = %binding.attribute,
                "attribute missing from query result; dropping metric from polling"
            );
            entry.mark_unavailable();
            return;
        };

        let resolved = match binding.subfield.as_deref() {
            Some(subfield) => raw.field(subfield),
            None => Some(raw),
        };
        let Some(value) = resolved.and_then(AttributeValue::as_f64) else {
            warn!(
                scope = %scope,
                metric = %definition.name,
                attribute = %binding.attribute,
                "attribute value is not numeric; dropping metric from polling"
            );
            entry.mark_unavailable();
            return;
        };

        match entry.metric() {
            Metric::Counter(counter) => counter.absolute(value.max(0.0) as u64),
            Metric::HitCounter(counter) => counter.absolute(value.max(0.0) as u64),
            Metric::Gauge(gauge) => gauge.set(value),
            Metric::Histogram(histogram) => histogram.record(value),
            // define() rejects bindings on caller-driven kinds.
            Metric::Meter(_) | Metric::ParallelCounter(_) => {}
        }
    }

    fn rotate_registry(registry: &Registry) {
        let mut rotated = 0usize;
        for catalog in registry.scopes() {
            for counter in catalog.parallel_counters() {
                counter.rotate();
                rotated += 1;
            }
        }
        debug!(counters = rotated, "rotated parallel counter peaks");
    }
}

impl std::fmt::Debug for CollectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionService")
            .field("config", &self.config)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl Drop for CollectionService {
    fn drop(&mut self) {
        self.stop();
    }
}
