//! The built-in base-scope definition set for a managed-runtime attribute
//! tree: threading, heap memory, class loading, CPU, uptime, and the
//! templated per-collector garbage-collection pair.

use crate::catalog::definition::{AttributeBinding, MetricDefinition, MetricKind};

const THREADING: &str = "platform/threading";
const MEMORY: &str = "platform/memory";
const CLASS_LOADING: &str = "platform/class-loading";
const OPERATING_SYSTEM: &str = "platform/operating-system";
const RUNTIME: &str = "platform/runtime";
const GARBAGE_COLLECTOR: &str = "platform/garbage-collector/%s";

const HEAP_MEMORY_USAGE: &str = "heap-memory-usage";

/// The canonical base metric definitions.
///
/// The per-collector `gc.%s.*` pair is templated: the set of collectors is
/// unknown until [`CatalogExpander`](crate::catalog::CatalogExpander)
/// discovers it from the live tree.
pub fn definitions() -> Vec<MetricDefinition> {
    vec![
        MetricDefinition::new("thread.count", MetricKind::Counter)
            .with_description("Number of currently live threads")
            .with_source(AttributeBinding::new(THREADING, "thread-count")),
        MetricDefinition::new("thread.daemon.count", MetricKind::Counter)
            .with_description("Number of currently live daemon threads")
            .with_source(AttributeBinding::new(THREADING, "daemon-thread-count")),
        MetricDefinition::new("thread.max.count", MetricKind::Counter)
            .with_description("Peak live thread count since process start")
            .with_source(AttributeBinding::new(THREADING, "peak-thread-count")),
        MetricDefinition::new("memory.usedHeap", MetricKind::Gauge)
            .with_unit("bytes")
            .with_description("Heap memory currently in use")
            .with_source(AttributeBinding::new(MEMORY, HEAP_MEMORY_USAGE).with_subfield("used")),
        MetricDefinition::new("memory.committedHeap", MetricKind::Gauge)
            .with_unit("bytes")
            .with_description("Heap memory committed by the runtime")
            .with_source(
                AttributeBinding::new(MEMORY, HEAP_MEMORY_USAGE).with_subfield("committed"),
            ),
        MetricDefinition::new("memory.maxHeap", MetricKind::Gauge)
            .with_unit("bytes")
            .with_description("Maximum heap memory available")
            .with_source(AttributeBinding::new(MEMORY, HEAP_MEMORY_USAGE).with_subfield("max")),
        MetricDefinition::new("classloader.currentLoadedClass.count", MetricKind::Counter)
            .with_description("Number of classes currently loaded")
            .with_source(AttributeBinding::new(CLASS_LOADING, "loaded-class-count")),
        MetricDefinition::new("classloader.totalLoadedClass.count", MetricKind::Counter)
            .with_description("Total classes loaded since process start")
            .with_source(AttributeBinding::new(CLASS_LOADING, "total-loaded-class-count")),
        MetricDefinition::new("classloader.totalUnloadedClass.count", MetricKind::Counter)
            .with_description("Total classes unloaded since process start")
            .with_source(AttributeBinding::new(CLASS_LOADING, "unloaded-class-count")),
        MetricDefinition::new("cpu.availableProcessors", MetricKind::Gauge)
            .with_description("Processors available to the managed process")
            .with_source(AttributeBinding::new(OPERATING_SYSTEM, "available-processors")),
        MetricDefinition::new("cpu.systemLoadAverage", MetricKind::Gauge)
            .with_description("System load average of the last minute")
            .with_source(AttributeBinding::new(OPERATING_SYSTEM, "system-load-average")),
        MetricDefinition::new("runtime.uptime", MetricKind::Gauge)
            .with_unit("milliseconds")
            .with_description("Time since the managed process started")
            .with_source(AttributeBinding::new(RUNTIME, "uptime")),
        MetricDefinition::new("gc.%s.count", MetricKind::Counter)
            .with_description("Collections performed by this garbage collector")
            .with_source(AttributeBinding::new(GARBAGE_COLLECTOR, "collection-count"))
            .templated(),
        MetricDefinition::new("gc.%s.time", MetricKind::Gauge)
            .with_unit("milliseconds")
            .with_description("Accumulated time spent in this garbage collector")
            .with_source(AttributeBinding::new(GARBAGE_COLLECTOR, "collection-time"))
            .templated(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::{Registry, Scope};

    #[test]
    fn platform_set_installs_cleanly() {
        let registry = Registry::new();
        registry.install_platform().unwrap();

        let base = registry.scope(Scope::Base);
        assert!(base.contains("thread.count"));
        assert!(base.contains("memory.usedHeap"));
        assert!(base.contains("runtime.uptime"));
        // The gc pair stays templated until expansion.
        assert!(!base.contains("gc.%s.count"));
        assert_eq!(base.templates().len(), 2);
    }

    #[test]
    fn memory_gauges_read_composite_subfields() {
        let used = definitions()
            .into_iter()
            .find(|definition| definition.name == "memory.usedHeap")
            .unwrap();
        let binding = used.source.unwrap();
        assert_eq!(binding.attribute, "heap-memory-usage");
        assert_eq!(binding.subfield.as_deref(), Some("used"));
    }
}
