use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributePath, INSTANCE_PLACEHOLDER};

/// The typed semantics of a metric, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    Meter,
    HitCounter,
    ParallelCounter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::HitCounter => "hit_counter",
            MetricKind::ParallelCounter => "parallel_counter",
        }
    }

    /// Whether metrics of this kind can be refreshed from an attribute
    /// binding. Meters and parallel counters are driven by application calls
    /// only.
    pub fn supports_binding(&self) -> bool {
        matches!(
            self,
            MetricKind::Counter | MetricKind::Gauge | MetricKind::Histogram | MetricKind::HitCounter
        )
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connects a definition to the attribute tree: a path, an attribute name
/// under that path, and optionally a sub-field of a composite attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub path: AttributePath,
    pub attribute: String,
    pub subfield: Option<String>,
}

impl AttributeBinding {
    pub fn new(path: impl Into<AttributePath>, attribute: &str) -> Self {
        Self {
            path: path.into(),
            attribute: attribute.to_string(),
            subfield: None,
        }
    }

    /// Read a named sub-field of a composite attribute instead of the
    /// attribute's own (non-numeric) value.
    pub fn with_subfield(mut self, subfield: &str) -> Self {
        self.subfield = Some(subfield.to_string());
        self
    }

    /// Replace placeholder path segments with a discovered instance
    /// identifier.
    pub fn substitute(&self, instance: &str) -> Self {
        Self {
            path: self.path.substitute(instance),
            attribute: self.attribute.clone(),
            subfield: self.subfield.clone(),
        }
    }
}

/// A single entry of the metric catalog.
///
/// Concrete definitions own a live holder once registered. Templated
/// definitions (name and binding carry the `%s` placeholder) only drive
/// expansion and are never registered directly.
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub name: String,
    pub kind: MetricKind,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub tags: BTreeMap<String, String>,
    pub source: Option<AttributeBinding>,
    pub templated: bool,
}

impl MetricDefinition {
    pub fn new(name: &str, kind: MetricKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            unit: None,
            description: None,
            display_name: None,
            tags: BTreeMap::new(),
            source: None,
            templated: false,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_source(mut self, source: AttributeBinding) -> Self {
        self.source = Some(source);
        self
    }

    /// Mark this definition as a template over a to-be-discovered instance
    /// set.
    pub fn templated(mut self) -> Self {
        self.templated = true;
        self
    }

    /// Whether the name carries the instance placeholder.
    pub fn name_has_placeholder(&self) -> bool {
        self.name.contains(INSTANCE_PLACEHOLDER)
    }

    /// Materialize the concrete definition for one discovered instance,
    /// substituting the identifier into the name and the binding path.
    pub fn expand_for_instance(&self, instance: &str) -> MetricDefinition {
        MetricDefinition {
            name: self.name.replace(INSTANCE_PLACEHOLDER, instance),
            kind: self.kind,
            unit: self.unit.clone(),
            description: self.description.clone(),
            display_name: self
                .display_name
                .as_ref()
                .map(|name| name.replace(INSTANCE_PLACEHOLDER, instance)),
            tags: self.tags.clone(),
            source: self.source.as_ref().map(|binding| binding.substitute(instance)),
            templated: false,
        }
    }
}
