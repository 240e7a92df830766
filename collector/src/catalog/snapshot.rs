use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vantage_metrics::{HistogramSummary, MeterSummary, ParallelSnapshot};

use crate::catalog::definition::MetricKind;
use crate::catalog::registry::{RegisteredMetric, Scope};

/// The exported reading of one metric, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Counter { count: u64 },
    Gauge { value: f64 },
    Histogram(HistogramSummary),
    Meter(MeterSummary),
    HitCounter { count: u64 },
    ParallelCounter(ParallelSnapshot),
}

/// One metric's exported state: identity, metadata, and current value(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub name: String,
    pub kind: MetricKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub tags: BTreeMap<String, String>,
    pub value: MetricValue,
}

impl MetricSnapshot {
    pub(crate) fn capture(entry: &RegisteredMetric) -> Self {
        let definition = entry.definition();
        Self {
            name: definition.name.clone(),
            kind: definition.kind,
            unit: definition.unit.clone(),
            tags: definition.tags.clone(),
            value: entry.metric().value(),
        }
    }
}

/// A point-in-time capture of every metric in one scope, sorted by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    pub scope: Scope,
    pub captured_at: DateTime<Utc>,
    pub metrics: Vec<MetricSnapshot>,
}

impl ScopeSnapshot {
    pub fn get(&self, name: &str) -> Option<&MetricSnapshot> {
        self.metrics.iter().find(|metric| metric.name == name)
    }
}
