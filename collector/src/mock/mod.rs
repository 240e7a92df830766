//! In-memory attribute tree for tests.
//!
//! [`MockAttributeSource`] mimics a managed process's introspection channel:
//! attributes can be set and mutated while the engine polls, paths can be
//! made to fail with transport faults, and queries are counted so tests can
//! assert on round-trip behavior.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::attribute::{AttributePath, AttributeSource, AttributeValue};
use crate::error::AttributeError;

/// A configurable, concurrently mutable [`AttributeSource`] double.
#[derive(Debug, Default)]
pub struct MockAttributeSource {
    nodes: DashMap<String, BTreeMap<String, AttributeValue>>,
    instances: DashMap<String, Vec<String>>,
    failing: DashSet<String>,
    queries: AtomicU64,
}

impl MockAttributeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) one attribute under a path, creating the path as
    /// needed.
    pub fn set_attribute(&self, path: &str, attribute: &str, value: impl Into<AttributeValue>) {
        let key = AttributePath::parse(path).to_string();
        self.nodes
            .entry(key)
            .or_default()
            .insert(attribute.to_string(), value.into());
    }

    /// Define the dynamic children reported for a path.
    pub fn set_instances(&self, path: &str, instances: &[&str]) {
        let key = AttributePath::parse(path).to_string();
        self.instances
            .insert(key, instances.iter().map(|id| id.to_string()).collect());
    }

    /// Make every operation on `path` fail with a transport error until
    /// [`restore`](Self::restore) is called.
    pub fn fail_transport(&self, path: &str) {
        self.failing.insert(AttributePath::parse(path).to_string());
    }

    /// Clear a transport failure injected with
    /// [`fail_transport`](Self::fail_transport).
    pub fn restore(&self, path: &str) {
        self.failing.remove(&AttributePath::parse(path).to_string());
    }

    /// Drop a path entirely, so queries against it report `Unavailable`.
    pub fn remove_path(&self, path: &str) {
        self.nodes.remove(&AttributePath::parse(path).to_string());
    }

    /// Number of `query` round trips served (including failed ones).
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AttributeSource for MockAttributeSource {
    async fn query(
        &self,
        path: &AttributePath,
        attributes: &[&str],
    ) -> Result<BTreeMap<String, AttributeValue>, AttributeError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let key = path.to_string();

        if self.failing.contains(&key) {
            return Err(AttributeError::Transport {
                message: format!("injected transport failure for {key}"),
            });
        }

        let node = self
            .nodes
            .get(&key)
            .ok_or(AttributeError::Unavailable { path: key })?;

        Ok(attributes
            .iter()
            .filter_map(|attribute| {
                node.get(*attribute)
                    .map(|value| (attribute.to_string(), value.clone()))
            })
            .collect())
    }

    async fn list_instances(&self, path: &AttributePath) -> Result<Vec<String>, AttributeError> {
        let key = path.to_string();

        if self.failing.contains(&key) {
            return Err(AttributeError::Transport {
                message: format!("injected transport failure for {key}"),
            });
        }

        self.instances
            .get(&key)
            .map(|instances| instances.clone())
            .ok_or(AttributeError::Unavailable { path: key })
    }
}
