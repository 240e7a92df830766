use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::attribute::{AttributePath, AttributeValue};
use crate::error::AttributeError;

/// The managed process's introspection channel.
///
/// Implementations wrap whatever management protocol the process speaks; the
/// engine only relies on batched attribute reads and child enumeration.
#[async_trait]
pub trait AttributeSource: Send + Sync {
    /// Read the named attributes under `path` in a single round trip.
    ///
    /// Returns [`AttributeError::Unavailable`] when the path does not exist
    /// (a permanent mapping error) and [`AttributeError::Transport`] when the
    /// channel itself fails (transient; retried on the next poll). Requested
    /// attributes missing from the result map are treated as unavailable by
    /// the caller.
    async fn query(
        &self,
        path: &AttributePath,
        attributes: &[&str],
    ) -> Result<BTreeMap<String, AttributeValue>, AttributeError>;

    /// Enumerate the dynamic children of `path` (e.g. the active garbage
    /// collectors). The returned set may change between calls; callers never
    /// assume a fixed size.
    async fn list_instances(&self, path: &AttributePath) -> Result<Vec<String>, AttributeError>;
}
