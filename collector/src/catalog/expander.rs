use std::sync::Arc;

use tracing::{debug, warn};

use crate::attribute::AttributeSource;
use crate::catalog::registry::{Catalog, Registry};
use crate::error::{AttributeError, CollectorError, Result};

/// Turns templated catalog entries into concrete ones by discovering the
/// current instance set behind each template's binding path.
///
/// Expansion is a set-reconciliation: instances already materialized in a
/// prior run are left untouched, so re-running against an unchanged instance
/// set is a no-op. Instances that vanished keep their concrete metrics with
/// frozen last-known values; removal would churn metric identity for
/// consumers.
pub struct CatalogExpander {
    source: Arc<dyn AttributeSource>,
}

impl CatalogExpander {
    pub fn new(source: Arc<dyn AttributeSource>) -> Self {
        Self { source }
    }

    /// Expand every scope of the registry. Returns the number of concrete
    /// definitions added.
    pub async fn expand(&self, registry: &Registry) -> Result<usize> {
        let mut added = 0;
        for catalog in registry.scopes() {
            added += self.expand_scope(catalog).await?;
        }
        Ok(added)
    }

    /// Expand one scope's templates. Returns the number of concrete
    /// definitions added.
    ///
    /// An `Unavailable` discovery prefix is treated as an empty instance set:
    /// a tree that simply lacks the optional subsystem must not prevent
    /// startup. Transport failures abort the build, since going on would
    /// leave the catalog silently incomplete.
    pub async fn expand_scope(&self, catalog: &Catalog) -> Result<usize> {
        let mut added = 0;

        for template in catalog.templates() {
            let Some(binding) = template.source.as_ref() else {
                return Err(CollectorError::InvalidTemplate {
                    name: template.name,
                    reason: "templated definition has no attribute binding".into(),
                });
            };
            let Some(prefix) = binding.path.placeholder_prefix() else {
                return Err(CollectorError::InvalidTemplate {
                    name: template.name,
                    reason: "binding path has no '%s' placeholder segment".into(),
                });
            };

            let instances = match self.source.list_instances(&prefix).await {
                Ok(instances) => instances,
                Err(AttributeError::Unavailable { path }) => {
                    warn!(
                        template = %template.name,
                        path = %path,
                        "instance discovery path not present; expanding to nothing"
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if instances.is_empty() {
                debug!(template = %template.name, "instance set is empty");
                continue;
            }

            for instance in &instances {
                let concrete = template.expand_for_instance(instance);
                if catalog.contains(&concrete.name) {
                    continue;
                }
                debug!(
                    scope = %catalog.scope(),
                    metric = %concrete.name,
                    instance = %instance,
                    "materialized templated metric"
                );
                catalog.define(concrete)?;
                added += 1;
            }
        }

        Ok(added)
    }
}
