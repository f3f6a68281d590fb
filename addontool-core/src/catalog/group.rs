//! Addon groups
//!
//! A group is a named, ordered selection of addons referenced by path
//! key. References are normalized when the group is built; they are only
//! turned into concrete addons by [`AddonGroup::link_addons`], which needs
//! the sealed registry produced after discovery.

use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Addon, AddonPath, GroupDeclaration, GroupListing, RepositorySet, SealedRegistry};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AddonGroup {
    name: String,
    references: Vec<AddonPath>,
    resolved: IndexMap<String, Arc<Addon>>,
}

impl AddonGroup {
    /// Build a group from its declaration
    ///
    /// Every repository the group mentions is added to `repositories` so
    /// it is synced and scanned before linking.
    pub fn new(
        name: impl Into<String>,
        declaration: &GroupDeclaration,
        repositories: &mut RepositorySet,
    ) -> Result<Self> {
        let name = name.into();
        let references = declaration
            .addons
            .iter()
            .map(|reference| reference.to_path())
            .collect::<Result<Vec<_>>>()?;

        for path in &references {
            if repositories.register(path.source())? {
                debug!("Group '{}' needs repository {}", name, path.source());
            }
        }

        debug!("Created addon group '{}' with {} reference(s)", name, references.len());

        Ok(Self {
            name,
            references,
            resolved: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared references in declaration order
    pub fn references(&self) -> &[AddonPath] {
        &self.references
    }

    /// Linked addons keyed by name, in declaration order
    pub fn resolved_addons(&self) -> &IndexMap<String, Arc<Addon>> {
        &self.resolved
    }

    /// Resolve every reference against the registry
    ///
    /// Fails on the first unresolved reference and leaves the group
    /// unlinked; a group is never partially linked.
    pub fn link_addons(&mut self, registry: &SealedRegistry) -> Result<()> {
        let mut resolved: IndexMap<String, Arc<Addon>> = IndexMap::new();

        for path in &self.references {
            let addon = registry.resolve(path)?;

            if let Some(previous) = resolved.insert(addon.name().to_string(), Arc::clone(&addon)) {
                if previous.path() != addon.path() {
                    warn!(
                        "Group '{}': {} replaces {} (same addon name)",
                        self.name,
                        addon.path(),
                        previous.path()
                    );
                }
            }
            debug!("Linked {} into group '{}'", path, self.name);
        }

        self.resolved = resolved;
        Ok(())
    }

    /// Serializable listing of the linked addons
    pub fn to_listing(&self) -> GroupListing {
        GroupListing {
            addongroup_name: self.name.clone(),
            addons: self
                .resolved
                .values()
                .map(|addon| addon.record().clone())
                .collect(),
        }
    }
}
