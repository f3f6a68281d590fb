//! Addon registry
//!
//! Discovery writes every accepted addon into an [`AddonRegistry`] keyed
//! by path key. Once all repositories are scanned the registry is sealed
//! into a [`SealedRegistry`], the only type group linking accepts. A
//! group can therefore never be linked against a half-populated registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Addon, AddonPath};
use crate::error::{CatalogError, Result};

/// Writable registry used during the discovery phase
#[derive(Debug, Default)]
pub struct AddonRegistry {
    addons: BTreeMap<AddonPath, Arc<Addon>>,
}

impl AddonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an addon under its path key
    ///
    /// Returns the addon previously stored under the same key, if any.
    pub fn register(&mut self, addon: Arc<Addon>) -> Option<Arc<Addon>> {
        self.addons.insert(addon.path().clone(), addon)
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    /// End the discovery phase
    pub fn seal(self) -> SealedRegistry {
        SealedRegistry {
            addons: self.addons,
        }
    }
}

/// Read-only registry handed to the link phase
#[derive(Debug, Default, PartialEq)]
pub struct SealedRegistry {
    addons: BTreeMap<AddonPath, Arc<Addon>>,
}

impl SealedRegistry {
    pub fn get(&self, path: &AddonPath) -> Option<&Arc<Addon>> {
        self.addons.get(path)
    }

    /// Look up a path key, failing with `UnresolvedAddon` when absent
    pub fn resolve(&self, path: &AddonPath) -> Result<Arc<Addon>> {
        self.addons
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::UnresolvedAddon(path.key()))
    }

    pub fn contains(&self, path: &AddonPath) -> bool {
        self.addons.contains_key(path)
    }

    /// Registered path keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &AddonPath> {
        self.addons.keys()
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::catalog::AddonRecord;

    fn addon(source: &str, name: &str, category: &str) -> Arc<Addon> {
        let mut record = AddonRecord::new(name, "lib");
        record.category = category.to_string();
        Arc::new(Addon::new(source, record))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = AddonRegistry::new();
        assert!(registry.register(addon("repoA", "foo", "c")).is_none());
        assert_eq!(registry.len(), 1);

        let sealed = registry.seal();
        let resolved = sealed.resolve(&AddonPath::new("repoA", "foo")).unwrap();
        assert_eq!(resolved.name(), "foo");
        assert_eq!(resolved.repository(), "repoA");
    }

    #[test]
    fn test_same_name_in_different_repositories_does_not_collide() {
        let mut registry = AddonRegistry::new();
        registry.register(addon("repo", "name", "first"));
        assert!(registry.register(addon("repo2", "name", "second")).is_none());

        let sealed = registry.seal();
        assert_eq!(sealed.len(), 2);
        assert_eq!(
            sealed.get(&AddonPath::new("repo", "name")).unwrap().record().category,
            "first"
        );
        assert_eq!(
            sealed.get(&AddonPath::new("repo2", "name")).unwrap().record().category,
            "second"
        );
    }

    #[test]
    fn test_same_name_in_same_repository_overwrites() {
        let mut registry = AddonRegistry::new();
        registry.register(addon("repo", "name", "first"));
        let replaced = registry.register(addon("repo", "name", "second"));

        assert_eq!(replaced.unwrap().record().category, "first");
        let sealed = registry.seal();
        assert_eq!(sealed.len(), 1);
        assert_eq!(
            sealed.get(&AddonPath::new("repo", "name")).unwrap().record().category,
            "second"
        );
    }

    #[test]
    fn test_resolve_missing_is_unresolved_addon() {
        let sealed = AddonRegistry::new().seal();
        let err = sealed.resolve(&AddonPath::new("repoA", "missing")).unwrap_err();
        assert!(matches!(err, CatalogError::UnresolvedAddon(ref key) if key == "repoA:missing"));
    }
}
