//! Git repositories that provide addons

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Addon, AddonManifest, AddonRegistry, GitClient};
use crate::error::{CatalogError, Result};

/// A source location and the addons found in its manifest
#[derive(Debug, Clone)]
pub struct GitRepository {
    source: String,
    local_path: Option<PathBuf>,
    addons: IndexMap<String, Arc<Addon>>,
}

impl GitRepository {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            local_path: None,
            addons: IndexMap::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Directory name a clone of this repository lands in
    pub fn short_name(&self) -> &str {
        short_name(&self.source)
    }

    /// Checkout location, known after a successful sync
    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    /// Addons owned by this repository, keyed by name
    pub fn addons(&self) -> &IndexMap<String, Arc<Addon>> {
        &self.addons
    }

    /// Clone the repository under `destination_root`, or pull if already cloned
    pub async fn sync(&mut self, git: &dyn GitClient, destination_root: &Path) -> Result<&Path> {
        let checkout = destination_root.join(self.short_name());

        if checkout.exists() {
            let out = git.pull(&checkout).await?;
            info!("git pull {}", self.source);
            debug!("{}", out);
        } else {
            let out = git.clone_repo(&self.source, destination_root).await?;
            info!("git clone {}", self.source);
            debug!("{}", out);
        }

        let local_path =
            std::path::absolute(&checkout).map_err(|e| CatalogError::io(&checkout, e))?;
        let local_path = self.local_path.insert(local_path);
        Ok(local_path.as_path())
    }

    /// Scan the checkout's manifest and register accepted addons
    ///
    /// A repository without `addon.json` is legal and registers nothing.
    /// Returns the number of addons registered.
    pub fn discover_addons(
        &mut self,
        valid_types: &[String],
        registry: &mut AddonRegistry,
    ) -> Result<usize> {
        let local_path = self
            .local_path
            .clone()
            .ok_or_else(|| CatalogError::RepositoryNotSynced(self.source.clone()))?;

        let Some(manifest) = AddonManifest::from_dir(&local_path)? else {
            warn!("{}: no addon-file found", local_path.display());
            return Ok(0);
        };

        let mut registered = 0;
        for record in &manifest.addons {
            if !valid_types.iter().any(|t| *t == record.addon_type) {
                debug!(
                    "Skipping {} ({}): type '{}' is not accepted",
                    record.name, self.source, record.addon_type
                );
                continue;
            }

            let addon = Arc::new(
                Addon::new(&self.source, record.clone()).with_local_path(local_path.clone()),
            );

            if self
                .addons
                .insert(addon.name().to_string(), Arc::clone(&addon))
                .is_some()
            {
                warn!(
                    "Duplicate addon '{}' in {}: the later manifest entry wins",
                    addon.name(),
                    self.source
                );
            }
            registry.register(Arc::clone(&addon));
            registered += 1;

            debug!("Registered: {}", addon.path());
        }

        Ok(registered)
    }
}

/// Last path segment of a source location without a `.git` suffix
pub fn short_name(source: &str) -> &str {
    let trimmed = source.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last)
}

/// Every distinct repository needed by a description, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct RepositorySet {
    repositories: IndexMap<String, GitRepository>,
}

impl RepositorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source location; returns `false` if it was already known
    ///
    /// Checkouts live at `<repo_folder>/<short name>`, so two different
    /// sources with the same short name are rejected.
    pub fn register(&mut self, source: &str) -> Result<bool> {
        if self.repositories.contains_key(source) {
            return Ok(false);
        }

        let name = short_name(source);
        if let Some(existing) = self.repositories.values().find(|r| r.short_name() == name) {
            return Err(CatalogError::CheckoutConflict {
                source_a: existing.source().to_string(),
                source_b: source.to_string(),
                short_name: name.to_string(),
            });
        }

        self.repositories
            .insert(source.to_string(), GitRepository::new(source));
        Ok(true)
    }

    pub fn get(&self, source: &str) -> Option<&GitRepository> {
        self.repositories.get(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GitRepository> {
        self.repositories.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GitRepository> {
        self.repositories.values_mut()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
