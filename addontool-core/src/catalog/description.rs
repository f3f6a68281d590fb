//! Repository description: the root of the addon graph
//!
//! A run always proceeds sync → discover → link. Discovery fills an
//! [`AddonRegistry`] from every repository before the registry is sealed
//! and handed to the groups for linking.

use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

use super::{
    render, AddonGroup, AddonRegistry, CatalogDocument, DescriptionDocument, GitClient,
    RepositorySet, SealedRegistry,
};
use crate::config::ToolConfig;
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone)]
pub struct RepoDescription {
    name: String,
    valid_addon_types: Vec<String>,
    groups: IndexMap<String, AddonGroup>,
    default_group: Option<String>,
    repositories: RepositorySet,
    document: DescriptionDocument,
}

impl RepoDescription {
    /// Build the group graph from a description document
    ///
    /// Without `default_addon_group` the first declared group becomes the
    /// default. A named default that does not exist is a configuration
    /// error.
    pub fn from_document(document: DescriptionDocument) -> Result<Self> {
        let mut repositories = RepositorySet::new();
        let mut groups = IndexMap::new();

        for (group_name, declaration) in &document.addon_groups {
            info!("create addongroup: {}", group_name);
            let group = AddonGroup::new(group_name.clone(), declaration, &mut repositories)?;
            groups.insert(group_name.clone(), group);
        }

        let default_group = document
            .default_addon_group
            .clone()
            .or_else(|| groups.keys().next().cloned());

        let description = Self {
            name: document.repo_name.clone(),
            valid_addon_types: document.valid_addon_types.clone(),
            groups,
            default_group,
            repositories,
            document,
        };
        description.validate()?;

        Ok(description)
    }

    /// Load and build from a description file
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_document(DescriptionDocument::from_file(path)?)
    }

    /// Check that the default group names an existing group
    pub fn validate(&self) -> Result<()> {
        match &self.default_group {
            Some(name) if !self.groups.contains_key(name) => {
                Err(CatalogError::UnknownDefaultGroup(name.clone()))
            }
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn valid_addon_types(&self) -> &[String] {
        &self.valid_addon_types
    }

    pub fn groups(&self) -> &IndexMap<String, AddonGroup> {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&AddonGroup> {
        self.groups.get(name)
    }

    pub fn default_group(&self) -> Option<&AddonGroup> {
        self.default_group
            .as_deref()
            .and_then(|name| self.groups.get(name))
    }

    pub fn repositories(&self) -> &RepositorySet {
        &self.repositories
    }

    /// Log what this description will sync and link
    pub fn log_summary(&self) {
        info!("addon repository {}", self.name);
        info!("valid-addon-type: {}", self.valid_addon_types.join(","));
        for group in self.groups.values() {
            let names: Vec<String> = group.references().iter().map(|p| p.key()).collect();
            info!("addon-group {}: {}", group.name(), names.join(","));
        }
        info!(
            "git-repos: {}",
            self.repositories.sources().collect::<Vec<_>>().join(", ")
        );
    }

    /// Clone or pull every referenced repository exactly once
    pub async fn sync_all(&mut self, git: &dyn GitClient, destination_root: &Path) -> Result<()> {
        for repository in self.repositories.iter_mut() {
            repository.sync(git, destination_root).await?;
        }
        Ok(())
    }

    /// Scan every repository manifest into a fresh registry and seal it
    pub fn discover(&mut self) -> Result<SealedRegistry> {
        let mut registry = AddonRegistry::new();
        for repository in self.repositories.iter_mut() {
            let count = repository.discover_addons(&self.valid_addon_types, &mut registry)?;
            info!("{}: {} addon(s)", repository.source(), count);
        }
        Ok(registry.seal())
    }

    /// Link every group against a sealed registry
    ///
    /// Stops at the first unresolved reference.
    pub fn link(&mut self, registry: &SealedRegistry) -> Result<()> {
        for group in self.groups.values_mut() {
            group.link_addons(registry)?;
        }
        Ok(())
    }

    /// Discover all repositories, then link all groups
    pub fn discover_all(&mut self) -> Result<SealedRegistry> {
        let registry = self.discover()?;
        self.link(&registry)?;
        Ok(registry)
    }

    /// Persistable catalog of the linked graph
    pub fn to_catalog(&self) -> CatalogDocument {
        CatalogDocument {
            repo_name: self.name.clone(),
            repo_description: self.document.clone(),
            default_group: self.default_group.clone(),
            addon_groups: self
                .groups
                .iter()
                .map(|(name, group)| (name.clone(), group.to_listing()))
                .collect(),
        }
    }

    /// Sync, discover and link, then write the catalog (and HTML listing)
    ///
    /// Nothing is written unless every group links.
    pub async fn publish(
        &mut self,
        git: &dyn GitClient,
        config: &ToolConfig,
    ) -> Result<CatalogDocument> {
        config.ensure_repo_folder()?;

        self.log_summary();
        self.sync_all(git, &config.repo_folder).await?;
        self.discover_all()?;

        let catalog = self.to_catalog();
        let catalog_path = config.catalog_path();
        catalog.save_to_path(&catalog_path)?;
        info!("Wrote catalog to {}", catalog_path.display());

        if config.html_output {
            render::write_html(&catalog, &config.html_path())?;
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(json: &str) -> Result<RepoDescription> {
        RepoDescription::from_document(DescriptionDocument::from_json(json).unwrap())
    }

    #[test]
    fn test_explicit_default_group() {
        let desc = description(
            r#"{"repo_name": "r", "valid_addon_types": ["lib"],
                "addon_groups": {"core": {"addons": []}, "extra": {"addons": []}},
                "default_addon_group": "extra"}"#,
        )
        .unwrap();
        assert_eq!(desc.default_group().unwrap().name(), "extra");
    }

    #[test]
    fn test_default_group_falls_back_to_first_declared() {
        let desc = description(
            r#"{"repo_name": "r", "valid_addon_types": ["lib"],
                "addon_groups": {"zeta": {"addons": []}, "alpha": {"addons": []}}}"#,
        )
        .unwrap();
        assert_eq!(desc.default_group().unwrap().name(), "zeta");
    }

    #[test]
    fn test_no_groups_means_no_default() {
        let desc = description(r#"{"repo_name": "r", "valid_addon_types": []}"#).unwrap();
        assert!(desc.default_group().is_none());
        assert!(desc.to_catalog().default_group.is_none());
    }

    #[test]
    fn test_unknown_default_group_is_fatal() {
        let err = description(
            r#"{"repo_name": "r", "valid_addon_types": ["lib"],
                "addon_groups": {"core": {"addons": []}},
                "default_addon_group": "missing"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDefaultGroup(ref g) if g == "missing"));
    }

    #[test]
    fn test_repositories_shared_between_groups_are_deduplicated() {
        let desc = description(
            r#"{"repo_name": "r", "valid_addon_types": ["lib"],
                "addon_groups": {
                    "core": {"addons": ["repoA:foo", "repoB:bar"]},
                    "extra": {"addons": [{"git": "repoA", "addon": "baz"}]}
                }}"#,
        )
        .unwrap();
        assert_eq!(
            desc.repositories().sources().collect::<Vec<_>>(),
            vec!["repoA", "repoB"]
        );
    }

    #[test]
    fn test_sources_sharing_a_checkout_directory_are_rejected() {
        let err = description(
            r#"{"repo_name": "r", "valid_addon_types": ["lib"],
                "addon_groups": {
                    "core": {"addons": ["https://a.example/addons.git:foo"]},
                    "extra": {"addons": ["https://b.example/addons.git:bar"]}
                }}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CheckoutConflict { ref short_name, .. } if short_name == "addons"
        ));
    }
}
