//! Persisted JSON documents
//!
//! - the user-authored description (`repo_name`, `valid_addon_types`,
//!   `addon_groups`, `default_addon_group`)
//! - the resolved catalog written to `addon_repo.json`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use super::{AddonRecord, AddonReference};
use crate::error::{CatalogError, Result};

/// Repository description as written by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionDocument {
    pub repo_name: String,

    #[serde(default)]
    pub valid_addon_types: Vec<String>,

    #[serde(default)]
    pub addon_groups: IndexMap<String, GroupDeclaration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_addon_group: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A group entry of the description document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDeclaration {
    #[serde(default)]
    pub addons: Vec<AddonReference>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DescriptionDocument {
    /// Load a description file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CatalogError::DescriptionNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_json(&content).map_err(|e| CatalogError::json(path, e))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

/// Serialized form of one linked group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupListing {
    pub addongroup_name: String,

    #[serde(default)]
    pub addons: Vec<AddonRecord>,
}

impl GroupListing {
    /// Find an addon record by name
    pub fn addon(&self, name: &str) -> Option<&AddonRecord> {
        self.addons.iter().find(|addon| addon.name == name)
    }
}

/// The resolved catalog (`addon_repo.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub repo_name: String,

    /// The description this catalog was built from
    pub repo_description: DescriptionDocument,

    pub default_group: Option<String>,

    pub addon_groups: IndexMap<String, GroupListing>,
}

impl CatalogDocument {
    /// Load a catalog file; a missing file is an error
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CatalogError::CatalogNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog: Self = serde_json::from_str(&content).map_err(|e| CatalogError::json(path, e))?;
        tracing::debug!("Loaded catalog '{}' from {}", catalog.repo_name, path.display());
        Ok(catalog)
    }

    /// Write the catalog as indented JSON
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| CatalogError::json(path, e))?;
        std::fs::write(path, content).map_err(|e| CatalogError::io(path, e))
    }

    pub fn group(&self, name: &str) -> Option<&GroupListing> {
        self.addon_groups.get(name)
    }

    /// Pick a group by name, or the default group when `name` is `None`
    pub fn select_group(&self, name: Option<&str>) -> Result<&GroupListing> {
        match name {
            Some(name) => self
                .group(name)
                .ok_or_else(|| CatalogError::UnknownGroup(name.to_string())),
            None => {
                let default = self
                    .default_group
                    .as_deref()
                    .ok_or(CatalogError::NoDefaultGroup)?;
                self.group(default)
                    .ok_or_else(|| CatalogError::UnknownDefaultGroup(default.to_string()))
            }
        }
    }

    pub fn is_default(&self, group_name: &str) -> bool {
        self.default_group.as_deref() == Some(group_name)
    }
}
