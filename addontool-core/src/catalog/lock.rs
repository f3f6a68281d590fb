//! Installed-addons sidecar (`.addons_installed.json`)
//!
//! Tracks which addons were copied into an install target, keyed by
//! addon name, with the full catalog record of each.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::AddonRecord;
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstalledAddons {
    pub installed: IndexMap<String, AddonRecord>,
}

impl InstalledAddons {
    /// Load the sidecar, or an empty set if it does not exist yet
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| CatalogError::json(path, e))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }

        let content =
            serde_json::to_string_pretty(&self.installed).map_err(|e| CatalogError::json(path, e))?;
        std::fs::write(path, content).map_err(|e| CatalogError::io(path, e))
    }

    /// Record an addon as installed, replacing any earlier record
    pub fn add_installed(&mut self, record: &AddonRecord) {
        self.installed.insert(record.name.clone(), record.clone());
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    pub fn get_installed(&self, name: &str) -> Option<&AddonRecord> {
        self.installed.get(name)
    }

    pub fn list_installed(&self) -> impl Iterator<Item = &AddonRecord> {
        self.installed.values()
    }
}
