//! Addon manifest parsing (addon.json)
//!
//! Each repository root may carry an `addon.json` listing the addons it
//! provides. Fields the tool does not interpret are kept verbatim so the
//! catalog carries the full record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::config::MANIFEST_FILE;
use crate::error::{CatalogError, Result};

/// Files an addon contributes to an install target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddonFiles {
    /// Directories copied recursively, relative to the repository root
    #[serde(default)]
    pub folders: Vec<String>,

    /// Individual files, relative to the repository root
    #[serde(default)]
    pub files: Vec<String>,
}

/// One entry of an addon manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonRecord {
    /// Addon name, unique within its repository
    pub name: String,

    /// Type string matched against the description's valid types
    pub addon_type: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub files: AddonFiles,

    /// Absolute path of the synced repository, injected at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,

    /// Any other manifest fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddonRecord {
    pub fn new(name: impl Into<String>, addon_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addon_type: addon_type.into(),
            category: String::new(),
            description: String::new(),
            files: AddonFiles::default(),
            local_path: None,
            extra: Map::new(),
        }
    }
}

/// The parsed contents of an `addon.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonManifest {
    pub addons: Vec<AddonRecord>,
}

impl AddonManifest {
    /// Load the manifest at the root of a repository checkout
    ///
    /// Returns `Ok(None)` when the repository has no manifest.
    pub fn from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_file(&path).map(Some)
    }

    /// Load a manifest from a file path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_json(&content).map_err(|e| CatalogError::json(path, e))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Entries whose type is in `valid_types`, in manifest order
    pub fn accepted<'a>(
        &'a self,
        valid_types: &'a [String],
    ) -> impl Iterator<Item = &'a AddonRecord> + 'a {
        self.addons
            .iter()
            .filter(move |record| valid_types.iter().any(|t| *t == record.addon_type))
    }
}
