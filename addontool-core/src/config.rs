//! Tool configuration
//!
//! Settings are read from `config.yaml` in the platform config directory.
//! A missing file yields the defaults; command-line flags override both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, Result};

/// Manifest file expected at the root of every addon repository
pub const MANIFEST_FILE: &str = "addon.json";

/// Resolved catalog written into the repo folder
pub const CATALOG_FILE: &str = "addon_repo.json";

/// HTML listing written next to the catalog
pub const HTML_FILE: &str = "addon_repo.html";

/// Sidecar written into every install target
pub const INSTALLED_FILE: &str = ".addons_installed.json";

/// Build-system include regenerated after every install
pub const CMAKE_INCLUDE_FILE: &str = "CMake/IncludeAddons.cmake";

/// Default bound on a single git invocation (5 minutes)
pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 5 * 60;

fn default_git_timeout() -> u64 {
    DEFAULT_GIT_TIMEOUT_SECS
}

fn default_html_output() -> bool {
    true
}

/// User-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    /// Where repositories are cloned and the catalog is written
    #[serde(default = "default_repo_folder")]
    pub repo_folder: PathBuf,

    /// Upper bound for each git clone/pull in seconds
    #[serde(default = "default_git_timeout")]
    pub git_timeout_secs: u64,

    /// Render `addon_repo.html` after init/update
    #[serde(default = "default_html_output")]
    pub html_output: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            repo_folder: default_repo_folder(),
            git_timeout_secs: DEFAULT_GIT_TIMEOUT_SECS,
            html_output: true,
        }
    }
}

fn default_repo_folder() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".addons"))
        .unwrap_or_else(|| PathBuf::from(".addons"))
}

impl ToolConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                tracing::debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

        serde_yaml_ng::from_str(&content).map_err(|e| {
            CatalogError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "addontool", "addontool")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("addontool")))
            .map(|dir| dir.join("config.yaml"))
    }

    /// Path of the resolved catalog document
    pub fn catalog_path(&self) -> PathBuf {
        self.repo_folder.join(CATALOG_FILE)
    }

    /// Path of the rendered HTML listing
    pub fn html_path(&self) -> PathBuf {
        self.repo_folder.join(HTML_FILE)
    }

    /// Ensure the repo folder exists
    pub fn ensure_repo_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.repo_folder)
            .map_err(|e| CatalogError::io(&self.repo_folder, e))
    }
}
