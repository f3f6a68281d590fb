//! A single installable addon

use std::path::{Path, PathBuf};

use super::{AddonPath, AddonRecord};

/// An addon discovered in a repository manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Addon {
    path: AddonPath,
    record: AddonRecord,
}

impl Addon {
    /// Create an addon owned by the repository at `source`
    pub fn new(source: &str, record: AddonRecord) -> Self {
        Self {
            path: AddonPath::new(source, record.name.clone()),
            record,
        }
    }

    /// Set the absolute checkout path carried into the catalog
    pub fn with_local_path(mut self, local_path: PathBuf) -> Self {
        self.record.local_path = Some(local_path);
        self
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Globally unique `source:name` key
    pub fn path(&self) -> &AddonPath {
        &self.path
    }

    /// Owning repository source location
    pub fn repository(&self) -> &str {
        self.path.source()
    }

    pub fn record(&self) -> &AddonRecord {
        &self.record
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.record.local_path.as_deref()
    }
}
