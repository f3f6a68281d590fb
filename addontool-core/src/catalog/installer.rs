//! Addon installation into a project directory
//!
//! Resolution against the catalog is all-or-nothing: an unknown group or
//! addon aborts before anything is copied. Copying is best-effort per
//! file; every file yields a [`CopyResult`] in the [`InstallReport`].

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{render, AddonRecord, CatalogDocument, InstalledAddons};
use crate::config::{CMAKE_INCLUDE_FILE, INSTALLED_FILE};
use crate::error::{CatalogError, Result};

/// Separator between group and addon in an install selector
pub const GROUP_SEPARATOR: char = '/';

/// `[group/]addon` as given on the command line
///
/// An empty group part (`/foo`) selects the default group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddonSelector<'a> {
    pub group: Option<&'a str>,
    pub addon: &'a str,
}

impl<'a> AddonSelector<'a> {
    pub fn parse(selector: &'a str) -> Self {
        match selector.split_once(GROUP_SEPARATOR) {
            Some((group, addon)) => Self {
                group: Some(group).filter(|g| !g.is_empty()),
                addon,
            },
            None => Self {
                group: None,
                addon: selector,
            },
        }
    }
}

/// What happened to one copied path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    NotFound,
    PermissionDenied,
    Failed(String),
}

impl From<&std::io::Error> for CopyOutcome {
    fn from(err: &std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => CopyOutcome::NotFound,
            ErrorKind::PermissionDenied => CopyOutcome::PermissionDenied,
            _ => CopyOutcome::Failed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: CopyOutcome,
}

/// Result of installing one addon
#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    pub addon: String,
    pub group: String,
    pub copies: Vec<CopyResult>,
}

impl InstallReport {
    pub fn copied_count(&self) -> usize {
        self.copies
            .iter()
            .filter(|c| c.outcome == CopyOutcome::Copied)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CopyResult> {
        self.copies
            .iter()
            .filter(|c| c.outcome != CopyOutcome::Copied)
    }

    /// True when every declared file and folder was copied
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Copies addon files from their synced repositories into a target
pub struct Installer {
    destination: PathBuf,
}

impl Installer {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Path of the installed-addons sidecar
    pub fn installed_path(&self) -> PathBuf {
        self.destination.join(INSTALLED_FILE)
    }

    /// Path of the generated CMake include
    pub fn cmake_include_path(&self) -> PathBuf {
        self.destination.join(CMAKE_INCLUDE_FILE)
    }

    /// Install `[group/]addon` from the catalog
    pub fn install(&self, catalog: &CatalogDocument, selector: &str) -> Result<InstallReport> {
        let selector = AddonSelector::parse(selector);
        let group = catalog.select_group(selector.group)?;

        let record = group
            .addon(selector.addon)
            .ok_or_else(|| CatalogError::AddonNotInGroup {
                addon: selector.addon.to_string(),
                group: group.addongroup_name.clone(),
            })?;

        let base = record
            .local_path
            .as_deref()
            .ok_or_else(|| CatalogError::MissingLocalPath(record.name.clone()))?;

        info!(
            "Installing {} from group '{}' into {}",
            record.name,
            group.addongroup_name,
            self.destination.display()
        );

        let mut copies = Vec::new();
        for folder in &record.files.folders {
            self.copy_folder(base, folder, &mut copies);
        }
        for file in &record.files.files {
            copies.push(self.copy_file(base, file));
        }

        for failed in copies.iter().filter(|c| c.outcome != CopyOutcome::Copied) {
            warn!("Could not copy {}: {:?}", failed.source.display(), failed.outcome);
        }

        self.record_installed(record)?;

        info!("installed {}", record.name);
        Ok(InstallReport {
            addon: record.name.clone(),
            group: group.addongroup_name.clone(),
            copies,
        })
    }

    /// Add the addon to the sidecar and regenerate the CMake include
    fn record_installed(&self, record: &AddonRecord) -> Result<()> {
        let installed_path = self.installed_path();
        let mut installed = InstalledAddons::load_from_path(&installed_path)?;
        installed.add_installed(record);
        installed.save_to_path(&installed_path)?;

        render::write_cmake_include(&installed, &self.cmake_include_path())
    }

    /// Recursively copy `base/folder` into `destination/folder`
    fn copy_folder(&self, base: &Path, folder: &str, copies: &mut Vec<CopyResult>) {
        if !is_contained(folder) {
            copies.push(self.escaping(folder));
            return;
        }

        let source_root = base.join(folder);
        let destination_root = self.destination.join(folder);

        if !source_root.is_dir() {
            copies.push(CopyResult {
                source: source_root,
                destination: destination_root,
                outcome: CopyOutcome::NotFound,
            });
            return;
        }

        if let Err(e) = std::fs::create_dir_all(&destination_root) {
            copies.push(CopyResult {
                outcome: CopyOutcome::from(&e),
                source: source_root,
                destination: destination_root,
            });
            return;
        }

        for entry in WalkDir::new(&source_root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let source = e.path().unwrap_or(&source_root).to_path_buf();
                    let outcome = e
                        .io_error()
                        .map(CopyOutcome::from)
                        .unwrap_or_else(|| CopyOutcome::Failed(e.to_string()));
                    copies.push(CopyResult {
                        destination: destination_root.clone(),
                        source,
                        outcome,
                    });
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(&source_root) else {
                continue;
            };
            let destination = destination_root.join(relative);

            if entry.file_type().is_dir() {
                if let Err(e) = std::fs::create_dir_all(&destination) {
                    copies.push(CopyResult {
                        source: entry.path().to_path_buf(),
                        destination,
                        outcome: CopyOutcome::from(&e),
                    });
                }
                continue;
            }

            copies.push(copy_one(entry.path(), &destination));
        }
    }

    fn copy_file(&self, base: &Path, file: &str) -> CopyResult {
        if !is_contained(file) {
            return self.escaping(file);
        }
        copy_one(&base.join(file), &self.destination.join(file))
    }

    fn escaping(&self, entry: &str) -> CopyResult {
        CopyResult {
            source: PathBuf::from(entry),
            destination: self.destination.clone(),
            outcome: CopyOutcome::Failed(format!(
                "path escapes the addon or install directory: {entry}"
            )),
        }
    }
}

/// True for a non-empty relative path that stays below the directory it
/// is joined onto
fn is_contained(entry: &str) -> bool {
    let path = Path::new(entry);
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn copy_one(source: &Path, destination: &Path) -> CopyResult {
    let result = destination
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| std::fs::copy(source, destination));

    let outcome = match result {
        Ok(_) => {
            debug!("copy file {} => {}", source.display(), destination.display());
            CopyOutcome::Copied
        }
        Err(e) => CopyOutcome::from(&e),
    };

    CopyResult {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        outcome,
    }
}
