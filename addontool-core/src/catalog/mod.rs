//! Addon catalog - repository sync, discovery, linking and installation
//!
//! # Overview
//!
//! A description document names addon groups; each group references
//! addons by path key (`source:name`). Building the catalog:
//! - syncs every referenced git repository (clone or pull)
//! - scans each checkout's `addon.json` into an [`AddonRegistry`]
//! - seals the registry and links every group against it
//! - writes the resolved catalog to `addon_repo.json`
//!
//! # Architecture
//!
//! ```text
//! description.json
//!     │
//!     ▼
//! RepoDescription ── groups ──► AddonGroup (path keys)
//!     │
//!     ├── sync ──────► GitRepository ── git clone / pull
//!     ├── discover ──► AddonRegistry ── seal ──► SealedRegistry
//!     └── link ──────► AddonGroup (resolved addons)
//!            │
//!            ▼
//!     addon_repo.json ── Installer ──► <project>/.addons_installed.json
//! ```

mod addon;
mod description;
mod document;
mod git;
mod group;
mod installer;
mod lock;
mod manifest;
mod reference;
mod registry;
pub mod render;
mod repository;

pub use addon::Addon;
pub use description::RepoDescription;
pub use document::{CatalogDocument, DescriptionDocument, GroupDeclaration, GroupListing};
pub use git::{GitClient, SystemGit};
pub use group::AddonGroup;
pub use installer::{AddonSelector, CopyOutcome, CopyResult, InstallReport, Installer};
pub use lock::InstalledAddons;
pub use manifest::{AddonFiles, AddonManifest, AddonRecord};
pub use reference::{AddonPath, AddonReference};
pub use registry::{AddonRegistry, SealedRegistry};
pub use repository::{short_name, GitRepository, RepositorySet};

#[cfg(test)]
mod testing;
