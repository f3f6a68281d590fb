//! In-memory git stand-in for engine tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{short_name, GitClient};
use crate::config::MANIFEST_FILE;
use crate::error::{CatalogError, Result};

#[derive(Default)]
struct FakeRepo {
    manifest: Option<String>,
    files: Vec<(String, String)>,
}

/// "Clones" by materializing a directory with the configured manifest
#[derive(Default)]
pub(crate) struct FakeGit {
    repos: HashMap<String, FakeRepo>,
    fail: bool,
    clones: Mutex<Vec<String>>,
    pulls: Mutex<Vec<PathBuf>>,
}

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_repo(mut self, source: &str, manifest: Option<&str>) -> Self {
        self.repos.entry(source.to_string()).or_default().manifest = manifest.map(str::to_string);
        self
    }

    pub(crate) fn with_file(mut self, source: &str, relative: &str, content: &str) -> Self {
        self.repos
            .entry(source.to_string())
            .or_default()
            .files
            .push((relative.to_string(), content.to_string()));
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn clone_count(&self) -> usize {
        self.clones.lock().unwrap().len()
    }

    pub(crate) fn pull_count(&self) -> usize {
        self.pulls.lock().unwrap().len()
    }

    fn failure(&self, args: &str, dir: &Path) -> CatalogError {
        CatalogError::GitFailed {
            args: args.to_string(),
            dir: dir.to_path_buf(),
            status: "exit status: 128".to_string(),
            stderr: "fatal: repository not found".to_string(),
        }
    }
}

#[async_trait]
impl GitClient for FakeGit {
    async fn clone_repo(&self, url: &str, destination_root: &Path) -> Result<String> {
        if self.fail {
            return Err(self.failure(&format!("clone {url}"), destination_root));
        }

        let checkout = destination_root.join(short_name(url));
        std::fs::create_dir_all(&checkout).map_err(|e| CatalogError::io(&checkout, e))?;

        if let Some(repo) = self.repos.get(url) {
            if let Some(manifest) = &repo.manifest {
                std::fs::write(checkout.join(MANIFEST_FILE), manifest)
                    .map_err(|e| CatalogError::io(&checkout, e))?;
            }
            for (relative, content) in &repo.files {
                let path = checkout.join(relative);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
                }
                std::fs::write(&path, content).map_err(|e| CatalogError::io(&path, e))?;
            }
        }

        self.clones.lock().unwrap().push(url.to_string());
        Ok(format!("Cloning into '{}'...", short_name(url)))
    }

    async fn pull(&self, repo_dir: &Path) -> Result<String> {
        if self.fail {
            return Err(self.failure("pull", repo_dir));
        }
        self.pulls.lock().unwrap().push(repo_dir.to_path_buf());
        Ok("Already up to date.".to_string())
    }
}
