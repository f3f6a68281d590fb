//! Git invocation
//!
//! Repository sync only needs `git clone <url>` and `git pull`. They sit
//! behind [`GitClient`] so the engine can be driven without a git binary.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Clone and update repositories
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Clone `url` into a new directory under `destination_root`
    async fn clone_repo(&self, url: &str, destination_root: &Path) -> Result<String>;

    /// Update an existing checkout in place
    async fn pull(&self, repo_dir: &Path) -> Result<String>;
}

/// Runs the git executable found on `PATH`
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    timeout: Duration,
}

impl SystemGit {
    /// Locate git on `PATH`
    pub fn locate(timeout: Duration) -> Result<Self> {
        let program = which::which("git").map_err(|_| CatalogError::GitNotFound)?;
        debug!("Using git at {}", program.display());
        Ok(Self::with_program(program, timeout))
    }

    pub fn with_program(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn run(&self, args: &[&str], dir: &Path) -> Result<String> {
        let joined = args.join(" ");
        debug!("git {} (in {})", joined, dir.display());

        let child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CatalogError::io(dir, e))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CatalogError::GitTimedOut {
                args: joined.clone(),
                dir: dir.to_path_buf(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| CatalogError::io(dir, e))?;

        if !output.status.success() {
            return Err(CatalogError::GitFailed {
                args: joined,
                dir: dir.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl GitClient for SystemGit {
    async fn clone_repo(&self, url: &str, destination_root: &Path) -> Result<String> {
        self.run(&["clone", url], destination_root).await
    }

    async fn pull(&self, repo_dir: &Path) -> Result<String> {
        self.run(&["pull"], repo_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let git = SystemGit::with_program(
            temp_dir.path().join("no-such-git"),
            Duration::from_secs(5),
        );

        let err = git.pull(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_git_failed() {
        let temp_dir = TempDir::new().unwrap();
        let git = SystemGit::with_program("false", Duration::from_secs(5));

        let err = git.pull(temp_dir.path()).await.unwrap_err();
        match err {
            CatalogError::GitFailed { args, dir, .. } => {
                assert_eq!(args, "pull");
                assert_eq!(dir, temp_dir.path());
            }
            other => panic!("expected GitFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command_returns_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let git = SystemGit::with_program("echo", Duration::from_secs(5));

        let out = git.clone_repo("repoA", temp_dir.path()).await.unwrap();
        assert_eq!(out, "clone repoA");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_command_times_out() {
        let temp_dir = TempDir::new().unwrap();
        // `sh pull` runs this file as a script
        std::fs::write(temp_dir.path().join("pull"), "sleep 10\n").unwrap();
        let git = SystemGit::with_program("sh", Duration::from_millis(100));

        let started = std::time::Instant::now();
        let err = git.pull(temp_dir.path()).await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            CatalogError::GitTimedOut { args, dir, .. } => {
                assert_eq!(args, "pull");
                assert_eq!(dir, temp_dir.path());
            }
            other => panic!("expected GitTimedOut, got {other:?}"),
        }
    }
}
