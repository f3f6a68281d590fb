use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("git is not found! you need to have git in your PATH")]
    GitNotFound,

    #[error("git {args} failed in {dir:?} ({status}): {stderr}")]
    GitFailed {
        args: String,
        dir: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("git {args} in {dir:?} timed out after {seconds}s")]
    GitTimedOut {
        args: String,
        dir: PathBuf,
        seconds: u64,
    },

    #[error("Could not access repo-description-file: {0:?}")]
    DescriptionNotFound(PathBuf),

    #[error("Could not access repo-file: {0:?}")]
    CatalogNotFound(PathBuf),

    #[error("Invalid addon reference '{0}', expected 'source:name'")]
    InvalidReference(String),

    #[error("Could not locate addon: {0}")]
    UnresolvedAddon(String),

    #[error("Unknown addon group: {0}")]
    UnknownGroup(String),

    #[error("Unknown default addon group: {0}")]
    UnknownDefaultGroup(String),

    #[error("No addon group given and the catalog has no default group")]
    NoDefaultGroup,

    #[error("Addon '{addon}' not found in group '{group}'")]
    AddonNotInGroup { addon: String, group: String },

    #[error("Addon '{0}' has no local_path recorded in the catalog")]
    MissingLocalPath(String),

    #[error("Repositories {source_a} and {source_b} would share the checkout directory '{short_name}'")]
    CheckoutConflict {
        source_a: String,
        source_b: String,
        short_name: String,
    },

    #[error("Repository {0} has not been synced yet")]
    RepositoryNotSynced(String),

    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CatalogError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
