//! Addon path keys
//!
//! Every addon is identified across repositories by `source:name`.
//! Description documents have used two spellings for a reference over
//! time; both are accepted here and normalized into [`AddonPath`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

/// Separator between repository source and addon name
pub const PATH_KEY_SEPARATOR: char = ':';

/// Canonical `source:name` identity of an addon
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddonPath {
    source: String,
    name: String,
}

impl AddonPath {
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }

    /// Parse a flattened `source:name` key
    ///
    /// Splits on the last `:` so sources such as `https://host/repo.git`
    /// or `git@host:org/repo.git` stay intact.
    pub fn parse(key: &str) -> Result<Self> {
        let (source, name) = key
            .rsplit_once(PATH_KEY_SEPARATOR)
            .ok_or_else(|| CatalogError::InvalidReference(key.to_string()))?;

        Self::checked(source, name, key)
    }

    fn checked(source: &str, name: &str, original: &str) -> Result<Self> {
        let source = source.trim();
        let name = name.trim();
        if source.is_empty() || name.is_empty() || name.contains('/') {
            return Err(CatalogError::InvalidReference(original.to_string()));
        }
        Ok(Self::new(source, name))
    }

    /// Repository source location (git URL or path)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Addon name within its repository
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AddonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.source, PATH_KEY_SEPARATOR, self.name)
    }
}

impl FromStr for AddonPath {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An addon reference as written in a description document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddonReference {
    /// `"source:name"`
    Key(String),
    /// `{"git": source, "addon": name}`
    Pair { git: String, addon: String },
}

impl AddonReference {
    /// Normalize into the canonical path key
    pub fn to_path(&self) -> Result<AddonPath> {
        match self {
            AddonReference::Key(key) => AddonPath::parse(key),
            AddonReference::Pair { git, addon } => {
                AddonPath::checked(git, addon, &format!("{git}{PATH_KEY_SEPARATOR}{addon}"))
            }
        }
    }
}

impl From<&AddonPath> for AddonReference {
    fn from(path: &AddonPath) -> Self {
        AddonReference::Key(path.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let path = AddonPath::parse("repoA:foo").unwrap();
        assert_eq!(path.source(), "repoA");
        assert_eq!(path.name(), "foo");
        assert_eq!(path.to_string(), "repoA:foo");
    }

    #[test]
    fn test_parse_url_sources() {
        let https = AddonPath::parse("https://github.com/org/addons.git:physics").unwrap();
        assert_eq!(https.source(), "https://github.com/org/addons.git");
        assert_eq!(https.name(), "physics");

        let ssh = AddonPath::parse("git@github.com:org/addons.git:physics").unwrap();
        assert_eq!(ssh.source(), "git@github.com:org/addons.git");
        assert_eq!(ssh.name(), "physics");
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for key in ["no-separator", ":foo", "repoA:", "repoA:  "] {
            let result = AddonPath::parse(key);
            assert!(
                matches!(result, Err(CatalogError::InvalidReference(_))),
                "expected '{key}' to be rejected"
            );
        }
    }

    #[test]
    fn test_same_name_different_repositories_differ() {
        let a = AddonPath::parse("repo:name").unwrap();
        let b = AddonPath::parse("repo2:name").unwrap();
        assert_ne!(a, b);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_both_reference_forms_normalize_identically() {
        let refs: Vec<AddonReference> = serde_json::from_str(
            r#"["repoA:foo", {"git": "repoA", "addon": "foo"}]"#,
        )
        .unwrap();

        assert!(matches!(refs[0], AddonReference::Key(_)));
        assert!(matches!(refs[1], AddonReference::Pair { .. }));
        assert_eq!(refs[0].to_path().unwrap(), refs[1].to_path().unwrap());
    }

    #[test]
    fn test_pair_with_empty_addon_is_invalid() {
        let reference = AddonReference::Pair {
            git: "repoA".to_string(),
            addon: String::new(),
        };
        assert!(reference.to_path().is_err());
    }
}
