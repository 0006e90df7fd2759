//! Project identity resolution.
//!
//! A documentation build needs a project name and a version label. Both come
//! from git: the name from the last path segment of the `origin` remote URL,
//! the version from a tag sitting exactly on HEAD. Neither is allowed to fail
//! the build; a missing remote gives an empty name and a missing tag gives
//! [`LATEST`].

use std::path::Path;

use log::debug;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::repository::GitOperations;

/// Version label used when HEAD carries no exact tag.
pub const LATEST: &str = "latest";

/// Name and version of the project being documented.
///
/// `version` and `release` are always equal; a single value backs both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    name: String,
    version: String,
}

impl ProjectIdentity {
    /// Build an identity from a name and an optional exact tag.
    pub fn new(name: impl Into<String>, tag: Option<String>) -> Self {
        let version = tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| LATEST.to_string());

        Self {
            name: name.into(),
            version,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.version
    }
}

impl Serialize for ProjectIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProjectIdentity", 3)?;
        state.serialize_field("project", self.name())?;
        state.serialize_field("version", self.version())?;
        state.serialize_field("release", self.release())?;
        state.end()
    }
}

/// Extract a project name from a git remote URL.
///
/// Takes the last segment after `/` (or `:` for scp-like URLs such as
/// `git@host:repo.git`) and strips a trailing `.git`. Trailing slashes are
/// ignored.
pub fn project_name_from_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let segment = trimmed.rsplit(['/', ':']).next().unwrap_or_default();
    segment.strip_suffix(".git").unwrap_or(segment).to_string()
}

/// Resolve the identity of the repository at `root`.
pub fn resolve(git: &dyn GitOperations, root: &Path) -> ProjectIdentity {
    let origin = git.remote_url(root).unwrap_or_else(|| {
        debug!("No origin remote configured in {}", root.display());
        String::new()
    });

    let tag = git.exact_tag(root);
    if tag.is_none() {
        debug!("HEAD carries no exact tag, using '{}'", LATEST);
    }

    ProjectIdentity::new(project_name_from_url(&origin), tag)
}
