//! # Dependency Reconciliation
//!
//! This module provides the `RepositoryManager`, which makes sure every
//! auxiliary repository a documentation build needs exists locally and is
//! synced to the latest state of its default branch.
//!
//! ## Design
//!
//! Git access goes through the **`GitOperations`** trait. In the application
//! `DefaultGitOperations` wraps the system `git` executable (see `crate::git`);
//! tests substitute a mock that records every invocation.
//!
//! Each dependency directory is classified into a [`DependencyState`] and the
//! state alone decides the action:
//!
//! | State           | Action                                        |
//! |-----------------|-----------------------------------------------|
//! | `Absent`        | create the directory, clone into it           |
//! | `Present`       | checkout the default branch, pull             |
//! | `Uninitialized` | per [`UninitializedPolicy`]: clone, skip, fail |
//!
//! Git commands receive the dependency directory explicitly, so the process
//! working directory is the same before and after reconciliation.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::UninitializedPolicy;
use crate::error::{Error, Result};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// URL of the `origin` remote of the repository at `dir`, if any.
    fn remote_url(&self, dir: &Path) -> Option<String>;

    /// Tag pointing exactly at HEAD of the repository at `dir`, if any.
    fn exact_tag(&self, dir: &Path) -> Option<String>;

    /// Clones `url` into `target_dir`, which may exist if empty.
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Checks out `branch` in the repository at `dir`.
    fn checkout(&self, dir: &Path, branch: &str) -> Result<()>;

    /// Pulls the current branch in the repository at `dir`.
    fn pull(&self, dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which runs the system `git`.
pub struct DefaultGitOperations {
    executable: PathBuf,
}

impl DefaultGitOperations {
    /// Uses the `git` found on `PATH`, looked up once.
    pub fn new() -> Self {
        Self::with_executable(crate::git::discover())
    }

    pub fn with_executable(executable: PathBuf) -> Self {
        Self { executable }
    }
}

impl Default for DefaultGitOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOperations for DefaultGitOperations {
    fn remote_url(&self, dir: &Path) -> Option<String> {
        crate::git::remote_origin_url(&self.executable, dir)
    }

    fn exact_tag(&self, dir: &Path) -> Option<String> {
        crate::git::exact_tag(&self.executable, dir)
    }

    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(&self.executable, url, target_dir)
    }

    fn checkout(&self, dir: &Path, branch: &str) -> Result<()> {
        crate::git::checkout(&self.executable, dir, branch)
    }

    fn pull(&self, dir: &Path) -> Result<()> {
        crate::git::pull(&self.executable, dir)
    }
}

/// An auxiliary repository and where it lives locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub remote_url: String,
    pub local_path: PathBuf,
}

impl DependencySpec {
    pub fn new(remote_url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_path: local_path.into(),
        }
    }
}

/// Local state of a dependency directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyState {
    /// No directory at the path.
    Absent,
    /// A directory without git metadata.
    Uninitialized,
    /// A directory with git metadata.
    Present,
}

/// Classify the directory at `path`.
pub fn classify(path: &Path) -> DependencyState {
    if !path.is_dir() {
        DependencyState::Absent
    } else if path.join(".git").exists() {
        DependencyState::Present
    } else {
        DependencyState::Uninitialized
    }
}

/// What reconciliation did for one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Cloned,
    Updated,
    Skipped,
}

impl std::fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileAction::Cloned => write!(f, "cloned"),
            ReconcileAction::Updated => write!(f, "updated"),
            ReconcileAction::Skipped => write!(f, "skipped"),
        }
    }
}

/// The main entry point for reconciling dependency repositories.
pub struct RepositoryManager {
    git_ops: Box<dyn GitOperations>,
    default_branch: String,
    uninitialized: UninitializedPolicy,
}

impl RepositoryManager {
    /// Creates a `RepositoryManager` backed by the system `git`.
    pub fn new(default_branch: impl Into<String>, uninitialized: UninitializedPolicy) -> Self {
        Self::with_operations(
            Box::new(DefaultGitOperations::new()),
            default_branch,
            uninitialized,
        )
    }

    /// Creates a `RepositoryManager` with a custom `GitOperations`
    /// implementation.
    pub fn with_operations(
        git_ops: Box<dyn GitOperations>,
        default_branch: impl Into<String>,
        uninitialized: UninitializedPolicy,
    ) -> Self {
        Self {
            git_ops,
            default_branch: default_branch.into(),
            uninitialized,
        }
    }

    /// The git operations backing this manager, shared with identity
    /// resolution.
    pub fn git(&self) -> &dyn GitOperations {
        self.git_ops.as_ref()
    }

    /// Reconcile every dependency, in order, stopping at the first failure.
    pub fn reconcile(&self, specs: &[DependencySpec]) -> Result<Vec<ReconcileAction>> {
        specs.iter().map(|spec| self.reconcile_one(spec)).collect()
    }

    /// Reconcile a single dependency according to its current state.
    pub fn reconcile_one(&self, spec: &DependencySpec) -> Result<ReconcileAction> {
        let path = &spec.local_path;

        match classify(path) {
            DependencyState::Absent => {
                fs::create_dir_all(path)?;
                info!("Cloning {} into {}...", spec.remote_url, path.display());
                self.git_ops.clone_repo(&spec.remote_url, path)?;
                Ok(ReconcileAction::Cloned)
            }
            DependencyState::Present => {
                info!(
                    "Updating clone of {} in {}...",
                    spec.remote_url,
                    path.display()
                );
                self.git_ops.checkout(path, &self.default_branch)?;
                self.git_ops.pull(path)?;
                Ok(ReconcileAction::Updated)
            }
            DependencyState::Uninitialized => self.reconcile_uninitialized(spec),
        }
    }

    fn reconcile_uninitialized(&self, spec: &DependencySpec) -> Result<ReconcileAction> {
        let path = &spec.local_path;

        match self.uninitialized {
            UninitializedPolicy::Clone => {
                if !is_empty_dir(path)? {
                    warn!(
                        "{} exists, is not a git repository and is not empty; cloning {} into it anyway",
                        path.display(),
                        spec.remote_url
                    );
                }
                info!("Cloning {} into {}...", spec.remote_url, path.display());
                self.git_ops.clone_repo(&spec.remote_url, path)?;
                Ok(ReconcileAction::Cloned)
            }
            UninitializedPolicy::Skip => {
                warn!(
                    "{} exists but is not a git repository; leaving it untouched",
                    path.display()
                );
                Ok(ReconcileAction::Skipped)
            }
            UninitializedPolicy::Fail => Err(Error::UninitializedDependency { path: path.clone() }),
        }
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
