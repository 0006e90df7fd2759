//! # Error Handling
//!
//! This module defines the centralized error type for `docprep`. It uses
//! `thiserror` to build a single `Error` enum whose variants carry enough
//! context (command line, directory, stderr) to diagnose a failed build
//! without re-running it.
//!
//! Only fatal conditions are represented here. Metadata gaps (no `origin`
//! remote, no exact tag, no `description` key) never become errors; they are
//! resolved to defaults where they occur.
//!
//! - Configuration parsing errors.
//! - Git clone and git command failures.
//! - Generator failures.
//! - Artifact placement failures.
//! - Delegated configuration failures.
//! - Uninitialized dependency directories under the `fail` policy.
//! - Wrapped I/O, YAML, JSON, TOML and regex errors.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for docprep operations
#[derive(Error, Debug)]
pub enum Error {
    /// The `.docprep.yaml` build configuration could not be parsed.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Cloning a dependency repository failed.
    #[error("Git clone error for {url} into {}: {message}{}", path.display(), hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        path: PathBuf,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// A git command other than clone failed.
    #[error("Git command failed in {}: git {command} - {stderr}", dir.display())]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// The API-reference generator could not be spawned or exited non-zero.
    #[error("Generator error: {binary} - {message}")]
    Generator { binary: String, message: String },

    /// Moving or copying generated artifacts failed.
    #[error("Artifact placement error ({strategy}): {message}")]
    Placement { strategy: String, message: String },

    /// The delegated configuration could not be read or merged.
    #[error("Delegated configuration error in {}: {message}", path.display())]
    Delegation { path: PathBuf, message: String },

    /// A dependency directory exists without git metadata and the configured
    /// policy forbids touching it.
    #[error("Dependency directory {} exists but is not a git repository", path.display())]
    UninitializedDependency { path: PathBuf },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
