//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `docprep`
//! command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `docprep` library.

pub mod build;
pub mod completions;
pub mod identity;
pub mod sync;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolve the `--root` argument to an absolute project root.
///
/// Defaults to the current directory. Relative roots are taken relative to it.
pub(crate) fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(match root {
        Some(root) => cwd.join(root),
        None => cwd,
    })
}
