//! # Artifact Placement
//!
//! After the generator has run, its HTML output has to end up where the page
//! renderer publishes it. Projects differ in how they want this done, so the
//! behavior is a single [`PlacementStrategy`] chosen in `.docprep.yaml`:
//!
//! - **`replace`**: remove the destination, then copy the output into it.
//!   Repeated runs always produce the same tree.
//! - **`relocate`**: remove a stale build directory, move the output inside it
//!   and register that directory as an extra published path, forcing a theme.
//! - **`merge`**: copy the output over the destination, logging each top-level
//!   entry, and tolerate failures when the destination already exists.
//!
//! Paths are relative to the project root unless absolute.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::defaults;
use crate::error::{Error, Result};

fn default_destination() -> PathBuf {
    defaults::path(defaults::PLACEMENT_DESTINATION)
}

fn default_stale_dir() -> PathBuf {
    defaults::path(defaults::RELOCATE_STALE_DIR)
}

fn default_relocate_destination() -> PathBuf {
    defaults::path(defaults::RELOCATE_DESTINATION)
}

fn default_theme() -> String {
    defaults::RELOCATE_THEME.to_string()
}

/// How generated artifacts reach the published tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Forced removal followed by a recursive copy.
    Replace {
        #[serde(default = "default_destination")]
        destination: PathBuf,
    },
    /// Move into a freshly emptied build directory and publish that directory.
    Relocate {
        #[serde(default = "default_stale_dir")]
        stale_dir: PathBuf,
        /// Must lie inside `stale_dir`.
        #[serde(default = "default_relocate_destination")]
        destination: PathBuf,
        #[serde(default = "default_theme")]
        theme: String,
    },
    /// Best-effort recursive copy over whatever is already there.
    Merge {
        #[serde(default = "default_destination")]
        destination: PathBuf,
    },
}

impl Default for PlacementStrategy {
    fn default() -> Self {
        PlacementStrategy::Replace {
            destination: default_destination(),
        }
    }
}

impl PlacementStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            PlacementStrategy::Replace { .. } => "replace",
            PlacementStrategy::Relocate { .. } => "relocate",
            PlacementStrategy::Merge { .. } => "merge",
        }
    }

    pub fn destination(&self) -> &Path {
        match self {
            PlacementStrategy::Replace { destination }
            | PlacementStrategy::Relocate { destination, .. }
            | PlacementStrategy::Merge { destination } => destination,
        }
    }
}

/// Renderer settings a placement asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementRegistration {
    /// Paths to append to `html_extra_path`.
    pub extra_paths: Vec<PathBuf>,
    /// Theme to force into `html_theme`.
    pub theme: Option<String>,
}

/// Place the generator output at `output_dir` according to `strategy`.
pub fn place(
    strategy: &PlacementStrategy,
    root: &Path,
    output_dir: &Path,
) -> Result<PlacementRegistration> {
    let output_dir = root.join(output_dir);

    match strategy {
        PlacementStrategy::Replace { destination } => {
            let destination = root.join(destination);
            reject_overlap(strategy, &output_dir, &destination)?;
            require_output(strategy, &output_dir)?;
            remove_path(&destination)?;
            let copied = copy_tree(&output_dir, &destination, &mut |_: &Path| {})?;
            info!(
                "Copied {} files from {} to {}",
                copied,
                output_dir.display(),
                destination.display()
            );
            Ok(PlacementRegistration::default())
        }
        PlacementStrategy::Relocate {
            stale_dir,
            destination,
            theme,
        } => {
            let stale_dir = root.join(stale_dir);
            let destination = root.join(destination);
            if !destination.starts_with(&stale_dir) || destination == stale_dir {
                return Err(Error::Placement {
                    strategy: strategy.name().to_string(),
                    message: format!(
                        "destination {} must be inside {}",
                        destination.display(),
                        stale_dir.display()
                    ),
                });
            }
            reject_overlap(strategy, &output_dir, &stale_dir)?;

            remove_path(&stale_dir)?;
            require_output(strategy, &output_dir)?;
            move_tree(&output_dir, &destination)?;
            info!(
                "Moved {} to {}",
                output_dir.display(),
                destination.display()
            );

            Ok(PlacementRegistration {
                extra_paths: vec![stale_dir],
                theme: Some(theme.clone()),
            })
        }
        PlacementStrategy::Merge { destination } => {
            let destination = root.join(destination);
            reject_overlap(strategy, &output_dir, &destination)?;
            if !output_dir.is_dir() {
                warn!(
                    "No generator output at {}, nothing to merge",
                    output_dir.display()
                );
                return Ok(PlacementRegistration::default());
            }

            let existed = destination.exists();
            let mut log_entry = |entry: &Path| info!("Copying {}", entry.display());
            match copy_tree(&output_dir, &destination, &mut log_entry) {
                Ok(copied) => {
                    info!("Merged {} files into {}", copied, destination.display());
                }
                Err(e) if existed => {
                    warn!(
                        "Keeping existing {} after failed merge: {}",
                        destination.display(),
                        e
                    );
                }
                Err(e) => return Err(e),
            }
            Ok(PlacementRegistration::default())
        }
    }
}

/// Fail when `target` and the generator output contain one another.
///
/// Removing an ancestor of the output deletes the output, and copying into a
/// descendant of it never terminates.
fn reject_overlap(strategy: &PlacementStrategy, output_dir: &Path, target: &Path) -> Result<()> {
    let output_dir = normalize(output_dir);
    let target = normalize(target);
    if output_dir.starts_with(&target) || target.starts_with(&output_dir) {
        return Err(Error::Placement {
            strategy: strategy.name().to_string(),
            message: format!(
                "{} overlaps the generator output {}",
                target.display(),
                output_dir.display()
            ),
        });
    }
    Ok(())
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn require_output(strategy: &PlacementStrategy, output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        Ok(())
    } else {
        Err(Error::Placement {
            strategy: strategy.name().to_string(),
            message: format!("generator output {} not found", output_dir.display()),
        })
    }
}

/// Remove a file or directory tree if present.
fn remove_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        info!("Removing {}", path.display());
        fs::remove_dir_all(path)?;
    } else if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Recursively copy `src` into `dst`, overwriting files that already exist.
///
/// `on_top_level` is called once for each direct child of `src`. Returns the
/// number of files copied.
pub fn copy_tree(src: &Path, dst: &Path, on_top_level: &mut dyn FnMut(&Path)) -> Result<usize> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| Error::Placement {
            strategy: "copy".to_string(),
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Placement {
                strategy: "copy".to_string(),
                message: e.to_string(),
            })?;

        if entry.depth() == 1 {
            on_top_level(relative);
        }

        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Move `src` to `dst`, copying across filesystems when a rename is refused.
fn move_tree(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    if fs::rename(src, dst).is_err() {
        copy_tree(src, dst, &mut |_: &Path| {})?;
        fs::remove_dir_all(src)?;
    }
    Ok(())
}
