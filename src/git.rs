//! Thin wrappers over the system `git` executable.
//!
//! Every command runs with an explicit working directory instead of changing
//! the process working directory, so callers never observe a directory change.
//! Read-only queries (`remote_origin_url`, `exact_tag`) report failures as
//! `None`; mutating commands return errors.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

/// Locate the `git` executable on `PATH`.
///
/// Falls back to the bare name when the lookup fails; a missing git then
/// surfaces as a spawn error on first use.
pub fn discover() -> PathBuf {
    which::which("git").unwrap_or_else(|e| {
        debug!("git not found on PATH ({}), using bare name", e);
        PathBuf::from("git")
    })
}

fn run(git: &Path, dir: Option<&Path>, args: &[&str]) -> std::io::Result<Output> {
    let mut command = Command::new(git);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    debug!(
        "Running {} {} (in {})",
        git.display(),
        args.join(" "),
        dir.map(|d| d.display().to_string())
            .unwrap_or_else(|| ".".to_string())
    );
    command.output()
}

/// Run a read-only query and return its trimmed stdout, or `None` on any failure.
fn query(git: &Path, dir: &Path, args: &[&str]) -> Option<String> {
    match run(git, Some(dir), args) {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if stdout.is_empty() {
                None
            } else {
                Some(stdout)
            }
        }
        Ok(output) => {
            debug!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            None
        }
        Err(e) => {
            debug!("git {} could not be spawned: {}", args.join(" "), e);
            None
        }
    }
}

/// Read the `origin` remote URL from the repository's local configuration.
pub fn remote_origin_url(git: &Path, dir: &Path) -> Option<String> {
    query(git, dir, &["config", "--local", "remote.origin.url"])
}

/// Return the tag pointing exactly at HEAD, matched along first parents.
pub fn exact_tag(git: &Path, dir: &Path) -> Option<String> {
    query(git, dir, &["describe", "--tags", "--exact", "--first-parent"])
}

/// Clone `url` into `target_dir`.
///
/// `target_dir` may already exist as long as it is empty. This uses the system
/// git command, so SSH keys, credential helpers and `~/.gitconfig` apply.
pub fn clone(git: &Path, url: &str, target_dir: &Path) -> Result<()> {
    let target = target_dir.to_string_lossy();
    let output = run(git, None, &["clone", url, &target]).map_err(|e| Error::GitClone {
        url: url.to_string(),
        path: target_dir.to_path_buf(),
        message: e.to_string(),
        hint: Some("Make sure git is installed and on PATH".to_string()),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            Some("Check that your SSH keys or git credentials grant access to the repository".to_string())
        } else if stderr.contains("already exists and is not an empty directory") {
            Some("Empty the directory or set `uninitialized: skip` in .docprep.yaml".to_string())
        } else {
            None
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            path: target_dir.to_path_buf(),
            message: stderr,
            hint,
        });
    }

    Ok(())
}

fn run_checked(git: &Path, dir: &Path, args: &[&str]) -> Result<()> {
    let command = args.join(" ");
    let output = run(git, Some(dir), args).map_err(|e| Error::GitCommand {
        command: command.clone(),
        dir: dir.to_path_buf(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            dir: dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    debug!("{}", String::from_utf8_lossy(&output.stdout).trim());
    Ok(())
}

/// Check out `branch` in the repository at `dir`.
pub fn checkout(git: &Path, dir: &Path, branch: &str) -> Result<()> {
    run_checked(git, dir, &["checkout", branch])
}

/// Pull the current branch of the repository at `dir`.
pub fn pull(git: &Path, dir: &Path) -> Result<()> {
    run_checked(git, dir, &["pull"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MISSING_GIT: &str = "/nonexistent/bin/git";

    #[test]
    fn test_queries_outside_repository_return_none() {
        let temp_dir = TempDir::new().unwrap();
        let git = discover();

        // Works whether or not git is installed: both failures map to None
        assert_eq!(remote_origin_url(&git, temp_dir.path()), None);
        assert_eq!(exact_tag(&git, temp_dir.path()), None);
    }

    #[test]
    fn test_queries_with_missing_executable_return_none() {
        let temp_dir = TempDir::new().unwrap();
        let git = PathBuf::from(MISSING_GIT);

        assert_eq!(remote_origin_url(&git, temp_dir.path()), None);
        assert_eq!(exact_tag(&git, temp_dir.path()), None);
    }

    #[test]
    fn test_clone_with_missing_executable_fails() {
        let temp_dir = TempDir::new().unwrap();
        let git = PathBuf::from(MISSING_GIT);

        let err = clone(&git, "https://example.com/acme/widgets.git", temp_dir.path()).unwrap_err();
        match err {
            Error::GitClone { url, hint, .. } => {
                assert_eq!(url, "https://example.com/acme/widgets.git");
                assert!(hint.is_some());
            }
            other => panic!("Expected GitClone error, got {:?}", other),
        }
    }

    #[test]
    fn test_checkout_and_pull_with_missing_executable_fail() {
        let temp_dir = TempDir::new().unwrap();
        let git = PathBuf::from(MISSING_GIT);

        let err = checkout(&git, temp_dir.path(), "master").unwrap_err();
        assert!(matches!(err, Error::GitCommand { ref command, .. } if command == "checkout master"));

        let err = pull(&git, temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::GitCommand { ref command, .. } if command == "pull"));
    }
}
