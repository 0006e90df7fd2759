//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::NO_GENERATOR);
//!     fixture.command().arg("build").arg("--skip-sync").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::{git, git_available};
    pub use super::TestFixture;
}

/// `.docprep.yaml` snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Skip the generator so builds only assemble the namespace.
    pub const NO_GENERATOR: &str = "generator:\n  enabled: false\n";

    /// Unknown top-level key.
    pub const UNKNOWN_FIELD: &str = "theme: nature\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "invalid: yaml: content:";
}

/// Relative path of the delegated renderer settings in the default layout.
#[allow(dead_code)]
pub const DELEGATED_CONFIG: &str = "vendor/erebot/buildenv/sphinx/conf.toml";

/// Whether a `git` executable can be run.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` with a fixed identity, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=docprep tests", "-c", "user.email=tests@example.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed in {}", args, dir.display());
}

/// A test fixture that provides a temporary project root.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.docprep.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".docprep.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add the delegated renderer settings at their default location.
    #[allow(dead_code)]
    pub fn with_delegated(self, content: &str) -> Self {
        self.with_file(DELEGATED_CONFIG, content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".docprep.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("docprep");
        cmd.current_dir(self.path())
            .env_remove("DOCPREP_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(configs::NO_GENERATOR);
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_fixture_with_delegated() {
        let fixture = TestFixture::new().with_delegated("html_theme = \"haiku\"\n");
        assert!(fixture.path().join(DELEGATED_CONFIG).exists());
    }
}
