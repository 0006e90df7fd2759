//! API-reference generator invocation.
//!
//! The generator (doxygen by default) is an opaque subprocess: it receives its
//! configuration file as the only argument, and the project identity through
//! three environment variables layered on top of the inherited environment.
//! It blocks until the generator exits; any spawn failure or non-zero exit
//! aborts the build.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::identity::ProjectIdentity;

pub const ENV_COMPONENT_NAME: &str = "COMPONENT_NAME";
pub const ENV_COMPONENT_VERSION: &str = "COMPONENT_VERSION";
pub const ENV_COMPONENT_BRIEF: &str = "COMPONENT_BRIEF";

/// A fully derived generator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInvocation {
    pub binary: PathBuf,
    pub config_file: PathBuf,
    /// Variables added to the inherited environment.
    pub env: BTreeMap<String, String>,
}

impl GeneratorInvocation {
    pub fn new(
        binary: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        identity: &ProjectIdentity,
        brief: &str,
    ) -> Self {
        let env = BTreeMap::from([
            (ENV_COMPONENT_NAME.to_string(), identity.name().to_string()),
            (ENV_COMPONENT_VERSION.to_string(), identity.version().to_string()),
            (ENV_COMPONENT_BRIEF.to_string(), brief.to_string()),
        ]);

        Self {
            binary: binary.into(),
            config_file: config_file.into(),
            env,
        }
    }
}

/// Resolve a configured generator binary.
///
/// Bare names are looked up on `PATH`; anything containing a path separator
/// is used as given. A failed lookup keeps the bare name so the error is
/// reported when the generator is spawned.
pub fn discover(binary: &str) -> PathBuf {
    let candidate = PathBuf::from(binary);
    if candidate.components().count() > 1 {
        return candidate;
    }

    which::which(binary).unwrap_or_else(|e| {
        debug!("{} not found on PATH ({})", binary, e);
        candidate
    })
}

/// Runs a generator invocation - allows mocking in tests
pub trait GeneratorRunner {
    /// Run the generator from `cwd` and wait for it to finish.
    fn run(&self, invocation: &GeneratorInvocation, cwd: &Path) -> Result<()>;
}

/// Runs the generator as a child process sharing this process's stdio.
pub struct CommandRunner;

impl GeneratorRunner for CommandRunner {
    fn run(&self, invocation: &GeneratorInvocation, cwd: &Path) -> Result<()> {
        let binary = invocation.binary.display().to_string();
        info!(
            "Running {} {}...",
            binary,
            invocation.config_file.display()
        );
        debug!("Generator environment: {:?}", invocation.env);

        let status = Command::new(&invocation.binary)
            .arg(&invocation.config_file)
            .current_dir(cwd)
            .envs(&invocation.env)
            .status()
            .map_err(|e| Error::Generator {
                binary: binary.clone(),
                message: format!("could not be started: {}", e),
            })?;

        if !status.success() {
            return Err(Error::Generator {
                binary,
                message: format!("exited with {}", status),
            });
        }

        Ok(())
    }
}
