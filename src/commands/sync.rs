//! Sync command implementation
//!
//! Clones absent auxiliary repositories and updates present ones, using the
//! same policy as `build`, then stops.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use docprep::output::{OutputConfig, Status};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Project root (defaults to current directory)
    #[arg(short, long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Path to config file (defaults to <root>/.docprep.yaml)
    #[arg(short, long, value_name = "PATH", env = "DOCPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the sync command
pub fn execute(args: SyncArgs, output: &OutputConfig) -> Result<()> {
    use docprep::config;
    use docprep::orchestrator;
    use docprep::repository::RepositoryManager;

    let root = super::resolve_root(args.root)?;
    let config = config::load(&root, args.config.as_deref())?;
    let repo_manager = RepositoryManager::new(config.default_branch.clone(), config.uninitialized);

    match orchestrator::sync_dependencies(&config, &root, &repo_manager) {
        Ok(reconciled) => {
            if !args.quiet {
                println!(
                    "{} {} dependencies reconciled",
                    output.marker(Status::Done),
                    reconciled.len()
                );
                for (spec, action) in &reconciled {
                    println!(
                        "{} {} ({}): {}",
                        output.marker(Status::Item),
                        spec.local_path.display(),
                        spec.remote_url,
                        action
                    );
                }
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Sync failed", output.marker(Status::Failed));
            }
            Err(e.into())
        }
    }
}
