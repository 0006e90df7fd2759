//! Identity command implementation
//!
//! Prints the project name, version and release exactly as a build would
//! bind them, without touching dependencies or running the generator.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use docprep::identity::{self, ProjectIdentity};
use docprep::repository::DefaultGitOperations;

/// Arguments for the identity command
#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Project root (defaults to current directory)
    #[arg(short, long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the identity command
pub fn execute(args: IdentityArgs) -> Result<()> {
    let root = super::resolve_root(args.root)?;
    let identity = identity::resolve(&DefaultGitOperations::new(), &root);
    println!("{}", render(&identity, args.json)?);
    Ok(())
}

fn render(identity: &ProjectIdentity, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(identity)?);
    }
    Ok(format!(
        "project: {}\nversion: {}\nrelease: {}",
        identity.name(),
        identity.version(),
        identity.release()
    ))
}
