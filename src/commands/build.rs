//! Build command implementation
//!
//! The build command runs the complete preparation:
//! 1. Resolve the project identity from git
//! 2. Clone or update the auxiliary repositories
//! 3. Run the API-reference generator
//! 4. Place its output and emit the renderer configuration

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use docprep::output::{OutputConfig, Status};

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project root (defaults to current directory)
    #[arg(short, long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Path to config file (defaults to <root>/.docprep.yaml)
    #[arg(short, long, value_name = "PATH", env = "DOCPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where to write the renderer configuration (overrides `emit`)
    #[arg(long, value_name = "PATH")]
    pub emit: Option<PathBuf>,

    /// Do not clone or update the auxiliary repositories
    #[arg(long)]
    pub skip_sync: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs, output: &OutputConfig) -> Result<()> {
    use docprep::config;
    use docprep::generator::CommandRunner;
    use docprep::orchestrator::{self, BuildOptions};
    use docprep::repository::RepositoryManager;
    use std::time::Instant;

    let start_time = Instant::now();
    let root = super::resolve_root(args.root)?;

    if !args.quiet {
        println!("{} docprep build", output.marker(Status::Start));
        println!();
    }

    let config = config::load(&root, args.config.as_deref())?;
    let repo_manager = RepositoryManager::new(config.default_branch.clone(), config.uninitialized);
    let options = BuildOptions {
        sync: !args.skip_sync,
        emit: args.emit,
        ..BuildOptions::default()
    };

    match orchestrator::execute_build(&config, &root, &repo_manager, &CommandRunner, &options) {
        Ok(report) => {
            if !args.quiet {
                println!(
                    "{} Prepared {} {} in {:.2}s",
                    output.marker(Status::Done),
                    display_name(report.identity.name()),
                    report.identity.version(),
                    start_time.elapsed().as_secs_f64()
                );
                for (spec, action) in &report.reconciled {
                    println!(
                        "{} {}: {}",
                        output.marker(Status::Item),
                        spec.local_path.display(),
                        action
                    );
                }
                if report.generated {
                    println!(
                        "{} API reference placed ({})",
                        output.marker(Status::Item),
                        config.placement.name()
                    );
                }
                println!(
                    "{} Renderer configuration: {}",
                    output.marker(Status::Item),
                    report.emitted.display()
                );
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!("{} Build failed", output.marker(Status::Failed));
                println!();
            }
            Err(e.into())
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed project)"
    } else {
        name
    }
}
