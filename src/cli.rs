//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use docprep::output::OutputConfig;

/// docprep - Prepare a documentation build before the page renderer runs
#[derive(Parser, Debug)]
#[command(name = "docprep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full preparation: identity, dependencies, generator, placement
    Build(commands::build::BuildArgs),

    /// Print the project name, version and release derived from git
    Identity(commands::identity::IdentityArgs),

    /// Clone or update the auxiliary repositories only
    Sync(commands::sync::SyncArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        init_logging(&self.log_level, &output);

        match self.command {
            Commands::Build(args) => commands::build::execute(args, &output),
            Commands::Identity(args) => commands::identity::execute(args),
            Commands::Sync(args) => commands::sync::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// RUST_LOG, when set, takes precedence over `--log-level`.
fn init_logging(level: &str, output: &OutputConfig) {
    let env = env_logger::Env::default().default_filter_or(level);
    let style = if output.use_color {
        env_logger::WriteStyle::Always
    } else {
        env_logger::WriteStyle::Never
    };

    // A logger may already be installed when running under the test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .write_style(style)
        .try_init();
}
