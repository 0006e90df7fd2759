//! Orchestrator for the complete documentation build preparation
//!
//! This module runs the four stages strictly in order:
//!
//! 1. Resolve the project identity from git
//! 2. Reconcile the auxiliary repositories
//! 3. Run the API-reference generator
//! 4. Place the generated artifacts, then assemble and emit the renderer
//!    configuration namespace
//!
//! Any fatal error aborts the remaining stages.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use log::info;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::generator::{self, GeneratorInvocation, GeneratorRunner};
use crate::identity::{self, ProjectIdentity};
use crate::metadata;
use crate::namespace::{self, ConfigNamespace};
use crate::placement::{self, PlacementRegistration};
use crate::repository::{DependencySpec, ReconcileAction, RepositoryManager};

/// Per-run switches that do not belong in `.docprep.yaml`.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Reconcile dependencies before building.
    pub sync: bool,
    /// Overrides the configured `emit` path.
    pub emit: Option<PathBuf>,
    /// Year used for the copyright line.
    pub current_year: i32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            sync: true,
            emit: None,
            current_year: chrono::Local::now().year(),
        }
    }
}

/// Everything a build did, for reporting.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub identity: ProjectIdentity,
    pub reconciled: Vec<(DependencySpec, ReconcileAction)>,
    pub generated: bool,
    pub registration: PlacementRegistration,
    pub namespace: ConfigNamespace,
    pub emitted: PathBuf,
}

/// Reconcile the configured dependencies, pairing each with its outcome.
pub fn sync_dependencies(
    config: &BuildConfig,
    root: &Path,
    repo_manager: &RepositoryManager,
) -> Result<Vec<(DependencySpec, ReconcileAction)>> {
    let specs = config.dependencies(root);
    let actions = repo_manager.reconcile(&specs)?;
    Ok(specs.into_iter().zip(actions).collect())
}

/// Execute the complete build preparation.
pub fn execute_build(
    config: &BuildConfig,
    root: &Path,
    repo_manager: &RepositoryManager,
    runner: &dyn GeneratorRunner,
    options: &BuildOptions,
) -> Result<BuildReport> {
    info!("Running from {}...", root.display());

    // Stage 1: Identity
    let identity = identity::resolve(repo_manager.git(), root);
    info!(
        "Project {} version {}",
        identity.name(),
        identity.version()
    );

    // Stage 2: Dependencies
    let reconciled = if options.sync {
        sync_dependencies(config, root, repo_manager)?
    } else {
        info!("Skipping dependency reconciliation");
        Vec::new()
    };

    // Stage 3: Generator
    let generated = config.generator.enabled;
    if generated {
        let brief = metadata::read_description(&config.resolve(root, &config.metadata_file));
        let invocation = GeneratorInvocation::new(
            generator::discover(&config.generator.binary),
            config.resolve(root, &config.generator.config_file),
            &identity,
            &brief,
        );
        runner.run(&invocation, root)?;
    } else {
        info!("API reference generation disabled");
    }

    // Stage 4: Placement and delegation
    let registration = if generated {
        placement::place(&config.placement, root, &config.generator.output_dir)?
    } else {
        PlacementRegistration::default()
    };

    let holder = config
        .copyright
        .holder
        .clone()
        .unwrap_or_else(|| default_holder(&identity));
    let copyright =
        namespace::copyright_line(config.copyright.first_year, options.current_year, &holder);

    let namespace = namespace::assemble(
        &identity,
        &config.resolve(root, &config.delegated_config),
        &registration,
        copyright,
    )?;

    let emitted = config.resolve(root, options.emit.as_deref().unwrap_or(config.emit.as_path()));
    namespace.write_to(&emitted)?;
    info!("Wrote renderer configuration to {}", emitted.display());

    Ok(BuildReport {
        identity,
        reconciled,
        generated,
        registration,
        namespace,
        emitted,
    })
}

fn default_holder(identity: &ProjectIdentity) -> String {
    if identity.name().is_empty() {
        "The authors".to_string()
    } else {
        format!("{} Team", identity.name())
    }
}
