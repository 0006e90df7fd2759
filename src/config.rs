//! # Build Configuration
//!
//! This module defines the `.docprep.yaml` build configuration and its parser.
//! The file is optional: every field has a default matching the conventional
//! project layout, so a project without the file builds with the `natives`
//! variant, the `replace` placement strategy and doxygen as the generator.
//!
//! ## Key Components
//!
//! - **`BuildConfig`**: the whole configuration, deserialized with `serde_yaml`.
//! - **`Variant`**: selects which fixed dependency list is reconciled.
//! - **`UninitializedPolicy`**: the explicit choice for dependency directories
//!   that exist but hold no git metadata.
//! - **`GeneratorConfig`** and **`CopyrightConfig`**: generator invocation and
//!   copyright line settings.
//!
//! The placement strategy itself is defined in `crate::placement` and embedded
//! here under the `placement` key.
//!
//! Relative paths are resolved against the project root with
//! [`BuildConfig::resolve`].
//!
//! `delegated_config` must name a data file (`.toml`, `.yaml`, `.yml` or
//! `.json`) provided by the build environment repository. A build environment
//! that only ships an executable `conf.py` fails at delegation; point
//! `delegated_config` at a settings file the project provides instead.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::placement::PlacementStrategy;
use crate::repository::DependencySpec;

/// Which auxiliary repository accompanies the build environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Build environment plus the native-types doxygen helper.
    #[default]
    Natives,
    /// Build environment plus the generic module documentation skeleton.
    Skeleton,
}

/// What to do with a dependency directory that exists but is not a clone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UninitializedPolicy {
    /// Clone into the directory, warning first if it is not empty.
    #[default]
    Clone,
    /// Leave the directory untouched and warn.
    Skip,
    /// Abort the build.
    Fail,
}

/// API-reference generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Set to `false` for projects without an API reference.
    pub enabled: bool,
    /// Executable name or path; names are looked up on `PATH`.
    pub binary: String,
    /// The single argument passed to the generator.
    pub config_file: PathBuf,
    /// Output directory written by the generator (defined by its config file).
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: defaults::GENERATOR_BINARY.to_string(),
            config_file: defaults::path(defaults::GENERATOR_CONFIG_FILE),
            output_dir: defaults::path(defaults::GENERATOR_OUTPUT_DIR),
        }
    }
}

/// Copyright line settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyrightConfig {
    /// First year of the copyright range; omitted means "current year only".
    pub first_year: Option<i32>,
    /// Copyright holder; defaults to "<project> Team".
    pub holder: Option<String>,
}

/// The `.docprep.yaml` build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub variant: Variant,
    /// Branch checked out and pulled in already-cloned dependencies.
    pub default_branch: String,
    pub uninitialized: UninitializedPolicy,
    /// JSON project metadata; only its `description` key is read.
    pub metadata_file: PathBuf,
    pub generator: GeneratorConfig,
    pub placement: PlacementStrategy,
    /// Renderer settings shipped by the build environment dependency.
    pub delegated_config: PathBuf,
    /// Where the finished configuration namespace is written.
    pub emit: PathBuf,
    pub copyright: CopyrightConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            default_branch: defaults::DEFAULT_BRANCH.to_string(),
            uninitialized: UninitializedPolicy::default(),
            metadata_file: defaults::path(defaults::METADATA_FILE),
            generator: GeneratorConfig::default(),
            placement: PlacementStrategy::default(),
            delegated_config: defaults::path(defaults::DELEGATED_CONFIG),
            emit: defaults::path(defaults::EMIT_PATH),
            copyright: CopyrightConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Resolve a configured path against the project root.
    pub fn resolve(&self, root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// The fixed dependency list for the configured variant.
    pub fn dependencies(&self, root: &Path) -> Vec<DependencySpec> {
        defaults::dependency_specs(self.variant, root)
    }
}

/// Parse a YAML string into a `BuildConfig`.
///
/// An empty document (or one holding only comments) yields the defaults.
pub fn parse(yaml_content: &str) -> Result<BuildConfig> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: None,
        })?;

    if value.is_null() {
        return Ok(BuildConfig::default());
    }

    serde_yaml::from_value(value).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("unknown field") {
            Some("Check the key against the documented .docprep.yaml fields".to_string())
        } else if message.contains("unknown variant") {
            Some("See `docprep build --help` for the accepted values".to_string())
        } else {
            None
        };
        Error::ConfigParse { message, hint }
    })
}

/// Read and parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Load the build configuration for a project.
///
/// An explicitly requested file must exist. Otherwise `.docprep.yaml` in the
/// project root is used when present, and the defaults when it is not.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<BuildConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::ConfigParse {
                message: format!("Configuration file not found: {}", path.display()),
                hint: None,
            });
        }
        debug!("Loading build configuration from {}", path.display());
        return from_file(path);
    }

    let default_path = root.join(defaults::CONFIG_FILE_NAME);
    if default_path.is_file() {
        debug!("Loading build configuration from {}", default_path.display());
        from_file(&default_path)
    } else {
        info!(
            "No {} in {}, using default configuration",
            defaults::CONFIG_FILE_NAME,
            root.display()
        );
        Ok(BuildConfig::default())
    }
}
