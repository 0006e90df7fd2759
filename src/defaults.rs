//! Default values for docprep configuration.
//!
//! This module centralizes the fixed dependency list and the default paths
//! used when `.docprep.yaml` leaves a field unset, so commands and tests agree
//! on a single set of values.

use std::path::{Path, PathBuf};

use crate::config::Variant;
use crate::repository::DependencySpec;

/// Name of the optional build configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = ".docprep.yaml";

/// Shared build environment; it also ships the delegated renderer configuration.
pub const BUILDENV_URL: &str = "git://github.com/Erebot/Erebot_Buildenv.git";
pub const BUILDENV_PATH: &str = "vendor/erebot/buildenv";

/// Doxygen helper documenting native PHP types (`natives` variant).
pub const NATIVES_URL: &str = "git://github.com/fpoirotte/PHPNatives4Doxygen";
pub const NATIVES_PATH: &str = "vendor/fpoirotte/natives4doxygen";

/// Generic module documentation skeleton (`skeleton` variant).
pub const SKELETON_URL: &str = "git://github.com/Erebot/Erebot_Module_Skeleton_Doc.git";
pub const SKELETON_PATH: &str = "vendor/erebot/module-skeleton-doc";

pub const DEFAULT_BRANCH: &str = "master";

pub const METADATA_FILE: &str = "composer.json";

pub const GENERATOR_BINARY: &str = "doxygen";
pub const GENERATOR_CONFIG_FILE: &str = "Doxyfile";
/// Where the generator writes HTML; fixed by the generator's own config file.
pub const GENERATOR_OUTPUT_DIR: &str = "docs/api/html";

pub const PLACEMENT_DESTINATION: &str = "docs/enduser/html/api";
pub const RELOCATE_STALE_DIR: &str = "build";
pub const RELOCATE_DESTINATION: &str = "build/apidoc";
pub const RELOCATE_THEME: &str = "haiku";

pub const DELEGATED_CONFIG: &str = "vendor/erebot/buildenv/sphinx/conf.toml";
pub const EMIT_PATH: &str = "docs/src/docprep.json";

/// Returns the fixed dependency list for a variant, rooted at `root`.
///
/// The build environment always comes first: the delegated configuration
/// lives inside it.
pub fn dependency_specs(variant: Variant, root: &Path) -> Vec<DependencySpec> {
    let (url, path) = match variant {
        Variant::Natives => (NATIVES_URL, NATIVES_PATH),
        Variant::Skeleton => (SKELETON_URL, SKELETON_PATH),
    };

    vec![
        DependencySpec::new(BUILDENV_URL, root.join(BUILDENV_PATH)),
        DependencySpec::new(url, root.join(path)),
    ]
}

pub(crate) fn path(value: &str) -> PathBuf {
    PathBuf::from(value)
}
