//! # docprep
//!
//! This library prepares a documentation build before the page renderer runs.
//! It is used by the `docprep` command-line tool, usually invoked as the first
//! step of a documentation build.
//!
//! ## Quick Example
//!
//! ```
//! use docprep::identity::{project_name_from_url, ProjectIdentity};
//!
//! let name = project_name_from_url("git@example.com:acme/widgets.git");
//! assert_eq!(name, "widgets");
//!
//! // Without an exact tag on HEAD, version and release are "latest"
//! let identity = ProjectIdentity::new(name, None);
//! assert_eq!(identity.version(), "latest");
//! assert_eq!(identity.release(), "latest");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`, `defaults`)**: the optional `.docprep.yaml`
//!   file and the fixed dependency lists of each variant.
//! - **Identity (`identity`)**: project name and version derived from git.
//! - **Dependencies (`repository`, `git`)**: cloning or updating the auxiliary
//!   repositories the build relies on.
//! - **Generator (`generator`, `metadata`)**: running the API-reference
//!   generator with the project identity in its environment.
//! - **Placement (`placement`)**: moving generated HTML where the renderer
//!   publishes it.
//! - **Namespace (`namespace`)**: the renderer settings, merged from computed
//!   values and the delegated configuration shipped by the build environment.
//!
//! ## Execution Flow
//!
//! `orchestrator::execute_build` runs the stages in a fixed order:
//!
//! 1.  **Identity**: read the `origin` URL and the exact tag at HEAD.
//! 2.  **Dependencies**: clone absent repositories, update present ones.
//! 3.  **Generator**: run doxygen (or the configured generator).
//! 4.  **Placement and delegation**: place the output, merge the delegated
//!     configuration, bind the copyright line and write the result as JSON.
//!
//! Metadata gaps degrade to defaults; every other failure stops the build.

pub mod config;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod git;
pub mod identity;
pub mod metadata;
pub mod namespace;
pub mod orchestrator;
pub mod output;
pub mod placement;
pub mod repository;

#[cfg(test)]
mod identity_proptest;
