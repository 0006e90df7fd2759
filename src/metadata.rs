//! Project metadata lookup.
//!
//! The generator receives a one-line project description taken from the
//! `description` key of the project's JSON metadata file (`composer.json`).
//! A missing file, unreadable file, invalid JSON or missing key all yield an
//! empty description.

use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ProjectMetadata {
    #[serde(default)]
    description: Option<String>,
}

/// Read the `description` field of the metadata file at `path`.
pub fn read_description(path: &Path) -> String {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No metadata at {} ({}), using empty description", path.display(), e);
            return String::new();
        }
    };

    match serde_json::from_str::<ProjectMetadata>(&content) {
        Ok(metadata) => metadata.description.unwrap_or_default(),
        Err(e) => {
            warn!(
                "Ignoring unparsable metadata file {}: {}",
                path.display(),
                e
            );
            String::new()
        }
    }
}
