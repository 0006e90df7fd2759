//! # Renderer Configuration Namespace
//!
//! The page renderer is configured through a flat namespace of settings. Part
//! of it is computed here (project identity, published paths, copyright) and
//! part comes from the delegated configuration file shipped by the build
//! environment dependency. `ConfigNamespace` holds the merged result.
//!
//! The delegated file is read as data (TOML, YAML or JSON, chosen by
//! extension) and never executed. It can read the identity through the
//! placeholders `{project}`, `{version}` and `{release}` in string values.
//!
//! ## Write Order
//!
//! [`assemble`] writes the namespace in a fixed order:
//!
//! 1. `project`, `version`, `release`
//! 2. delegated settings (`html_extra_path` is appended, other keys overwrite)
//! 3. placement registration (`html_extra_path` appended, `html_theme` forced)
//! 4. `copyright`
//!
//! Identity is therefore visible to the delegated settings, and the copyright
//! line cannot be overwritten by them.

use std::path::Path;

use log::{debug, info, warn};
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::identity::ProjectIdentity;
use crate::placement::PlacementRegistration;

pub const KEY_PROJECT: &str = "project";
pub const KEY_VERSION: &str = "version";
pub const KEY_RELEASE: &str = "release";
pub const KEY_COPYRIGHT: &str = "copyright";
pub const KEY_EXTRA_PATH: &str = "html_extra_path";
pub const KEY_THEME: &str = "html_theme";

/// Identity keys readable from delegated string values.
const PLACEHOLDER_PATTERN: &str = r"\{(project|version|release)\}";

/// Ordered settings handed to the page renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNamespace {
    values: Map<String, Value>,
}

impl ConfigNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Bind `project`, `version` and `release`.
    pub fn bind_identity(&mut self, identity: &ProjectIdentity) {
        self.set(KEY_PROJECT, identity.name());
        self.set(KEY_VERSION, identity.version());
        self.set(KEY_RELEASE, identity.release());
    }

    /// Merge delegated settings, expanding identity placeholders first.
    pub fn merge_delegated(&mut self, settings: Map<String, Value>) -> Result<()> {
        let placeholder = Regex::new(PLACEHOLDER_PATTERN)?;

        for (key, mut value) in settings {
            self.interpolate(&placeholder, &mut value);

            if key == KEY_EXTRA_PATH {
                match value {
                    Value::Array(paths) => self.append_extra_paths(paths),
                    other => {
                        warn!("{} should be a list, got {}", KEY_EXTRA_PATH, other);
                        self.values.insert(key, other);
                    }
                }
            } else {
                self.values.insert(key, value);
            }
        }
        Ok(())
    }

    /// Apply what artifact placement asked for.
    pub fn apply_registration(&mut self, registration: &PlacementRegistration) {
        let paths = registration
            .extra_paths
            .iter()
            .map(|p| Value::String(p.display().to_string()))
            .collect();
        self.append_extra_paths(paths);

        if let Some(theme) = &registration.theme {
            if let Some(previous) = self.get_str(KEY_THEME) {
                if previous != theme {
                    debug!("Overriding {} '{}' with '{}'", KEY_THEME, previous, theme);
                }
            }
            self.set(KEY_THEME, theme.as_str());
        }
    }

    /// Bind the copyright line. Call last.
    pub fn bind_copyright(&mut self, copyright: impl Into<String>) {
        self.set(KEY_COPYRIGHT, copyright.into());
    }

    fn append_extra_paths(&mut self, paths: Vec<Value>) {
        if paths.is_empty() {
            return;
        }

        match self.values.get_mut(KEY_EXTRA_PATH) {
            Some(Value::Array(existing)) => existing.extend(paths),
            Some(other) => {
                warn!("Replacing non-list {} value {}", KEY_EXTRA_PATH, other);
                *other = Value::Array(paths);
            }
            None => {
                self.values
                    .insert(KEY_EXTRA_PATH.to_string(), Value::Array(paths));
            }
        }
    }

    /// Replace `{project}`, `{version}` and `{release}` in every string.
    fn interpolate(&self, placeholder: &Regex, value: &mut Value) {
        match value {
            Value::String(s) => {
                let expanded = placeholder
                    .replace_all(s, |caps: &regex::Captures| {
                        self.get_str(&caps[1]).unwrap_or_default().to_string()
                    })
                    .into_owned();
                *s = expanded;
            }
            Value::Array(items) => items
                .iter_mut()
                .for_each(|v| self.interpolate(placeholder, v)),
            Value::Object(map) => map
                .values_mut()
                .for_each(|v| self.interpolate(placeholder, v)),
            _ => {}
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }

    /// Write the namespace as JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_pretty()? + "\n")?;
        Ok(())
    }
}

/// Parse a delegated configuration file into a settings table.
pub fn load_settings(path: &Path) -> Result<Map<String, Value>> {
    let delegation_error = |message: String| Error::Delegation {
        path: path.to_path_buf(),
        message,
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| delegation_error(format!("cannot be read: {}", e)))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let value: Value = match extension.as_str() {
        "toml" => {
            let table: toml::Table =
                toml::from_str(&content).map_err(|e| delegation_error(e.to_string()))?;
            toml_to_json(toml::Value::Table(table))
        }
        "yaml" | "yml" => {
            serde_yaml::from_str(&content).map_err(|e| delegation_error(e.to_string()))?
        }
        "json" => serde_json::from_str(&content).map_err(|e| delegation_error(e.to_string()))?,
        other => {
            return Err(delegation_error(format!(
                "unsupported format '{}', expected .toml, .yaml, .yml or .json",
                other
            )))
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(delegation_error("top level must be a table of settings".to_string())),
    }
}

/// Convert a TOML value, rendering datetimes in their TOML string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

/// Format the copyright line.
///
/// `2012-2026, XRL Team. All rights reserved`, or a single year when the range
/// would be empty.
pub fn copyright_line(first_year: Option<i32>, current_year: i32, holder: &str) -> String {
    match first_year {
        Some(first) if first < current_year => {
            format!("{}-{}, {}. All rights reserved", first, current_year, holder)
        }
        _ => format!("{}, {}. All rights reserved", current_year, holder),
    }
}

/// Build the renderer namespace in the documented write order.
pub fn assemble(
    identity: &ProjectIdentity,
    delegated_config: &Path,
    registration: &PlacementRegistration,
    copyright: String,
) -> Result<ConfigNamespace> {
    let mut namespace = ConfigNamespace::new();
    namespace.bind_identity(identity);

    info!(
        "Including delegated configuration {}...",
        delegated_config.display()
    );
    let settings = load_settings(delegated_config)?;
    namespace.merge_delegated(settings)?;

    namespace.apply_registration(registration);
    namespace.bind_copyright(copyright);
    Ok(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn identity() -> ProjectIdentity {
        ProjectIdentity::new("widgets", Some("v2.3.0".to_string()))
    }

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_copyright_line() {
        assert_eq!(
            copyright_line(Some(2012), 2026, "XRL Team"),
            "2012-2026, XRL Team. All rights reserved"
        );
        assert_eq!(
            copyright_line(Some(2026), 2026, "XRL Team"),
            "2026, XRL Team. All rights reserved"
        );
        assert_eq!(
            copyright_line(None, 2026, "widgets Team"),
            "2026, widgets Team. All rights reserved"
        );
    }

    #[test]
    fn test_load_toml_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "conf.toml",
            r#"
extensions = ["sphinx.ext.todo", "sphinx.ext.ifconfig"]
html_theme = "default"
master_doc = "index"
"#,
        );

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings["html_theme"], json!("default"));
        assert_eq!(
            settings["extensions"],
            json!(["sphinx.ext.todo", "sphinx.ext.ifconfig"])
        );
    }

    #[test]
    fn test_load_toml_dates_as_strings() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "conf.toml",
            r#"
today = 2024-01-02
built = 2024-01-02T10:30:00Z
[html_context]
released = 2023-12-24
"#,
        );

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings["today"], json!("2024-01-02"));
        assert_eq!(settings["built"], json!("2024-01-02T10:30:00Z"));
        assert_eq!(settings["html_context"]["released"], json!("2023-12-24"));
    }

    #[test]
    fn test_load_yaml_and_json_settings() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = write_config(temp_dir.path(), "conf.yml", "html_theme: nature\n");
        let json_path = write_config(temp_dir.path(), "conf.json", r#"{"html_theme": "agogo"}"#);

        assert_eq!(load_settings(&yaml).unwrap()["html_theme"], json!("nature"));
        assert_eq!(load_settings(&json_path).unwrap()["html_theme"], json!("agogo"));
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "conf.py", "html_theme = 'default'\n");

        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, Error::Delegation { .. }));
        assert!(err.to_string().contains("unsupported format"));
    }

    #[test]
    fn test_load_rejects_non_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(temp_dir.path(), "conf.json", "[1, 2, 3]");
        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_settings(&temp_dir.path().join("conf.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot be read"));
    }

    #[test]
    fn test_delegated_settings_read_identity() {
        let mut namespace = ConfigNamespace::new();
        namespace.bind_identity(&identity());

        let settings = json!({
            "html_title": "{project} {release} documentation",
            "latex_documents": [["index", "{project}.tex", "{project} Manual"]],
            "html_context": {"version_label": "v={version}", "other": "{unknown}"},
        });
        namespace
            .merge_delegated(settings.as_object().unwrap().clone())
            .unwrap();

        assert_eq!(
            namespace.get_str("html_title"),
            Some("widgets v2.3.0 documentation")
        );
        assert_eq!(
            namespace.get("latex_documents"),
            Some(&json!([["index", "widgets.tex", "widgets Manual"]]))
        );
        assert_eq!(
            namespace.get("html_context"),
            Some(&json!({"version_label": "v=v2.3.0", "other": "{unknown}"}))
        );
    }

    #[test]
    fn test_delegated_extra_path_is_appended() {
        let mut namespace = ConfigNamespace::new();
        namespace.set(KEY_EXTRA_PATH, json!(["static"]));

        let settings = json!({"html_extra_path": ["extra"]});
        namespace
            .merge_delegated(settings.as_object().unwrap().clone())
            .unwrap();

        assert_eq!(namespace.get(KEY_EXTRA_PATH), Some(&json!(["static", "extra"])));
    }

    #[test]
    fn test_registration_appends_and_forces_theme() {
        let mut namespace = ConfigNamespace::new();
        namespace.set(KEY_EXTRA_PATH, json!(["extra"]));
        namespace.set(KEY_THEME, "default");

        namespace.apply_registration(&PlacementRegistration {
            extra_paths: vec![PathBuf::from("/project/build")],
            theme: Some("haiku".to_string()),
        });

        assert_eq!(
            namespace.get(KEY_EXTRA_PATH),
            Some(&json!(["extra", "/project/build"]))
        );
        assert_eq!(namespace.get_str(KEY_THEME), Some("haiku"));
    }

    #[test]
    fn test_empty_registration_changes_nothing() {
        let mut namespace = ConfigNamespace::new();
        namespace.set(KEY_THEME, "default");
        namespace.apply_registration(&PlacementRegistration::default());

        assert_eq!(namespace.len(), 1);
        assert_eq!(namespace.get(KEY_EXTRA_PATH), None);
    }

    #[test]
    fn test_assemble_write_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            temp_dir.path(),
            "conf.toml",
            r#"
copyright = "overwritten by the build"
html_theme = "default"
html_extra_path = ["extra"]
html_title = "{project} documentation"
"#,
        );

        let registration = PlacementRegistration {
            extra_paths: vec![PathBuf::from("build")],
            theme: Some("haiku".to_string()),
        };
        let namespace = assemble(
            &identity(),
            &path,
            &registration,
            copyright_line(Some(2012), 2026, "XRL Team"),
        )
        .unwrap();

        assert_eq!(namespace.get_str(KEY_PROJECT), Some("widgets"));
        assert_eq!(namespace.get_str(KEY_VERSION), Some("v2.3.0"));
        assert_eq!(namespace.get_str(KEY_RELEASE), Some("v2.3.0"));
        assert_eq!(namespace.get_str("html_title"), Some("widgets documentation"));
        assert_eq!(namespace.get_str(KEY_THEME), Some("haiku"));
        assert_eq!(namespace.get(KEY_EXTRA_PATH), Some(&json!(["extra", "build"])));
        assert_eq!(
            namespace.get_str(KEY_COPYRIGHT),
            Some("2012-2026, XRL Team. All rights reserved")
        );

        let keys: Vec<&String> = namespace.as_map().keys().collect();
        assert_eq!(&keys[..3], &["project", "version", "release"]);
    }

    #[test]
    fn test_write_to_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let mut namespace = ConfigNamespace::new();
        namespace.bind_identity(&identity());

        let path = temp_dir.path().join("docs/src/docprep.json");
        namespace.write_to(&path).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["project"], json!("widgets"));
    }
}
