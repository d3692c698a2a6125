//! Nested settings document
//!
//! Settings are addressed by dotted paths, for instance
//! `"trajectories_comparisons_plot.title"`. A leaf may either hold a plain
//! value or a record of the form:
//!
//! ```json
//! { "value": "Trajectories", "description": "Title of the plot", "type": "string" }
//! ```
//!
//! Records are unwrapped transparently, so callers never have to care which
//! form was used in the document.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Key holding the value of an annotated record.
const VALUE_KEY: &str = "value";

/// Key holding the description of an annotated record.
const DESCRIPTION_KEY: &str = "description";

/// Key holding the type of an annotated record.
const TYPE_KEY: &str = "type";

/// Returned by [`Settings::describe`] when no description is available.
pub const NO_DESCRIPTION: &str = "No description available";

/// Returned by [`Settings::get_type`] when no type is available.
pub const UNDEFINED_TYPE: &str = "undefined";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A read-only view over a nested settings document.
#[derive(Debug, Clone)]
pub struct Settings {
    path: Option<PathBuf>,
    data: Value,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot load the settings file {0:?}: {1}")]
    FileLoadError(PathBuf, std::io::Error),

    #[error("Cannot read the settings file {0:?}: {1}")]
    DeserialiseError(PathBuf, serde_json::Error),
}

/// A resolved leaf of the settings document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting<'a> {
    /// A raw value (scalar, array, or a mapping without any metadata).
    Plain(&'a Value),

    /// A mapping which may carry `value`, `description` and `type` fields.
    Record {
        raw: &'a Value,
        fields: &'a Map<String, Value>,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<'a> Setting<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(fields) => Setting::Record { raw: value, fields },
            v => Setting::Plain(v),
        }
    }

    /// The effective value of this setting.
    ///
    /// Records exposing a `value` key are unwrapped, any other record is
    /// returned as is.
    pub fn value(&self) -> &'a Value {
        match *self {
            Setting::Plain(v) => v,
            Setting::Record { raw, fields } => fields.get(VALUE_KEY).unwrap_or(raw),
        }
    }

    /// Get a metadata field of a record, if present.
    fn meta(&self, key: &str) -> Option<&'a Value> {
        match *self {
            Setting::Plain(_) => None,
            Setting::Record { fields, .. } => fields.get(key),
        }
    }
}

impl Settings {
    /// Load a settings document from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();

        let settings_str = match read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(SettingsError::FileLoadError(path, e)),
        };

        match serde_json::from_str(&settings_str) {
            Ok(data) => Ok(Self {
                path: Some(path),
                data,
            }),
            Err(e) => Err(SettingsError::DeserialiseError(path, e)),
        }
    }

    /// Build settings from an in-memory document.
    pub fn from_value(data: Value) -> Self {
        Self { path: None, data }
    }

    /// Path of the file the settings were loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Walk the document along the dotted path.
    ///
    /// Returns `None` if any segment is missing, if an intermediate segment
    /// is not a mapping, or if the leaf is `null`.
    pub fn resolve(&self, setting_path: &str) -> Option<Setting<'_>> {
        let mut current = &self.data;

        for segment in setting_path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }

        if current.is_null() {
            None
        } else {
            Some(Setting::classify(current))
        }
    }

    /// Get the unwrapped raw value at the given path.
    ///
    /// A record whose `value` is `null` counts as missing.
    pub fn get_value(&self, setting_path: &str) -> Option<&Value> {
        self.resolve(setting_path)
            .map(|s| s.value())
            .filter(|v| !v.is_null())
    }

    /// Get the value at the given path, or `default` if it cannot be found
    /// or does not have the expected type.
    pub fn get<T: DeserializeOwned>(&self, setting_path: &str, default: T) -> T {
        let value = match self.get_value(setting_path) {
            Some(v) => v,
            None => return default,
        };

        match T::deserialize(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "Setting \"{}\" has an unexpected type ({}), using the default",
                    setting_path, e
                );
                default
            }
        }
    }

    /// Get the description of a setting.
    pub fn describe(&self, setting_path: &str) -> String {
        self.meta_string(setting_path, DESCRIPTION_KEY)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    /// Get the declared type of a setting.
    pub fn get_type(&self, setting_path: &str) -> String {
        self.meta_string(setting_path, TYPE_KEY)
            .unwrap_or_else(|| UNDEFINED_TYPE.to_string())
    }

    fn meta_string(&self, setting_path: &str, key: &str) -> Option<String> {
        match self.resolve(setting_path)?.meta(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            v => Some(v.to_string()),
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn settings() -> Settings {
        Settings::from_value(json!({
            "general": {
                "verbose": { "value": true, "description": "Print status lines", "type": "bool" },
                "dpi": 120
            },
            "files": {
                "output_directory": "out",
                "nothing": null,
                "log_filename": { "value": null, "description": "Optional log file" }
            },
            "trajectories_comparisons_plot": {
                "title": {
                    "value": "Comparison",
                    "description": "Title shown above the overhead view"
                },
                "style": { "color": "#FF0000" }
            }
        }))
    }

    #[test]
    fn test_wrapped_record_is_unwrapped() {
        let s = settings();

        assert_eq!(s.get("general.verbose", false), true);
        assert_eq!(
            s.get("trajectories_comparisons_plot.title", String::new()),
            "Comparison"
        );
        assert_eq!(s.get_value("general.verbose"), Some(&json!(true)));
    }

    #[test]
    fn test_plain_values() {
        let s = settings();

        assert_eq!(s.get("general.dpi", 100u32), 120);
        assert_eq!(s.get("files.output_directory", String::new()), "out");
    }

    #[test]
    fn test_record_without_value_is_returned_whole() {
        let s = settings();

        assert_eq!(
            s.get("trajectories_comparisons_plot.style", Value::Null),
            json!({ "color": "#FF0000" })
        );
    }

    #[test]
    fn test_missing_paths_return_default() {
        let s = settings();

        assert_eq!(s.get("missing.verbose", 7), 7);
        assert_eq!(s.get("general.missing", 7), 7);
        assert_eq!(s.get("general.dpi.deeper", 7), 7);
        assert_eq!(s.get("files.output_directory.x", 7), 7);
        assert_eq!(s.get("files.nothing", 7), 7);
        assert_eq!(s.get::<Option<String>>("files.log_filename", None), None);
        assert_eq!(s.describe("files.log_filename"), "Optional log file");
        assert!(s.resolve("").is_none());
    }

    #[test]
    fn test_wrong_type_returns_default() {
        let s = settings();

        assert_eq!(s.get("files.output_directory", 3.5), 3.5);
    }

    #[test]
    fn test_metadata() {
        let s = settings();

        assert_eq!(s.describe("general.verbose"), "Print status lines");
        assert_eq!(s.get_type("general.verbose"), "bool");

        assert_eq!(
            s.describe("trajectories_comparisons_plot.title"),
            "Title shown above the overhead view"
        );
        assert_eq!(s.get_type("trajectories_comparisons_plot.title"), UNDEFINED_TYPE);

        assert_eq!(s.describe("general.dpi"), NO_DESCRIPTION);
        assert_eq!(s.describe("not.there"), NO_DESCRIPTION);
        assert_eq!(s.get_type("not.there"), UNDEFINED_TYPE);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "general": { "verbose": { "value": false } } }"#).unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.get("general.verbose", true), false);
        assert_eq!(s.path(), Some(path.as_path()));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::DeserialiseError(_, _))
        ));

        assert!(matches!(
            Settings::load(dir.path().join("missing.json")),
            Err(SettingsError::FileLoadError(_, _))
        ));
    }
}
