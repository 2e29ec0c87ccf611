// Tue Jan 13 2026 - Alex

pub mod error;
pub mod extractor;
pub mod loader;

pub use error::{FilterReason, SkipReason};
pub use extractor::MetadataExtractor;
pub use loader::{DescriptorLoader, LoadedUnit, UnitLoader};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One unit file found on disk. `id` is the file name with the unit suffix removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitDescriptor {
    pub id: String,
    pub directory: PathBuf,
    path: PathBuf,
}

impl UnitDescriptor {
    pub fn new(id: &str, directory: &Path, suffix: &str) -> Self {
        Self {
            id: id.to_string(),
            directory: directory.to_path_buf(),
            path: directory.join(format!("{}{}", id, suffix)),
        }
    }

    /// Returns `None` when the file name does not carry `suffix` or nothing is left once it is stripped.
    pub fn from_path(path: &Path, suffix: &str) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let id = file_name.strip_suffix(suffix)?;
        if id.is_empty() {
            return None;
        }

        let directory = path.parent()?.to_path_buf();
        Some(Self {
            id: id.to_string(),
            directory,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Declared type and default of a single unit input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub input_type: Option<String>,
    pub default: Option<Value>,
}

impl InputSpec {
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn typed(input_type: &str) -> Self {
        Self {
            input_type: Some(input_type.to_string()),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Accepts `null`, a bare default value, or `{"type": .., "default": ..}`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::untyped(),
            Value::Object(map) if map.contains_key("type") || map.contains_key("default") => {
                let input_type = map.get("type").and_then(Value::as_str).map(str::to_string);
                let default = map.get("default").filter(|v| !v.is_null()).cloned();
                Self { input_type, default }
            }
            other => Self {
                input_type: Some(json_type_name(other).to_string()),
                default: Some(other.clone()),
            },
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Metadata of a unit that passed the inclusion filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMetadata {
    pub id: String,
    pub display_name: String,
    pub inputs: HashMap<String, InputSpec>,
    pub product: String,
    pub feature: String,
    pub applicable_os: String,
    pub visible: bool,
}

impl UnitMetadata {
    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// What happened to one discovered unit. `Ok` carries the id merged into the registry.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    pub unit: UnitDescriptor,
    pub result: Result<String, SkipReason>,
}

impl UnitOutcome {
    pub fn accepted(unit: UnitDescriptor) -> Self {
        let id = unit.id.clone();
        Self { unit, result: Ok(id) }
    }

    pub fn skipped(unit: UnitDescriptor, reason: SkipReason) -> Self {
        Self { unit, result: Err(reason) }
    }

    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        self.result.as_ref().err()
    }
}
