// Tue Jan 13 2026 - Alex

use super::extractor::DEFAULT_ENTRY_POINT;
use super::{SkipReason, UnitDescriptor};
use crate::config::Config;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const IMPORTS_KEY: &str = "imports";
pub const INPUTS_KEY: &str = "tcinputs";

pub trait UnitLoader: Send + Sync {
    fn load(&self, unit: &UnitDescriptor) -> Result<LoadedUnit, SkipReason>;
}

/// A parsed unit file together with the defaults its imports contribute.
#[derive(Debug, Clone)]
pub struct LoadedUnit {
    pub descriptor: UnitDescriptor,
    pub namespace: Map<String, Value>,
    pub defaults: Map<String, Value>,
}

impl LoadedUnit {
    pub fn new(descriptor: UnitDescriptor, namespace: Map<String, Value>) -> Self {
        Self {
            descriptor,
            namespace,
            defaults: Map::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Loads JSON unit files. Sibling imports are resolved against the unit's own
/// directory and may not leave it. Imports may be listed at the top level of the
/// file or inside the entry point; entry point imports are applied last.
pub struct DescriptorLoader {
    entry_point: String,
    max_unit_bytes: u64,
    max_import_depth: usize,
}

impl DescriptorLoader {
    pub fn new() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            max_unit_bytes: 1024 * 1024,
            max_import_depth: 8,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_entry_point(&config.entry_point)
            .with_max_unit_bytes(config.max_unit_bytes)
            .with_max_import_depth(config.max_import_depth)
    }

    pub fn with_entry_point(mut self, entry_point: &str) -> Self {
        self.entry_point = entry_point.to_string();
        self
    }

    pub fn with_max_unit_bytes(mut self, limit: u64) -> Self {
        self.max_unit_bytes = limit;
        self
    }

    pub fn with_max_import_depth(mut self, depth: usize) -> Self {
        self.max_import_depth = depth;
        self
    }

    fn read_document(&self, path: &Path) -> Result<Map<String, Value>, SkipReason> {
        let metadata = fs::metadata(path).map_err(|e| SkipReason::io(path, &e))?;
        if metadata.len() > self.max_unit_bytes {
            return Err(SkipReason::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.max_unit_bytes,
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| SkipReason::io(path, &e))?;

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SkipReason::Parse(format!("{:?} is not a JSON object", path))),
            Err(e) => Err(SkipReason::Parse(format!("{:?}: {}", path, e))),
        }
    }

    fn resolve_import(&self, directory: &Path, import: &str) -> Result<PathBuf, SkipReason> {
        let mut relative = PathBuf::new();

        for component in Path::new(import).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(SkipReason::ImportEscapesDirectory(import.to_string()));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(SkipReason::ImportEscapesDirectory(import.to_string()));
                }
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(SkipReason::ImportEscapesDirectory(import.to_string()));
        }

        let resolved = directory.join(&relative);

        // Symlinks inside the directory can still point outside of it.
        if let (Ok(real_dir), Ok(real_file)) = (directory.canonicalize(), resolved.canonicalize()) {
            if !real_file.starts_with(&real_dir) {
                return Err(SkipReason::ImportEscapesDirectory(import.to_string()));
            }
        }

        Ok(resolved)
    }

    fn apply_imports(
        &self,
        directory: &Path,
        document: &Map<String, Value>,
        depth: usize,
        chain: &mut Vec<PathBuf>,
        defaults: &mut Map<String, Value>,
    ) -> Result<(), SkipReason> {
        let imports = match document.get(IMPORTS_KEY) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(SkipReason::InvalidField {
                    field: IMPORTS_KEY,
                    expected: "list of file names",
                })
            }
        };

        if imports.is_empty() {
            return Ok(());
        }
        if depth >= self.max_import_depth {
            return Err(SkipReason::ImportDepth(self.max_import_depth));
        }

        for item in imports {
            let name = item.as_str().ok_or(SkipReason::InvalidField {
                field: IMPORTS_KEY,
                expected: "list of file names",
            })?;

            let path = self.resolve_import(directory, name)?;
            if chain.contains(&path) {
                return Err(SkipReason::ImportCycle(name.to_string()));
            }

            let helper = self.read_document(&path)?;

            chain.push(path);
            self.apply_imports(directory, &helper, depth + 1, chain, defaults)?;
            chain.pop();

            merge_defaults(defaults, &helper);
        }

        Ok(())
    }
}

impl Default for DescriptorLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitLoader for DescriptorLoader {
    fn load(&self, unit: &UnitDescriptor) -> Result<LoadedUnit, SkipReason> {
        let namespace = self.read_document(unit.path())?;

        let mut defaults = Map::new();
        let mut chain = vec![unit.path().to_path_buf()];
        self.apply_imports(&unit.directory, &namespace, 0, &mut chain, &mut defaults)?;

        if let Some(Value::Object(entry)) = namespace.get(&self.entry_point) {
            self.apply_imports(&unit.directory, entry, 0, &mut chain, &mut defaults)?;
        }

        Ok(LoadedUnit::new(unit.clone(), namespace).with_defaults(defaults))
    }
}

/// Later helpers override earlier ones; input maps are merged key by key.
pub fn merge_defaults(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        if key == IMPORTS_KEY {
            continue;
        }

        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) if key == INPUTS_KEY => {
                for (name, spec) in incoming {
                    existing.insert(name.clone(), spec.clone());
                }
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
