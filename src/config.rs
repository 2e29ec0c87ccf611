// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: PathBuf,
    pub unit_suffix: String,
    pub entry_point: String,
    pub recursive: bool,
    pub output_file: PathBuf,
    pub clear_stale_output: bool,
    pub parallel_loading: bool,
    pub max_threads: usize,
    pub max_unit_bytes: u64,
    pub max_import_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Testcases"),
            unit_suffix: ".unit".to_string(),
            entry_point: "TestCase".to_string(),
            recursive: true,
            output_file: PathBuf::from("TestCaseRegistry.xml"),
            clear_stale_output: false,
            parallel_loading: true,
            max_threads: num_cpus::get(),
            max_unit_bytes: 1024 * 1024,
            max_import_depth: 8,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_unit_suffix(mut self, suffix: &str) -> Self {
        self.unit_suffix = suffix.to_string();
        self
    }

    pub fn with_entry_point(mut self, entry_point: &str) -> Self {
        self.entry_point = entry_point.to_string();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_output_file<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output_file = output.into();
        self
    }

    pub fn with_clear_stale_output(mut self, clear: bool) -> Self {
        self.clear_stale_output = clear;
        self
    }

    pub fn with_parallel_loading(mut self, parallel: bool) -> Self {
        self.parallel_loading = parallel;
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
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

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_suffix.is_empty() {
            return Err(ConfigError::Validation("unit_suffix must not be empty".to_string()));
        }
        if self.entry_point.is_empty() {
            return Err(ConfigError::Validation("entry_point must not be empty".to_string()));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation("output_file must not be empty".to_string()));
        }
        if self.max_threads == 0 {
            return Err(ConfigError::Validation("max_threads must be greater than 0".to_string()));
        }
        if self.max_unit_bytes == 0 {
            return Err(ConfigError::Validation("max_unit_bytes must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Loads a JSON config file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("json") {
            return Err(ConfigError::UnsupportedFormat(ext.to_string()));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unit_suffix, ".unit");
        assert_eq!(config.entry_point, "TestCase");
        assert!(config.recursive);
        assert!(!config.clear_stale_output);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Config::new().with_unit_suffix("").validate().is_err());
        assert!(Config::new().with_entry_point("").validate().is_err());
        assert!(Config::new().with_max_threads(0).validate().is_err());
        assert!(Config::new().with_max_unit_bytes(0).validate().is_err());
        assert!(Config::new().with_output_file("").validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("registry.json");
        fs::write(&path, r#"{"root": "suites", "recursive": false}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("suites"));
        assert!(!config.recursive);
        assert_eq!(config.unit_suffix, ".unit");
    }

    #[test]
    fn test_load_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(tmp.path().join("missing.json")),
            Err(ConfigError::NotFound(_))
        ));

        let toml = tmp.path().join("registry.toml");
        fs::write(&toml, "root = 'x'").unwrap();
        assert!(matches!(Config::load(&toml), Err(ConfigError::UnsupportedFormat(_))));

        let broken = tmp.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse(_))));

        let invalid = tmp.path().join("invalid.json");
        fs::write(&invalid, r#"{"max_threads": 0}"#).unwrap();
        assert!(matches!(Config::load(&invalid), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("registry.json");
        let config = Config::new().with_root("suite").with_clear_stale_output(true);

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
