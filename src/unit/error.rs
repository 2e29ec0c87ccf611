// Tue Jan 13 2026 - Alex

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a discovered unit did not make it into the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("Failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("Unit file {path:?} is {size} bytes (limit {limit})")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Entry point not found: {0}")]
    MissingEntryPoint(String),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Invalid field {field}: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Import escapes unit directory: {0}")]
    ImportEscapesDirectory(String),
    #[error("Import cycle through {0}")]
    ImportCycle(String),
    #[error("Import nesting deeper than {0}")]
    ImportDepth(usize),
    #[error("Loader panicked: {0}")]
    Panicked(String),
    #[error("Excluded: {0}")]
    Filtered(FilterReason),
}

impl SkipReason {
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        SkipReason::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Filtered units are not faults.
    pub fn is_error(&self) -> bool {
        !matches!(self, SkipReason::Filtered(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterReason {
    Hidden,
    MissingProduct,
    MissingFeature,
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterReason::Hidden => write!(f, "not shown to user"),
            FilterReason::MissingProduct => write!(f, "no product declared"),
            FilterReason::MissingFeature => write!(f, "no feature declared"),
        }
    }
}
