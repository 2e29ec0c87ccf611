// Tue Jan 13 2026 - Alex

use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a discovery pass. Individual unit problems never surface here.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Discovery failed in {path:?}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to start unit loader pool: {0}")]
    WorkerPool(String),
    #[error("Failed to write registry to {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_discovery_error_keeps_source() {
        let err = RegistryError::Discovery {
            path: PathBuf::from("/suite/fs"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Discovery failed in \"/suite/fs\": denied");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_worker_pool_and_config_messages() {
        let err = RegistryError::WorkerPool("thread spawn failed".to_string());
        assert_eq!(err.to_string(), "Failed to start unit loader pool: thread spawn failed");

        let err: RegistryError = ConfigError::Validation("max_threads must be greater than 0".to_string()).into();
        assert!(matches!(err, RegistryError::Config(_)));
    }
}
