// Tue Jan 15 2026 - Alex

pub mod config;
pub mod error;
pub mod orchestration;
pub mod output;
pub mod unit;
pub mod utils;

pub use config::{Config, ConfigError};
pub use error::{RegistryError, RegistryResult};
pub use orchestration::{DiscoveryReport, PassState, Registry, RegistryCoordinator};
pub use output::{RegistryDocument, XmlSerializer};
pub use unit::{SkipReason, UnitDescriptor, UnitLoader, UnitMetadata};
