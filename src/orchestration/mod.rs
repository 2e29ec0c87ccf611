// Tue Jan 13 2026 - Alex

pub mod coordinator;
pub mod discovery;
pub mod scheduler;
pub mod collector;
pub mod aggregator;
pub mod finalizer;

pub use coordinator::{DiscoveryReport, PassState, RegistryCoordinator};
pub use discovery::DirectoryWalker;
pub use scheduler::UnitScheduler;
pub use collector::{CollectionSummary, OutcomeCollector, SkippedUnit};
pub use aggregator::{Registry, RegistryAggregator};
pub use finalizer::{Finalized, OutputFinalizer};
