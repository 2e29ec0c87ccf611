// Tue Jan 13 2026 - Alex

use crate::config::Config;
use crate::error::RegistryError;
use crate::orchestration::aggregator::RegistryAggregator;
use crate::orchestration::collector::{CollectionSummary, OutcomeCollector, SkippedUnit};
use crate::orchestration::discovery::DirectoryWalker;
use crate::orchestration::finalizer::{Finalized, OutputFinalizer};
use crate::orchestration::scheduler::UnitScheduler;
use crate::output::{RegistryDocument, XmlSerializer};
use crate::unit::{DescriptorLoader, MetadataExtractor, SkipReason, UnitDescriptor, UnitLoader, UnitMetadata};
use crate::utils::logging::ScopedTimer;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Walking,
    Loading,
    Aggregated,
    Serialized,
    Empty,
}

/// Result of one discovery pass, including why units were left out.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub document: Option<RegistryDocument>,
    pub written_to: Option<PathBuf>,
    pub summary: CollectionSummary,
    pub skipped: Vec<SkippedUnit>,
    pub final_state: PassState,
}

/// Drives a full pass: walk, load, extract, aggregate, serialize, finalize.
pub struct RegistryCoordinator {
    config: Arc<Config>,
    walker: DirectoryWalker,
    loader: Arc<dyn UnitLoader>,
    extractor: MetadataExtractor,
    scheduler: UnitScheduler,
    serializer: XmlSerializer,
    finalizer: OutputFinalizer,
    progress: Option<ProgressBar>,
}

impl RegistryCoordinator {
    pub fn new(config: Config) -> Result<Self, RegistryError> {
        config.validate()?;

        let walker = DirectoryWalker::from_config(&config);
        let loader: Arc<dyn UnitLoader> = Arc::new(DescriptorLoader::from_config(&config));
        let extractor = MetadataExtractor::new(&config.entry_point);
        let scheduler = UnitScheduler::from_config(&config);
        let finalizer = OutputFinalizer::from_config(&config);

        Ok(Self {
            config: Arc::new(config),
            walker,
            loader,
            extractor,
            scheduler,
            serializer: XmlSerializer::new(),
            finalizer,
            progress: None,
        })
    }

    pub fn with_loader(mut self, loader: Arc<dyn UnitLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.scheduler = self.scheduler.with_progress(progress.clone());
        self.progress = Some(progress);
        self
    }

    /// Runs a pass. With `write_to_file` the document goes to the configured
    /// output file and `None` is returned; otherwise the document itself is
    /// returned. An empty registry yields `None` either way.
    pub fn build(&self, write_to_file: bool) -> Result<Option<RegistryDocument>, RegistryError> {
        Ok(self.discover(write_to_file)?.document)
    }

    pub fn build_document(&self) -> Result<Option<RegistryDocument>, RegistryError> {
        self.build(false)
    }

    pub fn discover(&self, write_to_file: bool) -> Result<DiscoveryReport, RegistryError> {
        let _timer = ScopedTimer::new("registry discovery");
        let mut state = PassState::Idle;

        state = self.advance(state, PassState::Walking);
        let units = self.walk_units()?;
        log::info!("Found {} unit files under {:?}", units.len(), self.config.root);

        state = self.advance(state, PassState::Loading);
        let aggregator = RegistryAggregator::new();
        let order: std::collections::HashMap<PathBuf, usize> = units
            .iter()
            .enumerate()
            .map(|(i, unit)| (unit.path().to_path_buf(), i))
            .collect();

        let outcomes = self
            .scheduler
            .run(units, |unit| {
                self.process_unit(unit).map(|metadata| {
                    let id = metadata.id.clone();
                    aggregator.merge(order.get(unit.path()).copied().unwrap_or(0), metadata);
                    id
                })
            })
            .map_err(RegistryError::WorkerPool)?;

        let mut collector = OutcomeCollector::new();
        collector.collect_all(outcomes);
        let summary = collector.summary();
        log::info!("{}", summary.display());

        state = self.advance(state, PassState::Aggregated);
        let registry = aggregator.into_registry();
        let document = self.serializer.serialize(&registry);

        let finalized = self.finalizer.finalize(document, write_to_file)?;
        let final_state = match finalized {
            Finalized::Empty => PassState::Empty,
            Finalized::Document(_) | Finalized::Written(_) => PassState::Serialized,
        };
        self.advance(state, final_state);

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        let written_to = match &finalized {
            Finalized::Written(path) => Some(path.clone()),
            _ => None,
        };

        Ok(DiscoveryReport {
            document: finalized.into_document(),
            written_to,
            summary,
            skipped: collector.skipped(),
            final_state,
        })
    }

    /// Loads and extracts a single unit. Never touches shared state.
    pub fn process_unit(&self, unit: &UnitDescriptor) -> Result<UnitMetadata, SkipReason> {
        let loaded = self.loader.load(unit)?;
        self.extractor.extract(&loaded)
    }

    fn walk_units(&self) -> Result<Vec<UnitDescriptor>, RegistryError> {
        self.list_units(self.walker.walk(&self.config.root))
    }

    /// A directory that cannot be listed ends the pass.
    fn list_units<I>(&self, dirs: I) -> Result<Vec<UnitDescriptor>, RegistryError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut units = Vec::new();

        for dir in dirs {
            let found = self
                .walker
                .list_unit_files(&dir)
                .map_err(|source| RegistryError::Discovery { path: dir.clone(), source })?;
            units.extend(found);
        }

        Ok(units)
    }

    fn advance(&self, from: PassState, to: PassState) -> PassState {
        log::debug!("Discovery pass {:?} -> {:?}", from, to);
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::LoadedUnit;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const VISIBLE: &str = r#"{"TestCase": {"name": "a", "product": "P", "feature": "F", "show_to_user": true, "tcinputs": {"x": null}}}"#;

    fn coordinator(root: &Path) -> RegistryCoordinator {
        RegistryCoordinator::new(Config::new().with_root(root).with_output_file(root.join("out.xml"))).unwrap()
    }

    struct PanickingLoader;

    impl UnitLoader for PanickingLoader {
        fn load(&self, unit: &UnitDescriptor) -> Result<LoadedUnit, SkipReason> {
            if unit.id == "C" {
                panic!("loader crashed");
            }
            DescriptorLoader::new().load(unit)
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(matches!(
            RegistryCoordinator::new(Config::new().with_max_threads(0)),
            Err(RegistryError::Config(_))
        ));
    }

    #[test]
    fn test_state_and_report() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.unit"), VISIBLE).unwrap();
        fs::write(tmp.path().join("B.unit"), r#"{"TestCase": {"name": "b", "show_to_user": false}}"#).unwrap();

        let report = coordinator(tmp.path()).discover(false).unwrap();
        assert_eq!(report.final_state, PassState::Serialized);
        assert_eq!(report.summary.discovered, 2);
        assert_eq!(report.summary.accepted, 1);
        assert_eq!(report.summary.filtered, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].unit.id, "B");
        assert!(report.written_to.is_none());
        assert_eq!(report.document.unwrap().unit_count(), 1);
    }

    #[test]
    fn test_empty_state() {
        let tmp = TempDir::new().unwrap();
        let report = coordinator(tmp.path()).discover(true).unwrap();
        assert_eq!(report.final_state, PassState::Empty);
        assert!(report.document.is_none());
        assert!(!tmp.path().join("out.xml").exists());
    }

    #[test]
    fn test_written_report() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.unit"), VISIBLE).unwrap();

        let report = coordinator(tmp.path()).discover(true).unwrap();
        assert!(report.document.is_none());
        assert_eq!(report.written_to, Some(tmp.path().join("out.xml")));
        assert!(tmp.path().join("out.xml").exists());
    }

    #[test]
    fn test_panicking_loader_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.unit"), VISIBLE).unwrap();
        fs::write(tmp.path().join("C.unit"), VISIBLE).unwrap();

        let report = coordinator(tmp.path())
            .with_loader(Arc::new(PanickingLoader))
            .discover(false)
            .unwrap();

        assert_eq!(report.summary.accepted, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::Panicked(_)));
    }

    #[test]
    fn test_process_unit() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.unit"), VISIBLE).unwrap();

        let unit = UnitDescriptor::new("A", tmp.path(), ".unit");
        let metadata = coordinator(tmp.path()).process_unit(&unit).unwrap();
        assert_eq!(metadata.input_names(), vec!["x"]);
    }

    #[test]
    fn test_progress_counts_units() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.unit"), VISIBLE).unwrap();
        fs::write(tmp.path().join("B.unit"), "broken").unwrap();
        fs::write(tmp.path().join("C.unit"), VISIBLE).unwrap();

        let progress = ProgressBar::hidden();
        coordinator(tmp.path())
            .with_loader(Arc::new(PanickingLoader))
            .with_progress(progress.clone())
            .discover(false)
            .unwrap();
        assert_eq!(progress.position(), 3);
    }

    #[test]
    fn test_missing_root_builds_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("no-such-suite");

        let coordinator = coordinator(&root);
        assert!(coordinator.build(false).unwrap().is_none());
        assert!(coordinator.build(true).unwrap().is_none());
        assert!(!root.exists());
    }

    #[test]
    fn test_unlistable_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("removed");

        let err = coordinator(tmp.path())
            .list_units(vec![tmp.path().to_path_buf(), gone.clone()])
            .unwrap_err();
        match err {
            RegistryError::Discovery { path, .. } => assert_eq!(path, gone),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_counted_once() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("A.unit"), VISIBLE).unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("A.unit"), VISIBLE).unwrap();

        let report = coordinator(tmp.path()).discover(false).unwrap();
        assert_eq!(report.summary.discovered, 2);
        assert_eq!(report.summary.accepted, 1);
        assert_eq!(report.summary.duplicates, 1);
        assert_eq!(report.document.unwrap().unit_count(), report.summary.accepted);
    }
}
