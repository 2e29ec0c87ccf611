// Tue Jan 13 2026 - Alex

use crate::unit::{SkipReason, UnitDescriptor, UnitOutcome};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::PathBuf;

/// Keeps every unit outcome of a pass, keyed by unit path in discovery order.
pub struct OutcomeCollector {
    outcomes: IndexMap<PathBuf, UnitOutcome>,
}

impl OutcomeCollector {
    pub fn new() -> Self {
        Self {
            outcomes: IndexMap::new(),
        }
    }

    pub fn collect(&mut self, outcome: UnitOutcome) {
        if let Some(reason) = outcome.skip_reason() {
            if reason.is_error() {
                log::debug!("Skipping unit {:?}: {}", outcome.unit.path(), reason);
            } else {
                log::trace!("Excluding unit {:?}: {}", outcome.unit.path(), reason);
            }
        }

        self.outcomes.insert(outcome.unit.path().to_path_buf(), outcome);
    }

    pub fn collect_all(&mut self, outcomes: Vec<UnitOutcome>) {
        for outcome in outcomes {
            self.collect(outcome);
        }
    }

    pub fn skipped(&self) -> Vec<SkippedUnit> {
        self.outcomes
            .values()
            .filter_map(|outcome| {
                outcome.skip_reason().map(|reason| SkippedUnit {
                    unit: outcome.unit.clone(),
                    reason: reason.clone(),
                })
            })
            .collect()
    }

    pub fn summary(&self) -> CollectionSummary {
        let mut summary = CollectionSummary {
            discovered: self.outcomes.len(),
            ..CollectionSummary::default()
        };

        let mut ids = HashSet::new();
        for outcome in self.outcomes.values() {
            match &outcome.result {
                Ok(id) if ids.insert(id.as_str()) => summary.accepted += 1,
                Ok(_) => summary.duplicates += 1,
                Err(reason) if reason.is_error() => summary.failed += 1,
                Err(_) => summary.filtered += 1,
            }
        }

        summary
    }
}

impl Default for OutcomeCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    pub unit: UnitDescriptor,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub discovered: usize,
    /// Distinct ids retained; matches the document's record count.
    pub accepted: usize,
    /// Accepted units whose id was already taken by another unit.
    pub duplicates: usize,
    pub filtered: usize,
    pub failed: usize,
}

impl CollectionSummary {
    pub fn display(&self) -> String {
        format!(
            "Discovered: {}, Accepted: {}, Duplicates: {}, Filtered: {}, Failed: {}",
            self.discovered, self.accepted, self.duplicates, self.filtered, self.failed
        )
    }
}
