// Tue Jan 13 2026 - Alex

use crate::unit::UnitMetadata;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Accepted units of one pass, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    units: HashMap<String, UnitMetadata>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry that was replaced, if any.
    pub fn insert(&mut self, metadata: UnitMetadata) -> Option<UnitMetadata> {
        self.units.insert(metadata.id.clone(), metadata)
    }

    pub fn get(&self, id: &str) -> Option<&UnitMetadata> {
        self.units.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.units.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitMetadata> {
        self.units.values()
    }
}

struct AggregatorState {
    registry: Registry,
    order: HashMap<String, usize>,
    replaced: usize,
}

/// Shared sink for accepted units. `merge` is the only mutation and runs under the lock.
pub struct RegistryAggregator {
    state: Mutex<AggregatorState>,
}

impl RegistryAggregator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AggregatorState {
                registry: Registry::new(),
                order: HashMap::new(),
                replaced: 0,
            }),
        }
    }

    /// `order` is the unit's discovery position. For duplicate ids the unit
    /// discovered last wins, however the workers interleave.
    pub fn merge(&self, order: usize, metadata: UnitMetadata) {
        let mut state = self.state.lock();

        let existing = state.order.get(&metadata.id).copied();
        if let Some(existing) = existing {
            state.replaced += 1;
            log::warn!("Duplicate unit id {}; keeping the one discovered last", metadata.id);
            if existing > order {
                return;
            }
        }

        state.order.insert(metadata.id.clone(), order);
        state.registry.insert(metadata);
    }

    pub fn len(&self) -> usize {
        self.state.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duplicate_count(&self) -> usize {
        self.state.lock().replaced
    }

    pub fn into_registry(self) -> Registry {
        self.state.into_inner().registry
    }
}

impl Default for RegistryAggregator {
    fn default() -> Self {
        Self::new()
    }
}
