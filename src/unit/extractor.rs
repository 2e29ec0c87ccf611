// Tue Jan 13 2026 - Alex

use super::loader::{merge_defaults, INPUTS_KEY};
use super::{FilterReason, InputSpec, LoadedUnit, SkipReason, UnitMetadata};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DEFAULT_ENTRY_POINT: &str = "TestCase";

/// Reads declared metadata off a unit's entry point and applies the inclusion filter.
pub struct MetadataExtractor {
    entry_point: String,
}

impl MetadataExtractor {
    pub fn new(entry_point: &str) -> Self {
        Self {
            entry_point: entry_point.to_string(),
        }
    }

    pub fn extract(&self, unit: &LoadedUnit) -> Result<UnitMetadata, SkipReason> {
        let entry = self.instantiate(unit)?;

        let display_name = match entry.get("name") {
            Some(Value::String(name)) => name.clone(),
            None | Some(Value::Null) => return Err(SkipReason::MissingField("name")),
            Some(_) => {
                return Err(SkipReason::InvalidField {
                    field: "name",
                    expected: "string",
                })
            }
        };

        let inputs = read_inputs(&entry)?;
        let product = optional_string(&entry, "product")?;
        let feature = optional_string(&entry, "feature")?;
        let applicable_os = optional_string(&entry, "applicable_os")?.unwrap_or_default();
        let visible = optional_bool(&entry, "show_to_user")?.unwrap_or(false);

        let (product, feature) = check_inclusion(visible, product, feature)
            .map_err(SkipReason::Filtered)?;

        Ok(UnitMetadata {
            id: unit.descriptor.id.clone(),
            display_name,
            inputs,
            product,
            feature,
            applicable_os,
            visible,
        })
    }

    /// Imported defaults first, then the entry point's own fields on top.
    fn instantiate(&self, unit: &LoadedUnit) -> Result<Map<String, Value>, SkipReason> {
        let declared = match unit.namespace.get(&self.entry_point) {
            Some(Value::Object(map)) => map,
            _ => return Err(SkipReason::MissingEntryPoint(self.entry_point.clone())),
        };

        let mut entry = unit.defaults.clone();
        merge_defaults(&mut entry, declared);
        Ok(entry)
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_POINT)
    }
}

pub fn check_inclusion(
    visible: bool,
    product: Option<String>,
    feature: Option<String>,
) -> Result<(String, String), FilterReason> {
    if !visible {
        return Err(FilterReason::Hidden);
    }

    let product = product
        .filter(|p| !p.is_empty())
        .ok_or(FilterReason::MissingProduct)?;
    let feature = feature
        .filter(|f| !f.is_empty())
        .ok_or(FilterReason::MissingFeature)?;

    Ok((product, feature))
}

fn read_inputs(entry: &Map<String, Value>) -> Result<HashMap<String, InputSpec>, SkipReason> {
    match entry.get(INPUTS_KEY) {
        None | Some(Value::Null) => Ok(HashMap::new()),
        Some(Value::Object(map)) => Ok(map
            .iter()
            .map(|(name, value)| (name.clone(), InputSpec::from_value(value)))
            .collect()),
        Some(_) => Err(SkipReason::InvalidField {
            field: INPUTS_KEY,
            expected: "object",
        }),
    }
}

fn optional_string(entry: &Map<String, Value>, field: &'static str) -> Result<Option<String>, SkipReason> {
    match entry.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SkipReason::InvalidField {
            field,
            expected: "string",
        }),
    }
}

fn optional_bool(entry: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, SkipReason> {
    match entry.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(SkipReason::InvalidField {
            field,
            expected: "bool",
        }),
    }
}
