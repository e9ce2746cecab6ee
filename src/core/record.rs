//! Mutable observation record the enricher writes into

use super::units::UnitSystem;
use std::collections::HashMap;

/// One polling cycle's record: observation name to numeric value, tagged
/// with the unit system every value is expressed in.
///
/// The host supplies a record per tick; the enricher mutates it in place
/// and never replaces it.
#[derive(Debug, Clone)]
pub struct Record {
    unit_system: UnitSystem,
    values: HashMap<String, f64>,
}

impl Record {
    /// Creates an empty record declared in `unit_system`.
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            values: HashMap::new(),
        }
    }

    /// The unit system this record's values are expressed in.
    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// Assigns an observation value, overwriting any prior one.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Looks up an observation value.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of observations present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no observation has been assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over (name, value) pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
