//! # Species registry
//!
//! A particle's species tag resolves to a mass and an interaction
//! diameter/radius. Most configurations use a single species, so lookups
//! fast-path through a small `Vec` rather than reaching for a `HashMap`.

use crate::error::EdmdError;

/// Physical properties shared by every particle tagged with a given species.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Species {
    /// Particle mass in reduced units.
    pub mass: f64,
    /// Hard-sphere interaction diameter (σ) in reduced units.
    pub diameter: f64,
}

impl Species {
    /// Creates a new species with the given mass and diameter.
    pub fn new(mass: f64, diameter: f64) -> Self {
        Species { mass, diameter }
    }

    /// The default species: unit mass, unit diameter.
    pub fn unit() -> Self {
        Species {
            mass: 1.0,
            diameter: 1.0,
        }
    }

    /// Interaction radius, half the diameter.
    pub fn radius(&self) -> f64 {
        self.diameter * 0.5
    }
}

/// Maps species names to their physical properties.
///
/// A freshly configured registry carries one species named `"Default"` so
/// single-species simulations never have to populate it explicitly.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SpeciesTable {
    entries: Vec<(String, Species)>,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        SpeciesTable {
            entries: vec![("Default".to_string(), Species::unit())],
        }
    }
}

impl SpeciesTable {
    /// An empty table with no species registered.
    pub fn empty() -> Self {
        SpeciesTable { entries: Vec::new() }
    }

    /// Registers (or replaces) a species by name.
    pub fn insert(&mut self, name: impl Into<String>, species: Species) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = species;
        } else {
            self.entries.push((name, species));
        }
    }

    /// Looks up a species by name.
    pub fn get(&self, name: &str) -> Option<Species> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| *s)
    }

    /// Looks up a species by name, surfacing a `ConfigError` for unknown tags.
    pub fn resolve(&self, name: &str) -> Result<Species, EdmdError> {
        self.get(name)
            .ok_or_else(|| EdmdError::ConfigError(format!("unknown species '{name}'")))
    }

    /// The largest interaction diameter over every registered species — the
    /// physical `d_max` the cell grid must support.
    pub fn max_diameter(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, s)| s.diameter)
            .fold(0.0_f64, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_resolves_default_species() {
        let table = SpeciesTable::default();
        let species = table.resolve("Default").unwrap();
        assert_eq!(species, Species::unit());
    }

    #[test]
    fn unknown_species_is_config_error() {
        let table = SpeciesTable::default();
        assert!(matches!(
            table.resolve("Argon"),
            Err(EdmdError::ConfigError(_))
        ));
    }

    #[test]
    fn max_diameter_tracks_largest_species() {
        let mut table = SpeciesTable::empty();
        table.insert("Small", Species::new(1.0, 0.5));
        table.insert("Big", Species::new(2.0, 1.8));
        assert_eq!(table.max_diameter(), 1.8);
    }
}
