//! # Configuration & state I/O
//!
//! The external interface boundary (`spec.md` §6): the tree-structured
//! XML config/state document ([`xml`]), the base64 binary particle codec it
//! embeds ([`binary`]), unit rescaling ([`units`]), and a companion
//! engine-level TOML settings file ([`toml_settings`]) that is *not* part of
//! the physics document at all.

pub mod binary;
pub mod toml_settings;
pub mod units;
pub mod xml;

pub use toml_settings::EngineSettings;
pub use units::Units;
pub use xml::{LoadedConfig, SimulationDocument};

use crate::error::EdmdError;
use std::path::Path;

/// Loads a [`SimulationDocument`] from `path` and converts it into a
/// [`LoadedConfig`] ready to build a [`crate::simulation::Simulation`].
pub fn load_simulation_document(path: &Path, seed: u64) -> Result<(SimulationDocument, LoadedConfig), EdmdError> {
    let text = std::fs::read_to_string(path).map_err(|e| EdmdError::Io(Box::new(e)))?;
    let doc = xml::load_xml(&text)?;
    let loaded = xml::build_simulation_params(&doc, seed)?;
    Ok((doc, loaded))
}

/// Writes `doc` (typically produced by [`xml::with_updated_particles`]) to
/// `path` as XML text.
pub fn save_simulation_document(doc: &SimulationDocument, path: &Path) -> Result<(), EdmdError> {
    let text = xml::save_xml(doc)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EdmdError::Io(Box::new(e)))?;
    }
    std::fs::write(path, text).map_err(|e| EdmdError::Io(Box::new(e)))
}

/// Builds a running [`crate::simulation::Simulation`] from a [`LoadedConfig`],
/// honouring the document's scheduler-sorter choice.
pub fn build_simulation(loaded: LoadedConfig) -> Result<crate::simulation::Simulation, EdmdError> {
    crate::simulation::Simulation::new_with_scheduler(loaded.params, loaded.scheduler)
}
