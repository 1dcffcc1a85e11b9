//! # Engine-level settings
//!
//! A second, smaller TOML configuration surface alongside the XML
//! simulation/state document: thread count for the parallel batch
//! operations ([`crate::liouvillean::Liouvillean::update_all`] and initial-
//! condition generation), log verbosity, the run's event-count/wall-clock
//! budget, and the RNG seed. `spec.md` never names this file, but §5's
//! "Cancellation / timeouts" and §2's parallel-batch carve-out both need
//! somewhere to live outside the physics document.

use crate::error::EdmdError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine-level run configuration, independent of the physics document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Thread count for `rayon`'s global pool, used by the two batch
    /// operations explicitly permitted to parallelise (§5).
    #[serde(default = "EngineSettings::default_threads")]
    pub threads: usize,
    /// `env_logger` filter string, e.g. `"info"`, `"dynamica=debug"`.
    #[serde(default = "EngineSettings::default_log_level")]
    pub log_level: String,
    /// Stop the run after this many executed events, if set.
    #[serde(default)]
    pub max_events: Option<u64>,
    /// Stop the run after this many wall-clock seconds, if set.
    #[serde(default)]
    pub max_wall_clock_secs: Option<u64>,
    /// RNG seed for thermostat draws and initial-condition generation.
    #[serde(default = "EngineSettings::default_seed")]
    pub seed: u64,
}

impl EngineSettings {
    fn default_threads() -> usize {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }

    fn default_log_level() -> String {
        "info".to_string()
    }

    fn default_seed() -> u64 {
        0
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            threads: EngineSettings::default_threads(),
            log_level: EngineSettings::default_log_level(),
            max_events: None,
            max_wall_clock_secs: None,
            seed: EngineSettings::default_seed(),
        }
    }
}

/// Loads [`EngineSettings`] from a TOML file, falling back to all defaults
/// if `path` does not exist.
pub fn load(path: &Path) -> Result<EngineSettings, EdmdError> {
    if !path.exists() {
        return Ok(EngineSettings::default());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| EdmdError::Io(Box::new(e)))?;
    toml::from_str(&text).map_err(|e| EdmdError::ConfigError(format!("invalid engine settings: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load(Path::new("/nonexistent/engine.toml")).unwrap();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.max_events, None);
    }

    #[test]
    fn parses_partial_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "max_events = 1000\nseed = 42\n").unwrap();

        let settings = load(&path).unwrap();
        assert_eq!(settings.max_events, Some(1000));
        assert_eq!(settings.seed, 42);
        // threads/log_level fall back to their defaults.
        assert_eq!(settings.log_level, "info");
    }
}
