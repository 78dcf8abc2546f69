//! Simulation configuration loaded from TOML.
//!
//! Every section and field is optional in the file; anything left out keeps
//! its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use starharvest_logic::config::{EconomyTuning, HarvestTuning, OfflineTuning};

use crate::error::ConfigError;
use crate::generation::GenerationConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub generation: GenerationConfig,
    pub harvest: HarvestTuning,
    pub offline: OfflineTuning,
    pub economy: EconomyTuning,
}

impl SimConfig {
    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data)
    }

    /// Load `path`, falling back to defaults (with a warning) if it cannot
    /// be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "Failed to load {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SimConfig::from_toml_str("").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SimConfig::from_toml_str(
            r#"
            [generation]
            min_planets = 5
            system_name = "Vega"

            [harvest]
            robot_cooldown_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.min_planets, 5);
        assert_eq!(config.generation.max_planets, 8);
        assert_eq!(config.generation.system_name, "Vega");
        assert_eq!(config.harvest.robot_cooldown_ms, 500);
        assert_eq!(config.harvest.manual_amount, 10);
        assert_eq!(config.offline, OfflineTuning::default());
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(matches!(
            SimConfig::from_toml_str("[harvest]\nrobot_speed = \"fast\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = SimConfig::load_or_default("/nonexistent/starharvest.toml");
        assert_eq!(config, SimConfig::default());
        assert!(matches!(
            SimConfig::from_file("/nonexistent/starharvest.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
