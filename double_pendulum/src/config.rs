use crate::{parameters::PendulumParameters, symbolic_state::StatePrefixes};
use ron::{
    from_str,
    ser::{PrettyConfig, to_string_pretty},
};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigErrors {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Latex,
}

/// Numeric joint angles and rates used by `evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericState {
    pub q: Vec<f64>,
    pub v: Vec<f64>,
}

impl Default for NumericState {
    fn default() -> Self {
        Self {
            q: vec![0.5, -0.25],
            v: vec![1.0, 0.5],
        }
    }
}

/// Everything a run needs: symbol names, numeric values and output format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    pub symbols: PendulumParameters<String>,
    pub state_prefixes: StatePrefixes,
    pub parameters: PendulumParameters<f64>,
    pub state: NumericState,
    pub format: OutputFormat,
}

impl PendulumConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let config = from_str(&contents)?;
        debug!(?path, "loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigErrors> {
        let ron_string = to_string_pretty(self, PrettyConfig::new())?;
        let mut file = File::create(path)?;
        file.write_all(ron_string.as_bytes())?;
        debug!(?path, "saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("double_pendulum_config_test.ron");
        let mut config = PendulumConfig::default();
        config.symbols.g = "g0".to_string();
        config.parameters.m2 = 2.5;
        config.format = OutputFormat::Latex;
        config.save(&path).unwrap();
        let loaded = PendulumConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PendulumConfig = from_str("(format: Latex)").unwrap();
        assert_eq!(config.format, OutputFormat::Latex);
        assert_eq!(config.symbols, PendulumParameters::<String>::default());
        assert_eq!(config.state, NumericState::default());
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("double_pendulum_missing_config.ron");
        assert!(matches!(
            PendulumConfig::load(&path),
            Err(ConfigErrors::Io(_))
        ));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join("double_pendulum_malformed_config.ron");
        std::fs::write(&path, "(symbols: 3").unwrap();
        let result = PendulumConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigErrors::Parse(_))));
    }
}
