//! Simulation configuration
//!
//! Loaded from `sim.ron` (working directory first, then the platform config
//! directory), falling back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::combat::log::LogMode;
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "sim.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for target selection and crit rolls (entropy when absent)
    pub seed: Option<u64>,
    /// Safety cap; a fight reaching it ends as a draw
    pub max_ticks: u64,
    /// Simulated second at which the sandstorm begins
    pub sandstorm_start_secs: f64,
    pub log_mode: LogMode,
    /// Default number of fights per analysis
    pub runs: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 6000,
            sandstorm_start_secs: 30.0,
            log_mode: LogMode::Off,
            runs: 100,
        }
    }
}

impl SimConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Look for `sim.ron` in the usual places; defaults if none exists
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "bazaar-sim") {
            paths.push(dirs.config_dir().join(CONFIG_FILE));
        }
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid("max_ticks must be positive".to_string()));
        }
        if !self.sandstorm_start_secs.is_finite() || self.sandstorm_start_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sandstorm_start_secs must be a non-negative number, got {}",
                self.sandstorm_start_secs
            )));
        }
        Ok(())
    }
}
