use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{HorizonsError, Result};

/// Overrides the resolved data directory. Used by the integration tests
/// and by scripts that keep several planners side by side.
pub const DATA_DIR_ENV: &str = "HORIZONS_DATA_DIR";

/// Application configuration, read from
/// `<config_dir>/horizons/config.yaml` when present.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the local cache. Defaults to the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let Some(path) = config_file_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| HorizonsError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the data directory: the env override wins, then the
    /// config file, then the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = env::var_os(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("horizons"))
            .ok_or_else(|| HorizonsError::Config("no platform data directory".to_string()))
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("horizons").join("config.yaml"))
}
