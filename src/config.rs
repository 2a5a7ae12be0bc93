//! Engine configuration
//!
//! Startup knobs loaded once from a RON file: pool capacities and the
//! asset root. Capacities are consumed at construction time by
//! `World::from_config` and `TextureLibrary::from_config` and cannot
//! change afterwards - the pools are fixed-size by design.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Engine startup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entities per kind pool
    pub entity_capacity: u32,
    /// Slots in the texture registry
    pub texture_capacity: u32,
    /// Root directory assets are resolved against
    pub asset_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 256,
            texture_capacity: 64,
            asset_dir: "assets".to_string(),
        }
    }
}

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Load configuration from a RON file. A missing file is an
    /// `Io` error; callers that want defaults instead can fall back to
    /// `EngineConfig::default()`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(ron::from_str(&contents)?)
    }

    /// Write configuration as pretty-printed RON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(4);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }
}
