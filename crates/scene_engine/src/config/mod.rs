//! Configuration system
//!
//! Game settings are plain serde structs. Any of them can be loaded from or
//! saved to `.toml` or `.ron` through the [`Config`] trait.

use std::path::{Path, PathBuf};

pub use serde::{Serialize, Deserialize};

/// Default fixed update step: 50 updates per second
pub const DEFAULT_UPDATE_TIMESTEP: f64 = 1.0 / 50.0;

/// Default cap on fixed updates run in one frame
pub const DEFAULT_MAX_UPDATES: u32 = 60;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            Some("ron") => {
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Fixed-timestep settings of the loop driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds simulated by one update
    pub update_timestep: f64,
    /// Most updates run in a single frame; extra lag carries over
    pub max_updates: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            update_timestep: DEFAULT_UPDATE_TIMESTEP,
            max_updates: DEFAULT_MAX_UPDATES,
        }
    }
}

impl TimingConfig {
    /// Timing that runs `rate` updates per second
    pub fn with_update_rate(rate: f64) -> Self {
        Self {
            update_timestep: 1.0 / rate,
            ..Default::default()
        }
    }

    /// Reject non-positive or non-finite timesteps and a zero update cap
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.update_timestep.is_finite() || self.update_timestep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "update_timestep must be a positive number of seconds, got {}",
                self.update_timestep
            )));
        }
        if self.max_updates == 0 {
            return Err(ConfigError::Invalid("max_updates must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Asset lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directories tried, in order, for relative image paths
    pub search_paths: Vec<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from("resources")],
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// `RUST_LOG`-style filter applied when the host initializes logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    /// Loop timing
    pub timing: TimingConfig,
    /// Asset lookup
    pub assets: AssetConfig,
}

impl GameConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()
    }
}

impl Config for GameConfig {}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Value out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
