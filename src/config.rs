// Editor configuration loaded from RON

use crate::command::manager::DEFAULT_MAX_HISTORY;
use crate::map::DEFAULT_KEY_COUNT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest supported key count
pub const MAX_KEY_COUNT: u8 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Undo entries kept before the oldest is dropped (0 = unlimited)
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_HISTORY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistoryConfig,

    /// Key count of maps created by a new session
    pub key_count: u8,

    /// Beat divisor a new session starts with
    pub default_beat_snap: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            key_count: DEFAULT_KEY_COUNT,
            default_beat_snap: 4,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a RON document. Missing fields use their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_KEY_COUNT).contains(&self.key_count) {
            return Err(ConfigError::Invalid(format!(
                "key_count must be between 1 and {}, got {}",
                MAX_KEY_COUNT, self.key_count
            )));
        }
        if self.default_beat_snap == 0 {
            return Err(ConfigError::Invalid(
                "default_beat_snap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
