use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

pub const DEFAULT_FRAME_RATE_HZ: f64 = 90.0;

/// Environment variable naming a session file to load at startup.
pub const SESSION_ENV: &str = "VR_PLAYER_SESSION";

/// Environment variable naming the directory sessions are saved into.
pub const SAVE_DIR_ENV: &str = "VR_PLAYER_SAVE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Session file to load when the engine is built.
    pub session_path: Option<PathBuf>,

    /// Where `save` writes to when the caller doesn't say.
    pub save_dir: Option<PathBuf>,

    /// Refresh rate used when the engine paces its own frames.
    pub frame_rate_hz: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_path: None,
            save_dir: None,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }
}

impl EngineConfig {
    /// Default configuration values are sourced from the environment.
    pub fn from_env() -> Self {
        Self {
            session_path: env::var_os(SESSION_ENV).map(PathBuf::from),
            save_dir: env::var_os(SAVE_DIR_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Merges two configurations. Values in `other` take precedence.
    pub fn merge(self, other: Self) -> Self {
        Self {
            session_path: other.session_path.or(self.session_path),
            save_dir: other.save_dir.or(self.save_dir),
            frame_rate_hz: other.frame_rate_hz,
        }
    }
}

pub trait EngineConfigSource: std::fmt::Debug {
    fn read_current(&self) -> Result<EngineConfig, EngineError>;
}

/// Reads a JSON file off disk every time `read_current` is called, layered over the
/// environment defaults.
#[derive(Debug, Clone)]
pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EngineConfigSource for JsonFileConfig {
    fn read_current(&self) -> Result<EngineConfig, EngineError> {
        let txt = fs::read_to_string(&self.path).map_err(|e| EngineError::ConfigIo(format!("{}: {e}", self.path.display())))?;
        let file_config = serde_json::from_str::<EngineConfig>(&txt)
            .map_err(|e| EngineError::ConfigParse(format!("{}: {e}", self.path.display())))?;

        Ok(EngineConfig::from_env().merge(file_config))
    }
}
