//! Editor configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default key of the persisted line-set blob.
pub const DEFAULT_STORAGE_KEY: &str = "gridsketch.lines";

/// Default quiet window before an autosave write, in milliseconds.
pub const DEFAULT_AUTOSAVE_QUIET_MS: u64 = 1000;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "GRIDSKETCH_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("Invalid config JSON: {0}")]
    Parse(String),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunables for snapping, persistence and the initial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snap and pick radius in screen pixels (divided by zoom before use).
    pub snap_threshold_px: f64,
    /// Time without changes before the autosave writes.
    pub autosave_quiet_ms: u64,
    /// Key of the persisted blob.
    pub storage_key: String,
    /// Start with the grid visible.
    pub show_grid: bool,
    /// Start in fine grid mode.
    pub fine_grid: bool,
    /// Start with length labels visible.
    pub show_labels: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold_px: 10.0,
            autosave_quiet_ms: DEFAULT_AUTOSAVE_QUIET_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            show_grid: true,
            fine_grid: false,
            show_labels: true,
        }
    }
}

impl EditorConfig {
    /// Load and validate a JSON config file. Missing fields take defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `path` if it exists, else defaults. Failures are logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {}", e);
                Self::default()
            }
        }
    }

    /// Config file location: `$GRIDSKETCH_CONFIG`, else
    /// `<config dir>/gridsketch/gridsketch.json`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("gridsketch").join("gridsketch.json"))
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.snap_threshold_px.is_finite() || self.snap_threshold_px <= 0.0 {
            return Err(ConfigError::Invalid(
                "snap_threshold_px must be > 0".to_string(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn autosave_quiet_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_quiet_ms)
    }
}
