//! Configuration management (<config dir>/config.toml)
//!
//! ```toml
//! [export]
//! swap_axis = "xz-y"
//! ```
//!
//! A missing or unreadable file never stops an export: defaults are used and
//! the problem is logged. The axis mode is kept as written and only resolved
//! when an export needs it, so an unsupported value fails that export instead
//! of being replaced by the default.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::axis::AxisMode;
use crate::error::ExportError;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Axis remapping name (`xyz`, `xzy`, `xz-y`, `-xzy`)
    #[serde(default = "default_swap_axis")]
    pub swap_axis: String,
}

fn default_swap_axis() -> String {
    AxisMode::default().name().to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            swap_axis: default_swap_axis(),
        }
    }
}

/// Error type for reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl Config {
    /// Load from `path`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write)?;
        }
        std::fs::write(path, content).map_err(write)
    }

    /// Resolve the configured axis mode
    pub fn axis_mode(&self) -> Result<AxisMode, ExportError> {
        self.export.swap_axis.parse()
    }

    /// Validate and store a new axis mode, normalized to its short name
    pub fn set_swap_axis(&mut self, value: &str) -> Result<AxisMode, ExportError> {
        let mode: AxisMode = value.parse()?;
        self.export.swap_axis = mode.name().to_string();
        Ok(mode)
    }
}

pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "tetgen", "tetgen-export")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of the config file, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Load `path` (or the default location), falling back to defaults
///
/// An absent file is normal. An unreadable or corrupt one is logged and
/// ignored.
pub fn load_or_default(path: Option<&Path>) -> Config {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        tracing::debug!("No config directory available, using defaults");
        return Config::default();
    };

    match Config::load_from(&path) {
        Ok(config) => {
            tracing::debug!("Loaded config from {:?}", path);
            config
        }
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No config at {:?}, using defaults", path);
            Config::default()
        }
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            Config::default()
        }
    }
}
