//! User configuration, read from `~/.config/keycalc/config.toml`.
//!
//! Every field is optional. A missing default config file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::editor::{EditSettings, TrailingOperatorPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub display: DisplayConfig,
    pub evaluate: EvaluateConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub multiply_glyph: char,
    pub divide_glyph: char,
    pub error_text: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvaluateConfig {
    pub clear_expression_on_success: bool,
    pub trailing_operator: TrailingOperatorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            display: DisplayConfig::default(),
            evaluate: EvaluateConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let settings = EditSettings::default();
        Self {
            multiply_glyph: settings.multiply_glyph,
            divide_glyph: settings.divide_glyph,
            error_text: settings.error_text,
        }
    }
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        let settings = EditSettings::default();
        Self {
            clear_expression_on_success: settings.clear_expression_on_success,
            trailing_operator: settings.trailing_operator,
        }
    }
}

impl Config {
    /// Default location of the config file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keycalc").join("config.toml"))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load a config file that must exist.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load the config from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Settings for the edit buffer.
    pub fn edit_settings(&self) -> EditSettings {
        EditSettings {
            multiply_glyph: self.display.multiply_glyph,
            divide_glyph: self.display.divide_glyph,
            error_text: self.display.error_text.clone(),
            clear_expression_on_success: self.evaluate.clear_expression_on_success,
            trailing_operator: self.evaluate.trailing_operator,
        }
    }
}
