//! Loading and saving [`MapConfig`] files.
//!
//! The format follows the file extension: `.json` goes through serde_json,
//! `.toml` through toml. Loaded configs are validated before they are returned.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::{ConfigError, MapConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported config extension for {path}, expected .json or .toml")]
    UnknownFormat { path: String },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("could not encode TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("config rejected: {0}")]
    Invalid(#[from] ConfigError),
}

pub fn parse_config(text: &str, format: ConfigFormat) -> Result<MapConfig, ConfigFileError> {
    let config: MapConfig = match format {
        ConfigFormat::Json => serde_json::from_str(text)?,
        ConfigFormat::Toml => toml::from_str(text)?,
    };
    config.validate()?;
    Ok(config)
}

pub fn load_config_from_file(path: &Path) -> Result<MapConfig, ConfigFileError> {
    let format = format_for(path)?;
    let text = fs::read_to_string(path)?;
    parse_config(&text, format)
}

pub fn save_config_to_file(config: &MapConfig, path: &Path) -> Result<(), ConfigFileError> {
    let format = format_for(path)?;
    let text = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

fn format_for(path: &Path) -> Result<ConfigFormat, ConfigFileError> {
    ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigFileError::UnknownFormat { path: path.display().to_string() })
}
