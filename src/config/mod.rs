//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::RoundRobinSettings;
use crate::templates::{CatalogError, StaticCatalog};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Default best-of per bracket position, used when a match has no explicit best-of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestOfDefaults {
    #[serde(default = "default_three")]
    pub upper: u32,

    #[serde(default = "default_three")]
    pub quarter: u32,

    #[serde(default = "default_three")]
    pub semi: u32,

    /// Winners final and grand final
    #[serde(default = "default_five", rename = "final")]
    pub final_: u32,

    #[serde(default = "default_one")]
    pub lower: u32,

    #[serde(default = "default_one")]
    pub lower_semi: u32,

    #[serde(default = "default_three")]
    pub lower_final: u32,
}

fn default_one() -> u32 {
    1
}

fn default_three() -> u32 {
    3
}

fn default_five() -> u32 {
    5
}

impl Default for BestOfDefaults {
    fn default() -> Self {
        Self {
            upper: default_three(),
            quarter: default_three(),
            semi: default_three(),
            final_: default_five(),
            lower: default_one(),
            lower_semi: default_one(),
            lower_final: default_three(),
        }
    }
}

impl BestOfDefaults {
    fn values(&self) -> [(&'static str, u32); 7] {
        [
            ("upper", self.upper),
            ("quarter", self.quarter),
            ("semi", self.semi),
            ("final", self.final_),
            ("lower", self.lower),
            ("lower_semi", self.lower_semi),
            ("lower_final", self.lower_final),
        ]
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON template catalog; the bundled catalog is used when unset
    #[serde(default)]
    pub templates: Option<PathBuf>,

    #[serde(default)]
    pub best_of: BestOfDefaults,

    #[serde(default)]
    pub round_robin: RoundRobinSettings,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            templates: None,
            best_of: BestOfDefaults::default(),
            round_robin: RoundRobinSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, or defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.best_of.values() {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "best_of.{} must be greater than 0",
                    name
                )));
            }
        }

        if self.round_robin.groups == 0 {
            return Err(ConfigError::ValidationError(
                "round_robin.groups must be greater than 0".to_string(),
            ));
        }

        if self.round_robin.best_of == 0 {
            return Err(ConfigError::ValidationError(
                "round_robin.best_of must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured template catalog.
    pub fn load_catalog(&self) -> Result<StaticCatalog, CatalogError> {
        match &self.templates {
            Some(path) => StaticCatalog::from_file(path),
            None => StaticCatalog::bundled(),
        }
    }
}
