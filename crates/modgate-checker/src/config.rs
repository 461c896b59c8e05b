//! Checker configuration (modgate.toml)

use crate::visibility::NoModulePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Well-formed but invalid value
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Settings for a checking run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CheckerConfig {
    /// Treatment of internal symbols owned by no module
    pub no_module_policy: NoModulePolicy,

    /// Report public declarations whose signature names an internal symbol
    pub signature_exposure: bool,

    /// Worker threads for per-unit phases (defaults to the CPU count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            no_module_policy: NoModulePolicy::Deny,
            signature_exposure: true,
            jobs: None,
        }
    }
}

impl CheckerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: CheckerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate values serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == Some(0) {
            return Err(ConfigError::ValidationError(
                "jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of worker threads to use
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }
}
