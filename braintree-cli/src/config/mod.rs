//! Configuration module for braintree-cli.
//!
//! Handles loading configuration from a TOML file, applying command line
//! and environment overrides, and building the SDK [`Configuration`].

pub mod file;

use crate::config::file::{EnvironmentSetting, FileConfig};
use braintree_sdk::{Configuration, Environment};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line (or through their environment
/// variables). Each one replaces the file value when set.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub environment: Option<String>,
    pub merchant_id: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub http_strategy: Option<String>,
    pub unsafe_ssl: bool,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new(config_path: Option<impl AsRef<Path>>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, if one was given
    /// 2. Apply overrides
    /// 3. Validate the result
    /// 4. Build the SDK configuration
    pub fn load(&self) -> Result<Configuration, LoadError> {
        let mut file_config = match &self.config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => FileConfig::default(),
        };

        self.apply_overrides(&mut file_config);
        build_configuration(file_config)
    }

    fn apply_overrides(&self, config: &mut FileConfig) {
        let overrides = &self.overrides;
        if let Some(environment) = &overrides.environment {
            config.environment = EnvironmentSetting::Named(environment.clone());
        }
        if let Some(merchant_id) = &overrides.merchant_id {
            config.merchant_id = Some(merchant_id.clone());
        }
        if let Some(public_key) = &overrides.public_key {
            config.public_key = Some(public_key.clone());
        }
        if let Some(private_key) = &overrides.private_key {
            config.private_key = Some(private_key.clone());
        }
        if let Some(http_strategy) = &overrides.http_strategy {
            config.http_strategy = Some(http_strategy.clone());
        }
        if overrides.unsafe_ssl {
            config.use_unsafe_ssl = true;
        }
    }
}

fn build_configuration(file_config: FileConfig) -> Result<Configuration, LoadError> {
    let environment = match file_config.environment {
        EnvironmentSetting::Named(name) => name
            .parse::<Environment>()
            .map_err(|e| LoadError::ValidationError(e.to_string()))?,
        EnvironmentSetting::Custom(environment) => environment,
    };

    let merchant_id = required("merchant_id", file_config.merchant_id)?;
    let public_key = required("public_key", file_config.public_key)?;
    let private_key = required("private_key", file_config.private_key)?;

    let mut config = Configuration::new(environment, merchant_id, public_key, private_key)
        .use_once(file_config.use_once);
    config.set_use_unsafe_ssl(file_config.use_unsafe_ssl);
    config.set_strategy_override(file_config.http_strategy);
    if let Some(secs) = file_config.timeout_secs {
        if secs == 0 {
            return Err(LoadError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        config.set_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

fn required(field: &str, value: Option<String>) -> Result<String, LoadError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LoadError::ValidationError(format!("{field} is required"))),
    }
}
