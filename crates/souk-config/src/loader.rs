// Souk - Marketplace Client Core
// Copyright (C) 2026 Souk Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Configuration loading

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use crate::validation::Validator;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::InvalidPath(path.to_path_buf())),
        }
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    validate: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        ConfigLoader { validate: true }
    }

    /// Create a loader without validation
    pub fn without_validation() -> Self {
        ConfigLoader { validate: false }
    }

    /// Load configuration from a file
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).await?;
        let format = ConfigFormat::from_path(path)?;

        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
        };

        if self.validate {
            config.validate()?;
        }

        info!("Loaded {} configuration from {}", format.name(), path.display());
        Ok(config)
    }

    /// Load configuration from a file and apply `SOUK_*` environment
    /// variable overrides.
    ///
    /// Recognized variables:
    /// - `SOUK_BASE_URL`
    /// - `SOUK_B2_KEY_ID`, `SOUK_B2_APPLICATION_KEY`
    /// - `SOUK_B2_BUCKET_ID`, `SOUK_B2_BUCKET_NAME`
    /// - `SOUK_PLACES_API_KEY`
    /// - `SOUK_LOG_LEVEL`, `SOUK_LOG_FORMAT`
    pub async fn load_with_overrides<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Config> {
        // Validation runs after overrides, not on the raw file.
        let loader = ConfigLoader::without_validation();
        let mut config = loader.load_file(path).await?;

        apply_env_overrides(&mut config);

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Produce a `Config` from environment variables alone, on top of defaults.
    pub fn from_env(&self) -> ConfigResult<Config> {
        let mut config = Config::default();
        apply_env_overrides(&mut config);

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }
}

fn apply_env_overrides(config: &mut Config) {
    let overrides: [(&str, &mut String); 8] = [
        ("SOUK_BASE_URL", &mut config.backend.base_url),
        ("SOUK_B2_KEY_ID", &mut config.b2.key_id),
        ("SOUK_B2_APPLICATION_KEY", &mut config.b2.application_key),
        ("SOUK_B2_BUCKET_ID", &mut config.b2.bucket_id),
        ("SOUK_B2_BUCKET_NAME", &mut config.b2.bucket_name),
        ("SOUK_PLACES_API_KEY", &mut config.places.api_key),
        ("SOUK_LOG_LEVEL", &mut config.logging.level),
        ("SOUK_LOG_FORMAT", &mut config.logging.format),
    ];

    for (var, slot) in overrides {
        if let Ok(value) = std::env::var(var) {
            debug!("Applying environment override: {}", var);
            *slot = value;
        }
    }
}
