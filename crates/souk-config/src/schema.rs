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

//! Configuration schema

use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Marketplace REST backend
    pub backend: BackendConfig,

    /// Backblaze B2 object storage
    pub b2: B2Config,

    /// Google Places autocomplete/details
    pub places: PlacesConfig,

    /// Media pipeline tuning
    pub media: MediaConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Marketplace REST backend settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API, e.g. `https://api.example.com/api/v1`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Backblaze B2 credentials and bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct B2Config {
    /// Application key ID
    pub key_id: String,

    /// Application key secret
    pub application_key: String,

    /// Bucket ID (needed by `b2_get_upload_url`)
    pub bucket_id: String,

    /// Bucket name (part of every public download URL)
    pub bucket_name: String,
}

/// Google Places settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacesConfig {
    /// API key
    pub api_key: String,

    /// Country restriction for autocomplete predictions
    pub country: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        PlacesConfig {
            api_key: String::new(),
            country: "in".to_string(),
        }
    }
}

/// Media pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaConfig {
    /// Number of stat attempts while waiting for compressed output
    pub poll_attempts: u32,

    /// Delay between stat attempts, in milliseconds
    pub poll_delay_ms: u64,

    /// Maximum video duration accepted by listing forms, in seconds
    pub max_video_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig {
            poll_attempts: 10,
            poll_delay_ms: 500,
            max_video_secs: 120,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter, e.g. "info" or "info,souk_storage=debug"
    pub level: String,

    /// Output format: pretty, compact, or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.media.poll_attempts, 10);
        assert_eq!(config.media.poll_delay_ms, 500);
        assert_eq!(config.places.country, "in");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            [backend]
            base_url = "https://api.example.com/api/v1"

            [b2]
            key_id = "k"
            application_key = "s"
            bucket_id = "bid"
            bucket_name = "souk-media"
        "#;

        let config: Config = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.backend.base_url, "https://api.example.com/api/v1");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.b2.bucket_name, "souk-media");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_roundtrip_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).expect("serialize");
        let deserialized: Config = toml::from_str(&serialized).expect("deserialize");
        assert_eq!(config, deserialized);
    }
}
