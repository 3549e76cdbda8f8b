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

//! Configuration validation

use crate::error::{ConfigError, ConfigResult};
use crate::schema::*;

/// Validator for configuration settings
pub trait Validator {
    /// Check the configuration for structural problems
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for Config {
    fn validate(&self) -> ConfigResult<()> {
        self.backend.validate()?;
        self.b2.validate()?;
        self.places.validate()?;
        self.media.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Validator for BackendConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingRequired("backend.base_url".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::invalid_value(
                "backend.base_url",
                "must start with http:// or https://",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "backend.timeout_secs",
                "timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

impl Validator for B2Config {
    fn validate(&self) -> ConfigResult<()> {
        if self.key_id.is_empty() {
            return Err(ConfigError::MissingRequired("b2.key_id".to_string()));
        }
        if self.application_key.is_empty() {
            return Err(ConfigError::MissingRequired("b2.application_key".to_string()));
        }
        if self.bucket_id.is_empty() {
            return Err(ConfigError::MissingRequired("b2.bucket_id".to_string()));
        }

        // S3-style bucket naming rules also hold for B2 bucket names
        if self.bucket_name.is_empty() {
            return Err(ConfigError::MissingRequired("b2.bucket_name".to_string()));
        }
        if self.bucket_name.len() > 63 {
            return Err(ConfigError::invalid_value(
                "b2.bucket_name",
                "must be 63 characters or less",
            ));
        }
        if !self
            .bucket_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::invalid_value(
                "b2.bucket_name",
                "must contain only lowercase letters, numbers, and hyphens",
            ));
        }
        if self.bucket_name.starts_with('-') || self.bucket_name.ends_with('-') {
            return Err(ConfigError::invalid_value(
                "b2.bucket_name",
                "cannot start or end with a hyphen",
            ));
        }

        Ok(())
    }
}

impl Validator for PlacesConfig {
    fn validate(&self) -> ConfigResult<()> {
        // The Places key is optional: forms without an address field never
        // touch the API.
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ConfigError::invalid_value(
                "places.country",
                "must be a two-letter lowercase country code",
            ));
        }
        Ok(())
    }
}

impl Validator for MediaConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.poll_attempts == 0 {
            return Err(ConfigError::invalid_value(
                "media.poll_attempts",
                "at least one stat attempt is required",
            ));
        }
        if self.max_video_secs == 0 {
            return Err(ConfigError::invalid_value(
                "media.max_video_secs",
                "maximum video duration must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Validator for LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.backend.base_url = "https://api.example.com/api/v1".to_string();
        config.b2.key_id = "key".to_string();
        config.b2.application_key = "secret".to_string();
        config.b2.bucket_id = "bucket-id".to_string();
        config.b2.bucket_name = "souk-media".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_base_url() {
        let mut config = valid_config();
        config.backend.base_url.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(field)) if field == "backend.base_url"
        ));
    }

    #[test]
    fn test_base_url_scheme_required() {
        let mut config = valid_config();
        config.backend.base_url = "api.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_name_uppercase_rejected() {
        let mut config = valid_config();
        config.b2.bucket_name = "SoukMedia".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_name_hyphen_edges_rejected() {
        let mut config = valid_config();
        config.b2.bucket_name = "-souk".to_string();
        assert!(config.validate().is_err());

        config.b2.bucket_name = "souk-".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        let mut config = valid_config();
        config.media.poll_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_country_code_rejected() {
        let mut config = valid_config();
        config.places.country = "IND".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_log_format_rejected() {
        let mut config = valid_config();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
