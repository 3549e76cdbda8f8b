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

//! Configuration management for the Souk client core
//!
//! Loads the client configuration (`souk.toml` by default) that wires the
//! marketplace backend, the Backblaze B2 bucket, the Places API key, and the
//! media pipeline knobs together.
//!
//! # Features
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides with `SOUK_` prefix
//! - Validation with field-level error messages
//!
//! # Example
//!
//! ```no_run
//! use souk_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ConfigLoader::new();
//!     let config = loader.load_with_overrides("souk.toml").await?;
//!
//!     println!("backend: {}", config.backend.base_url);
//!     println!("bucket:  {}", config.b2.bucket_name);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader};
pub use schema::*;
pub use validation::Validator;
