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

mod places;
mod probe;
mod upload;

pub use places::PlacesCmd;
pub use probe::ProbeCmd;
pub use upload::UploadCmd;

use anyhow::{Context, Result};
use souk_config::{Config, ConfigLoader};
use std::path::PathBuf;
use tracing::debug;

/// Load configuration from an explicit path, `souk.toml`, or environment
pub(crate) async fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let loader = ConfigLoader::new();
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading config file");
            loader
                .load_with_overrides(path)
                .await
                .with_context(|| format!("loading config from {}", path.display()))
        }
        None => {
            let default = PathBuf::from("souk.toml");
            if default.exists() {
                debug!("Loading souk.toml from working directory");
                loader
                    .load_with_overrides(&default)
                    .await
                    .context("loading souk.toml")
            } else {
                debug!("No config file; reading SOUK_* environment variables");
                loader.from_env().context("loading config from environment")
            }
        }
    }
}
