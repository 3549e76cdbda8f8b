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

//! Places command - address autocomplete lookup

use crate::commands::load_config;
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use souk_api::PlacesClient;
use std::path::PathBuf;

/// Look up address predictions, optionally resolving the first hit
#[derive(Parser, Debug)]
pub struct PlacesCmd {
    /// Partial address input (minimum 3 characters for any results)
    pub query: String,

    /// Resolve the first prediction to an address with coordinates
    #[arg(long)]
    pub resolve: bool,

    /// Config file path (defaults to souk.toml, then environment)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl PlacesCmd {
    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_ref()).await?;
        let client = PlacesClient::new(&config.places.api_key, &config.places.country)
            .context("building Places client")?;

        let predictions = client.autocomplete(&self.query).await?;
        if predictions.is_empty() {
            println!("No predictions.");
            return Ok(());
        }

        for prediction in &predictions {
            println!("{}  {}", style(&prediction.place_id).dim(), prediction.description);
        }

        if self.resolve {
            let first = &predictions[0];
            let location = client.details(&first.place_id).await?;
            println!();
            println!(
                "{} {} ({}, {})",
                style("Resolved:").green().bold(),
                location.address,
                location.latitude,
                location.longitude
            );
        }
        Ok(())
    }
}
