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

//! Google Places autocomplete and details
//!
//! The client itself is debounce-free; the host UI owns timing and should
//! wait [`AUTOCOMPLETE_DEBOUNCE`] between keystrokes. Inputs shorter than
//! [`MIN_AUTOCOMPLETE_LEN`] characters return an empty prediction list
//! without touching the network.

use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use souk_core::DefaultLocation;
use std::time::Duration;
use tracing::{debug, instrument};

/// Recommended pause between keystroke-driven autocomplete calls
pub const AUTOCOMPLETE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum input length before autocomplete fires
pub const MIN_AUTOCOMPLETE_LEN: usize = 3;

const PLACES_BASE: &str = "https://maps.googleapis.com/maps/api/place";

/// One address suggestion
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PlacePrediction {
    /// Human-readable suggestion text
    pub description: String,

    /// Opaque id for the details lookup
    pub place_id: String,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    #[serde(default)]
    predictions: Vec<PlacePrediction>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<DetailsResult>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Places API client scoped to one country
#[derive(Debug)]
pub struct PlacesClient {
    http: reqwest::Client,
    api_key: String,
    country: String,
    base_url: String,
}

impl PlacesClient {
    /// Create a client for the given API key and country code
    pub fn new(api_key: impl Into<String>, country: impl Into<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(PlacesClient {
            http,
            api_key: api_key.into(),
            country: country.into(),
            base_url: PLACES_BASE.to_string(),
        })
    }

    /// Point at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Address predictions for a partial input
    #[instrument(skip(self))]
    pub async fn autocomplete(&self, input: &str) -> ApiResult<Vec<PlacePrediction>> {
        if input.chars().count() < MIN_AUTOCOMPLETE_LEN {
            debug!(len = input.chars().count(), "Input below autocomplete threshold");
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(format!("{}/autocomplete/json", self.base_url))
            .query(&[
                ("input", input),
                ("key", self.api_key.as_str()),
                ("components", &format!("country:{}", self.country)),
            ])
            .send()
            .await?;

        parse_autocomplete(&response.text().await?)
    }

    /// Resolve a prediction to an address with coordinates
    #[instrument(skip(self))]
    pub async fn details(&self, place_id: &str) -> ApiResult<DefaultLocation> {
        let response = self
            .http
            .get(format!("{}/details/json", self.base_url))
            .query(&[("place_id", place_id), ("key", self.api_key.as_str())])
            .send()
            .await?;

        parse_details(&response.text().await?)
    }
}

fn parse_autocomplete(body: &str) -> ApiResult<Vec<PlacePrediction>> {
    let parsed: AutocompleteResponse = serde_json::from_str(body)?;
    match parsed.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(parsed.predictions),
        other => Err(ApiError::PlacesStatus(other.to_string())),
    }
}

fn parse_details(body: &str) -> ApiResult<DefaultLocation> {
    let parsed: DetailsResponse = serde_json::from_str(body)?;
    if parsed.status != "OK" {
        return Err(ApiError::PlacesStatus(parsed.status));
    }
    let result = parsed
        .result
        .ok_or_else(|| ApiError::PlacesStatus("OK response without result".to_string()))?;
    Ok(DefaultLocation {
        address: result.formatted_address,
        latitude: result.geometry.location.lat,
        longitude: result.geometry.location.lng,
    })
}
