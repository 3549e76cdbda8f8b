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

//! External service clients for Souk
//!
//! Three independent clients: [`MarketClient`] for the marketplace backend
//! (listings, reports, follows, credential handout), [`PlacesClient`] for
//! Google Places autocomplete/details, and [`YouTubeClient`] for the
//! alternate resumable video path. All of them are thin: no retries, no
//! caching, no background work.

pub mod client;
pub mod error;
pub mod places;
pub mod youtube;

pub use client::{BackblazeCredentials, Brand, MarketClient};
pub use error::{ApiError, ApiResult};
pub use places::{PlacePrediction, PlacesClient, AUTOCOMPLETE_DEBOUNCE, MIN_AUTOCOMPLETE_LEN};
pub use youtube::{VideoMetadata, YouTubeClient};
