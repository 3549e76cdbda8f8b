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

//! Cached default location
//!
//! Address inputs read this on mount and overwrite it whenever the user
//! picks a new address prediction. One slot, last-write-wins, no expiry.

use crate::error::KvError;
use crate::kv::{KeyValueStore, DEFAULT_LOCATION_KEY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// The last location the user selected in any address input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultLocation {
    /// Formatted address string
    pub address: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Reader/writer for the single default-location slot
#[derive(Debug, Clone)]
pub struct LocationCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocationCache {
    /// Wrap a key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        LocationCache { store }
    }

    /// Load the cached location
    ///
    /// A missing slot and a corrupt slot both read as `None`; corruption is
    /// logged and treated as cache miss rather than an error.
    pub async fn load(&self) -> Result<Option<DefaultLocation>, KvError> {
        let Some(raw) = self.store.get(DEFAULT_LOCATION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(location) => Ok(Some(location)),
            Err(e) => {
                warn!(error = %e, "Discarding unparseable cached default location");
                Ok(None)
            }
        }
    }

    /// Overwrite the cached location (last write wins)
    pub async fn save(&self, location: &DefaultLocation) -> Result<(), KvError> {
        let raw = serde_json::to_string(location)?;
        self.store.set(DEFAULT_LOCATION_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn sample() -> DefaultLocation {
        DefaultLocation {
            address: "MG Road, Bengaluru, Karnataka, India".to_string(),
            latitude: 12.9758,
            longitude: 77.6045,
        }
    }

    #[tokio::test]
    async fn test_empty_cache_reads_none() {
        let cache = LocationCache::new(Arc::new(MemoryStore::new()));
        assert_eq!(cache.load().await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let cache = LocationCache::new(Arc::new(MemoryStore::new()));
        cache.save(&sample()).await.expect("save");
        assert_eq!(cache.load().await.expect("load"), Some(sample()));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let cache = LocationCache::new(Arc::new(MemoryStore::new()));
        cache.save(&sample()).await.expect("save");

        let newer = DefaultLocation {
            address: "Connaught Place, New Delhi, India".to_string(),
            latitude: 28.6315,
            longitude: 77.2167,
        };
        cache.save(&newer).await.expect("save newer");
        assert_eq!(cache.load().await.expect("load"), Some(newer));
    }

    #[tokio::test]
    async fn test_corrupt_slot_reads_none() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(DEFAULT_LOCATION_KEY, "{not json")
            .await
            .expect("set");

        let cache = LocationCache::new(store);
        assert_eq!(cache.load().await.expect("load"), None);
    }

    #[test]
    fn test_wire_shape_matches_persisted_key() {
        let json = serde_json::to_value(sample()).expect("to_value");
        assert!(json.get("address").is_some());
        assert!(json.get("latitude").is_some());
        assert!(json.get("longitude").is_some());
    }
}
