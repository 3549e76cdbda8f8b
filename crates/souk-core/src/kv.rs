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

//! Device-local key-value persistence seam
//!
//! The host app persists exactly three keys: the auth token, the user id,
//! and the cached default location. [`MemoryStore`] backs tests;
//! [`JsonFileStore`] backs the CLI with a single JSON object on disk.

use crate::error::KvError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Key holding the backend bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the signed-in user id
pub const USER_ID_KEY: &str = "userId";

/// Key holding the cached default location JSON
pub const DEFAULT_LOCATION_KEY: &str = "defaultLocation";

/// Async key-value store
///
/// Implementations must be `Send + Sync`; writes are last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read a value
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write (or overwrite) a value
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Delete a value; deleting an absent key succeeds
    async fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Single-file JSON store
///
/// The whole map is rewritten on every set; fine for the handful of keys the
/// client actually persists.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the backing file
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store backed by the given file (created lazily)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, KvError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), KvError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set(AUTH_TOKEN_KEY, "tok-123").await.expect("set");

        assert_eq!(
            store.get(AUTH_TOKEN_KEY).await.expect("get"),
            Some("tok-123".to_string())
        );
        assert_eq!(store.get("missing").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set("k", "first").await.expect("set");
        store.set("k", "second").await.expect("set");
        assert_eq!(store.get("k").await.expect("get"), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_memory_store_remove_idempotent() {
        let store = MemoryStore::new();
        store.set("k", "v").await.expect("set");
        store.remove("k").await.expect("remove");
        store.remove("k").await.expect("remove again");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_json_file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("store.json"));

        store.set(USER_ID_KEY, "42").await.expect("set");
        store.set(AUTH_TOKEN_KEY, "tok").await.expect("set");

        assert_eq!(store.get(USER_ID_KEY).await.expect("get"), Some("42".to_string()));

        store.remove(USER_ID_KEY).await.expect("remove");
        assert_eq!(store.get(USER_ID_KEY).await.expect("get"), None);
        assert_eq!(store.get(AUTH_TOKEN_KEY).await.expect("get"), Some("tok".to_string()));
    }

    #[tokio::test]
    async fn test_json_file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nope.json"));
        assert_eq!(store.get("k").await.expect("get"), None);
    }
}
