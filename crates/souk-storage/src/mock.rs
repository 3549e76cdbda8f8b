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

//! In-memory [`ObjectStore`] for tests
//!
//! Records every upload and delete, emits deterministic progress, and
//! injects failures on demand so pipeline and attachment tests can exercise
//! the error paths without a network.

use crate::error::{StorageError, StorageResult};
use crate::{ObjectStore, ProgressObserver, UploadedFile};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One recorded upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    /// Remote name the caller requested
    pub remote_name: String,

    /// Declared content type
    pub content_type: String,

    /// Size of the local file at upload time
    pub size: u64,

    /// Exact bytes read from the local file
    pub body: Vec<u8>,
}

/// Recording, failure-injecting store
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    fail_uploads: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    next_id: Arc<AtomicU64>,
}

impl MockStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent uploads fail
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent deletes fail
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Everything uploaded so far, in order
    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().await.clone()
    }

    /// File names deleted so far, in order
    pub async fn deleted_names(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn upload(
        &self,
        local_path: &Path,
        remote_name: &str,
        content_type: &str,
        progress: Arc<dyn ProgressObserver>,
    ) -> StorageResult<UploadedFile> {
        let body = tokio::fs::read(local_path).await?;
        let size = body.len() as u64;

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed {
                file_name: remote_name.to_string(),
                status: 503,
                body: "injected failure".to_string(),
            });
        }

        // Deterministic quarter-step progress ending exactly at the total.
        for step in 1..=4u64 {
            progress.on_progress(size * step / 4, size);
        }

        self.uploads.lock().await.push(RecordedUpload {
            remote_name: remote_name.to_string(),
            content_type: content_type.to_string(),
            size,
            body,
        });

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(UploadedFile {
            file_id: format!("mock_{id}"),
            file_name: remote_name.to_string(),
            size,
            upload_timestamp: 0,
            public_url: format!("https://mock.store/file/mock-bucket/{remote_name}"),
        })
    }

    async fn delete_by_id(&self, _file_id: &str, file_name: &str) -> StorageResult<()> {
        self.delete_by_name(file_name).await
    }

    async fn delete_by_name(&self, file_name: &str) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed {
                file_name: file_name.to_string(),
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        self.deleted.lock().await.push(file_name.to_string());
        Ok(())
    }
}
