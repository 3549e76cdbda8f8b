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

//! Object storage layer for Souk
//!
//! This crate talks to Backblaze B2 over its native HTTP API
//! (`b2_authorize_account`, `b2_get_upload_url`, the raw upload POST with
//! `X-Bz-*` headers) and exposes a small [`ObjectStore`] seam so the media
//! pipeline and tests never depend on the provider directly.
//!
//! # Core Concepts
//!
//! - **Session**: account authorization and the one-shot upload URL are
//!   cached in-process with a one-hour soft expiry, checked against an
//!   injected [`Clock`] so expiry is testable.
//! - **Progress**: uploads report `(bytes_sent, total_bytes)` through an
//!   explicit [`ProgressObserver`] passed into the call; no hidden state.
//! - **Best-effort deletes**: removing a remote attachment must never block
//!   the user-visible action, so deletes are dispatched fire-and-forget via
//!   [`spawn_best_effort_delete`] and only logged on failure.
//!
//! # Example
//!
//! ```no_run
//! use souk_storage::{b2::{B2Client, B2Credentials}, NullProgress, ObjectStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> souk_storage::StorageResult<()> {
//!     let client = B2Client::new(B2Credentials {
//!         key_id: "key-id".into(),
//!         application_key: "secret".into(),
//!         bucket_id: "bucket-id".into(),
//!         bucket_name: "souk-media".into(),
//!     })?;
//!
//!     let uploaded = client
//!         .upload(
//!             std::path::Path::new("/tmp/clip.mp4"),
//!             "videos/clip.mp4",
//!             "video/mp4",
//!             Arc::new(NullProgress),
//!         )
//!         .await?;
//!     println!("{}", uploaded.public_url);
//!     Ok(())
//! }
//! ```

pub mod b2;
pub mod clock;
pub mod error;
pub mod mock;

pub use b2::{B2Client, B2Credentials, Sha1Policy};
pub use clock::{Clock, SystemClock};
pub use error::{StorageError, StorageResult};
pub use mock::MockStore;

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Receives byte-level upload progress
///
/// Called with `(bytes_sent, total_bytes)` at a frequency determined by the
/// underlying transport (per body chunk for the B2 client). Implementations
/// must be cheap; they run on the transfer path.
pub trait ProgressObserver: Send + Sync {
    /// Report cumulative bytes sent out of the total
    fn on_progress(&self, bytes_sent: u64, total_bytes: u64);
}

/// Observer that discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_progress(&self, _bytes_sent: u64, _total_bytes: u64) {}
}

/// A successfully stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Provider file id (e.g. `4_z...`)
    pub file_id: String,

    /// Remote file name, as stored
    pub file_name: String,

    /// Stored size in bytes
    pub size: u64,

    /// Provider upload timestamp, milliseconds since epoch
    pub upload_timestamp: u64,

    /// Public download URL: `{downloadUrl}/file/{bucketName}/{fileName}`
    pub public_url: String,
}

/// Provider-agnostic object storage seam
///
/// Implementations must be `Send + Sync + Debug`. One upload runs at a time
/// per caller; the trait makes no concurrency promises beyond that.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// Stream a local file to storage under `remote_name`
    async fn upload(
        &self,
        local_path: &Path,
        remote_name: &str,
        content_type: &str,
        progress: Arc<dyn ProgressObserver>,
    ) -> StorageResult<UploadedFile>;

    /// Delete a stored object by provider file id and name
    async fn delete_by_id(&self, file_id: &str, file_name: &str) -> StorageResult<()>;

    /// Delete a stored object by name only (id unknown)
    async fn delete_by_name(&self, file_name: &str) -> StorageResult<()>;
}

/// Identifies a remote object for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Provider file id plus file name (preferred)
    ById {
        /// Provider file id
        file_id: String,
        /// Remote file name
        file_name: String,
    },
    /// File name only; the store resolves the id itself
    ByName(String),
}

/// Dispatch a remote delete without awaiting it
///
/// The primary state transition (clearing the local attachment) has already
/// committed by the time this runs; a failed delete is logged and otherwise
/// ignored. The backend reconciles leftovers from the deleted-identifier
/// list at submission time.
pub fn spawn_best_effort_delete(
    store: Arc<dyn ObjectStore>,
    target: DeleteTarget,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = match &target {
            DeleteTarget::ById { file_id, file_name } => {
                store.delete_by_id(file_id, file_name).await
            }
            DeleteTarget::ByName(file_name) => store.delete_by_name(file_name).await,
        };

        if let Err(e) = result {
            warn!(target = ?target, error = %e, "Best-effort remote delete failed");
        }
    })
}
