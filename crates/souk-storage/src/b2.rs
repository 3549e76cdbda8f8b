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

//! Backblaze B2 native-API client
//!
//! Implements the three-call upload dance: `b2_authorize_account` yields an
//! account token and API base, `b2_get_upload_url` yields a single-use
//! upload endpoint, and the upload itself is a raw POST with `X-Bz-*`
//! headers. Both the account session and the upload endpoint are cached
//! behind a mutex with a one-hour soft expiry; a rejected upload drops the
//! cached endpoint so the next attempt fetches a fresh one.

use crate::clock::{Clock, SystemClock};
use crate::error::{StorageError, StorageResult};
use crate::{ObjectStore, ProgressObserver, UploadedFile};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::StreamExt;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument, warn};

/// Entry point for account authorization
const B2_AUTH_URL: &str = "https://api.backblazeb2.com/b2api/v2/b2_authorize_account";

/// Sessions older than this are re-authorized before use
fn session_ttl() -> Duration {
    Duration::hours(1)
}

/// Whole-file hashing above this size switches to chunked reads
const SHA1_DIRECT_LIMIT: u64 = 20 * 1024 * 1024;

/// Above this size the checksum is skipped entirely
const SHA1_SKIP_LIMIT: u64 = 50 * 1024 * 1024;

/// Read size for chunked hashing
const SHA1_CHUNK_SIZE: usize = 1024 * 1024;

/// How a file's SHA1 checksum is produced for the upload header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sha1Policy {
    /// Read the whole file into memory and hash it
    Direct,

    /// Hash incrementally over fixed-size reads
    Chunked,

    /// Send `do_not_verify`; integrity is the transport's problem
    Skip,
}

impl Sha1Policy {
    /// Policy for a file of the given size
    pub fn for_size(size: u64) -> Self {
        if size <= SHA1_DIRECT_LIMIT {
            Sha1Policy::Direct
        } else if size <= SHA1_SKIP_LIMIT {
            Sha1Policy::Chunked
        } else {
            Sha1Policy::Skip
        }
    }
}

/// Account credentials plus the target bucket
#[derive(Debug, Clone)]
pub struct B2Credentials {
    /// Application key id
    pub key_id: String,

    /// Application key secret
    pub application_key: String,

    /// Bucket id, used by `b2_get_upload_url` and list/delete calls
    pub bucket_id: String,

    /// Bucket name, used to build public download URLs
    pub bucket_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizeResponse {
    authorization_token: String,
    api_url: String,
    download_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadUrlResponse {
    upload_url: String,
    authorization_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: String,
    file_name: String,
    content_length: u64,
    #[serde(default)]
    upload_timestamp: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFileNamesResponse {
    files: Vec<ListedFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedFile {
    file_id: String,
    file_name: String,
}

/// Single-use upload endpoint from `b2_get_upload_url`
#[derive(Debug, Clone)]
struct UploadTarget {
    url: String,
    token: String,
}

/// Cached authorization state
#[derive(Debug)]
struct Session {
    account_token: String,
    api_url: String,
    download_url: String,
    upload: Option<UploadTarget>,
    obtained_at: DateTime<Utc>,
}

fn session_expired(obtained_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - obtained_at >= session_ttl()
}

/// B2 client implementing [`ObjectStore`]
#[derive(Debug)]
pub struct B2Client {
    http: reqwest::Client,
    credentials: B2Credentials,
    clock: Arc<dyn Clock>,
    session: Mutex<Option<Session>>,
}

impl B2Client {
    /// Create a client with the system clock
    pub fn new(credentials: B2Credentials) -> StorageResult<Self> {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    /// Create a client with an injected clock (tests)
    pub fn with_clock(credentials: B2Credentials, clock: Arc<dyn Clock>) -> StorageResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .build()?;
        Ok(B2Client {
            http,
            credentials,
            clock,
            session: Mutex::new(None),
        })
    }

    /// Call `b2_authorize_account` and build a fresh session
    async fn authorize(&self) -> StorageResult<Session> {
        debug!(key_id = %self.credentials.key_id, "Authorizing B2 account");
        let response = self
            .http
            .get(B2_AUTH_URL)
            .basic_auth(&self.credentials.key_id, Some(&self.credentials.application_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::AuthFailed {
                status: status.as_u16(),
                body,
            });
        }

        let auth: AuthorizeResponse = serde_json::from_str(&response.text().await?)?;
        Ok(Session {
            account_token: auth.authorization_token,
            api_url: auth.api_url,
            download_url: auth.download_url,
            upload: None,
            obtained_at: self.clock.now(),
        })
    }

    /// Call `b2_get_upload_url` against the given session
    async fn fetch_upload_target(&self, session: &Session) -> StorageResult<UploadTarget> {
        let response = self
            .http
            .post(format!("{}/b2api/v2/b2_get_upload_url", session.api_url))
            .header("Authorization", &session.account_token)
            .json(&serde_json::json!({ "bucketId": self.credentials.bucket_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadUrlFailed {
                status: status.as_u16(),
                body,
            });
        }

        let url: UploadUrlResponse = serde_json::from_str(&response.text().await?)?;
        Ok(UploadTarget {
            url: url.upload_url,
            token: url.authorization_token,
        })
    }

    /// Ensure the cached session is fresh and carries an upload target
    ///
    /// Returns the pieces needed for one upload attempt. The caller holds no
    /// lock during the transfer itself; a failed attempt reports back via
    /// [`Self::invalidate_upload_target`].
    async fn upload_target(&self) -> StorageResult<(UploadTarget, String)> {
        let mut guard = self.session.lock().await;

        let needs_auth = match guard.as_ref() {
            Some(session) => session_expired(session.obtained_at, self.clock.now()),
            None => true,
        };
        if needs_auth {
            info!("B2 session missing or stale; re-authorizing");
            *guard = Some(self.authorize().await?);
        }

        let session = guard.as_mut().expect("session populated above");
        if session.upload.is_none() {
            session.upload = Some(self.fetch_upload_target(session).await?);
        }

        let target = session.upload.clone().expect("upload target populated above");
        Ok((target, session.download_url.clone()))
    }

    /// Drop the cached upload endpoint after a rejected upload
    async fn invalidate_upload_target(&self) {
        if let Some(session) = self.session.lock().await.as_mut() {
            session.upload = None;
        }
    }

    /// Compute the `X-Bz-Content-Sha1` header value per the size policy
    async fn content_sha1(&self, path: &Path, size: u64) -> StorageResult<String> {
        match Sha1Policy::for_size(size) {
            Sha1Policy::Direct => {
                let bytes = tokio::fs::read(path).await?;
                Ok(hex::encode(Sha1::digest(&bytes)))
            }
            Sha1Policy::Chunked => {
                let mut file = tokio::fs::File::open(path).await?;
                let mut hasher = Sha1::new();
                let mut buf = vec![0u8; SHA1_CHUNK_SIZE];
                loop {
                    let n = file.read(&mut buf).await?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                }
                Ok(hex::encode(hasher.finalize()))
            }
            Sha1Policy::Skip => Ok("do_not_verify".to_string()),
        }
    }

    fn public_url(&self, download_url: &str, file_name: &str) -> String {
        format!(
            "{}/file/{}/{}",
            download_url, self.credentials.bucket_name, file_name
        )
    }

    /// POST `b2_delete_file_version`
    async fn delete_file_version(
        &self,
        api_url: &str,
        token: &str,
        file_id: &str,
        file_name: &str,
    ) -> StorageResult<()> {
        let response = self
            .http
            .post(format!("{api_url}/b2api/v2/b2_delete_file_version"))
            .header("Authorization", token)
            .json(&serde_json::json!({
                "fileId": file_id,
                "fileName": file_name,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::DeleteFailed {
                file_name: file_name.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Fresh session fields for non-upload calls
    async fn session_fields(&self) -> StorageResult<(String, String)> {
        let mut guard = self.session.lock().await;
        let needs_auth = match guard.as_ref() {
            Some(session) => session_expired(session.obtained_at, self.clock.now()),
            None => true,
        };
        if needs_auth {
            *guard = Some(self.authorize().await?);
        }
        let session = guard.as_ref().expect("session populated above");
        Ok((session.api_url.clone(), session.account_token.clone()))
    }
}

#[async_trait]
impl ObjectStore for B2Client {
    #[instrument(skip(self, progress), fields(remote_name = %remote_name))]
    async fn upload(
        &self,
        local_path: &Path,
        remote_name: &str,
        content_type: &str,
        progress: Arc<dyn ProgressObserver>,
    ) -> StorageResult<UploadedFile> {
        let metadata = tokio::fs::metadata(local_path).await?;
        let total_bytes = metadata.len();
        let sha1 = self.content_sha1(local_path, total_bytes).await?;

        let (target, download_url) = self.upload_target().await?;

        info!(size = total_bytes, content_type, "Starting B2 upload");

        let file = tokio::fs::File::open(local_path).await?;
        let sent = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&sent);
        let observer = Arc::clone(&progress);
        let stream = ReaderStream::new(file).inspect(move |chunk| {
            if let Ok(bytes) = chunk {
                let so_far =
                    counter.fetch_add(bytes.len() as u64, Ordering::Relaxed) + bytes.len() as u64;
                observer.on_progress(so_far.min(total_bytes), total_bytes);
            }
        });

        let response = self
            .http
            .post(&target.url)
            .header("Authorization", &target.token)
            .header("X-Bz-File-Name", urlencoding::encode(remote_name).into_owned())
            .header("Content-Type", content_type)
            .header("Content-Length", total_bytes)
            .header("X-Bz-Content-Sha1", &sha1)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.invalidate_upload_target().await;
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            // A rejected upload usually means the single-use URL went stale.
            self.invalidate_upload_target().await;
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "B2 upload rejected");
            return Err(StorageError::UploadFailed {
                file_name: remote_name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = serde_json::from_str(&response.text().await?)?;
        info!(file_id = %uploaded.file_id, "B2 upload complete");

        Ok(UploadedFile {
            public_url: self.public_url(&download_url, &uploaded.file_name),
            file_id: uploaded.file_id,
            file_name: uploaded.file_name,
            size: uploaded.content_length,
            upload_timestamp: uploaded.upload_timestamp,
        })
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, file_id: &str, file_name: &str) -> StorageResult<()> {
        let (api_url, token) = self.session_fields().await?;
        self.delete_file_version(&api_url, &token, file_id, file_name)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_by_name(&self, file_name: &str) -> StorageResult<()> {
        let (api_url, token) = self.session_fields().await?;

        // Resolve the id with a prefix-scoped single-entry listing.
        let response = self
            .http
            .post(format!("{api_url}/b2api/v2/b2_list_file_names"))
            .header("Authorization", &token)
            .json(&serde_json::json!({
                "bucketId": self.credentials.bucket_id,
                "startFileName": file_name,
                "prefix": file_name,
                "maxFileCount": 1,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::DeleteFailed {
                file_name: file_name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let listing: ListFileNamesResponse = serde_json::from_str(&response.text().await?)?;
        let file = listing
            .files
            .into_iter()
            .find(|f| f.file_name == file_name)
            .ok_or_else(|| StorageError::FileNotFound(file_name.to_string()))?;

        self.delete_file_version(&api_url, &token, &file.file_id, &file.file_name)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::FixedClock;

    const MB: u64 = 1024 * 1024;

    fn credentials() -> B2Credentials {
        B2Credentials {
            key_id: "key".to_string(),
            application_key: "secret".to_string(),
            bucket_id: "bucket-id".to_string(),
            bucket_name: "souk-media".to_string(),
        }
    }

    #[test]
    fn test_sha1_policy_boundaries() {
        assert_eq!(Sha1Policy::for_size(0), Sha1Policy::Direct);
        assert_eq!(Sha1Policy::for_size(20 * MB), Sha1Policy::Direct);
        assert_eq!(Sha1Policy::for_size(20 * MB + 1), Sha1Policy::Chunked);
        assert_eq!(Sha1Policy::for_size(30 * MB), Sha1Policy::Chunked);
        assert_eq!(Sha1Policy::for_size(50 * MB), Sha1Policy::Chunked);
        assert_eq!(Sha1Policy::for_size(50 * MB + 1), Sha1Policy::Skip);
        assert_eq!(Sha1Policy::for_size(500 * MB), Sha1Policy::Skip);
    }

    #[tokio::test]
    async fn test_direct_and_chunked_hashes_agree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payload.bin");
        tokio::fs::write(&path, vec![0xabu8; 3 * SHA1_CHUNK_SIZE + 17])
            .await
            .expect("write");

        let client = B2Client::new(credentials()).expect("client");
        let size = tokio::fs::metadata(&path).await.expect("meta").len();

        // Force both code paths over the same bytes.
        let direct = {
            let bytes = tokio::fs::read(&path).await.expect("read");
            hex::encode(Sha1::digest(&bytes))
        };
        let chunked = client.content_sha1(&path, size).await.expect("sha1");
        assert_eq!(direct, chunked);
    }

    #[tokio::test]
    async fn test_oversize_file_skips_verification() {
        let client = B2Client::new(credentials()).expect("client");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.bin");
        tokio::fs::write(&path, b"stub").await.expect("write");

        // Size is passed in, so the stub file stands in for a 60MB video.
        let header = client.content_sha1(&path, 60 * MB).await.expect("sha1");
        assert_eq!(header, "do_not_verify");
    }

    #[test]
    fn test_public_url_shape() {
        let client = B2Client::new(credentials()).expect("client");
        assert_eq!(
            client.public_url("https://f002.backblazeb2.com", "videos/clip.mp4"),
            "https://f002.backblazeb2.com/file/souk-media/videos/clip.mp4"
        );
    }

    #[test]
    fn test_session_expiry_window() {
        let start = Utc::now();
        assert!(!session_expired(start, start));
        assert!(!session_expired(start, start + Duration::minutes(59)));
        assert!(session_expired(start, start + Duration::hours(1)));
        assert!(session_expired(start, start + Duration::hours(2)));
    }

    #[test]
    fn test_fixed_clock_drives_expiry() {
        let clock = FixedClock::at(Utc::now());
        let obtained = clock.now();
        clock.advance(Duration::minutes(30));
        assert!(!session_expired(obtained, clock.now()));
        clock.advance(Duration::minutes(31));
        assert!(session_expired(obtained, clock.now()));
    }

    #[test]
    fn test_authorize_response_parses_provider_shape() {
        let raw = r#"{
            "absoluteMinimumPartSize": 5000000,
            "accountId": "abc123",
            "apiUrl": "https://api002.backblazeb2.com",
            "authorizationToken": "4_002abc",
            "downloadUrl": "https://f002.backblazeb2.com",
            "recommendedPartSize": 100000000
        }"#;
        let auth: AuthorizeResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(auth.api_url, "https://api002.backblazeb2.com");
        assert_eq!(auth.authorization_token, "4_002abc");
        assert_eq!(auth.download_url, "https://f002.backblazeb2.com");
    }

    #[test]
    fn test_upload_response_parses_provider_shape() {
        let raw = r#"{
            "accountId": "abc123",
            "action": "upload",
            "bucketId": "bucket-id",
            "contentLength": 1048576,
            "contentSha1": "deadbeef",
            "contentType": "video/mp4",
            "fileId": "4_zfile",
            "fileName": "videos/clip.mp4",
            "uploadTimestamp": 1756000000000
        }"#;
        let uploaded: UploadResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(uploaded.file_id, "4_zfile");
        assert_eq!(uploaded.content_length, 1048576);
        assert_eq!(uploaded.upload_timestamp, 1756000000000);
    }
}
