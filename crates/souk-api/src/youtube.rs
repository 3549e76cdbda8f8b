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

//! YouTube resumable upload (alternate video path)
//!
//! Two steps: a metadata POST with `uploadType=resumable` yields a session
//! URI in the `Location` header, then the bytes go up in a single PUT to
//! that URI. The OAuth bearer token is supplied by the caller; this client
//! does not manage the sign-in flow.

use crate::error::{ApiError, ApiResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

const UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
}

/// Minimal metadata for an uploaded video
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,

    /// Video description
    pub description: String,
}

/// Client for the two-step resumable upload
#[derive(Debug)]
pub struct YouTubeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl YouTubeClient {
    /// Create a client
    pub fn new() -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()?;
        Ok(YouTubeClient {
            http,
            endpoint: UPLOAD_ENDPOINT.to_string(),
        })
    }

    /// Point at a different endpoint (tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Start a resumable session; returns the session URI
    #[instrument(skip(self, oauth_token))]
    pub async fn start_session(
        &self,
        oauth_token: &str,
        metadata: &VideoMetadata,
    ) -> ApiResult<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(oauth_token)
            .json(&serde_json::json!({
                "snippet": {
                    "title": metadata.title,
                    "description": metadata.description,
                },
                "status": { "privacyStatus": "unlisted" },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(ApiError::MissingSessionUri)
    }

    /// PUT the file bytes to the session URI; returns the video id
    #[instrument(skip(self, oauth_token))]
    pub async fn upload(
        &self,
        oauth_token: &str,
        session_uri: &str,
        local_path: &Path,
        content_type: &str,
    ) -> ApiResult<String> {
        let bytes = tokio::fs::read(local_path).await?;
        let size = bytes.len();

        let response = self
            .http
            .put(session_uri)
            .bearer_auth(oauth_token)
            .header("Content-Type", content_type)
            .header("Content-Length", size)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let resource: VideoResource = serde_json::from_str(&body)?;
        info!(video_id = %resource.id, size, "YouTube upload complete");
        Ok(resource.id)
    }
}
