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

//! Backend REST client
//!
//! Thin wrappers over the marketplace backend. Every call carries a bearer
//! token read from the key-value store at call time, so sign-out takes
//! effect immediately. Submission uses `multipart/form-data` with the fixed
//! field contract and is guarded by an [`OperationSlot`] so a double tap on
//! submit issues exactly one request.

use crate::error::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use souk_core::{AttachmentSet, KeyValueStore, ListingDraft, OperationSlot, AUTH_TOKEN_KEY};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// B2 credentials handed out by the backend
///
/// Field aliases accept both the backend's camelCase wire shape and plain
/// snake_case.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BackblazeCredentials {
    /// Application key id
    #[serde(alias = "keyId", alias = "keyID")]
    pub key_id: String,

    /// Application key secret
    #[serde(alias = "applicationKey")]
    pub application_key: String,

    /// Target bucket id
    #[serde(alias = "bucketId")]
    pub bucket_id: String,

    /// Target bucket name
    #[serde(alias = "bucketName")]
    pub bucket_name: String,
}

/// One scooter brand from the reference-data endpoint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Brand {
    /// Backend id
    pub id: u64,

    /// Display name
    pub name: String,
}

/// Client for the marketplace backend
#[derive(Debug)]
pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    submit_slot: Mutex<OperationSlot>,
}

impl MarketClient {
    /// Create a client for the given base URL
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
        timeout: std::time::Duration,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(MarketClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            submit_slot: Mutex::new(OperationSlot::new()),
        })
    }

    /// Bearer token from the key-value store, or [`ApiError::Unauthorized`]
    async fn bearer_token(&self) -> ApiResult<String> {
        self.store
            .get(AUTH_TOKEN_KEY)
            .await?
            .ok_or(ApiError::Unauthorized)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> ApiResult<serde_json::Value> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch one listing (edit mode prefill)
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: u64) -> ApiResult<serde_json::Value> {
        let token = self.bearer_token().await?;
        let response = self
            .http
            .get(self.url(&format!("/posts/{post_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Create or update a listing
    ///
    /// `post_id` of `None` creates; `Some` updates. The whole call is
    /// guarded: a second submit while one is in flight fails with
    /// [`souk_core::SlotError::Busy`] before any network traffic.
    #[instrument(skip(self, draft, attachments))]
    pub async fn submit_listing(
        &self,
        draft: &ListingDraft,
        attachments: &AttachmentSet,
        post_id: Option<u64>,
    ) -> ApiResult<serde_json::Value> {
        self.begin_submission()?;
        let result = self.send_submission(draft, attachments, post_id).await;
        self.end_submission(result.is_ok());
        result
    }

    fn begin_submission(&self) -> ApiResult<()> {
        let mut slot = self.submit_slot.lock().expect("submit slot lock");
        slot.begin()?;
        Ok(())
    }

    fn end_submission(&self, succeeded: bool) {
        let mut slot = self.submit_slot.lock().expect("submit slot lock");
        let result = if succeeded { slot.complete() } else { slot.fail() };
        if let Err(e) = result {
            warn!(error = %e, "Submit slot transition failed");
        }
    }

    async fn send_submission(
        &self,
        draft: &ListingDraft,
        attachments: &AttachmentSet,
        post_id: Option<u64>,
    ) -> ApiResult<serde_json::Value> {
        let token = self.bearer_token().await?;
        let form = Self::submission_form(draft, attachments).await?;

        let path = match post_id {
            Some(id) => format!("/posts/{id}"),
            None => "/posts".to_string(),
        };
        info!(path = %path, images = attachments.images().len(), "Submitting listing");

        let response = self
            .http
            .post(self.url(&path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Build the fixed-contract multipart form
    async fn submission_form(
        draft: &ListingDraft,
        attachments: &AttachmentSet,
    ) -> ApiResult<Form> {
        let mut form = Form::new();

        if let Some(category_id) = draft.category_id {
            form = form.text("category_id", category_id.to_string());
        }
        form = form
            .text("guard_name", draft.guard_name.clone())
            .text("post_type", draft.post_type.clone());

        for (name, value) in draft.form_fields() {
            form = form.text(name.to_string(), value);
        }

        for uri in attachments.new_images() {
            let path = Path::new(uri);
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image.jpg")
                .to_string();
            debug!(file = %file_name, size = bytes.len(), "Attaching new image");
            form = form.part("new_images[]", Part::bytes(bytes).file_name(file_name));
        }

        for url in attachments.existing_images() {
            form = form.text("existing_images[]", url.to_string());
        }
        for url in attachments.deleted_images() {
            form = form.text("deleted_images[]", url.clone());
        }

        if let Some(video) = attachments.video() {
            form = form.text("video_url", video.video_url.clone());
            if let Some(id) = &video.video_id {
                form = form.text("video_id", id.clone());
            }
        }
        if let Some(url) = attachments.deleted_video_url() {
            form = form.text("deleted_video_url", url.to_string());
        }

        Ok(form)
    }

    /// Report a listing
    pub async fn report_post(&self, post_id: u64, reason: &str) -> ApiResult<serde_json::Value> {
        self.auth_post("/reports", serde_json::json!({ "post_id": post_id, "reason": reason }))
            .await
    }

    /// Toggle following a listing
    pub async fn follow_post(&self, post_id: u64) -> ApiResult<serde_json::Value> {
        self.auth_post("/follow-post", serde_json::json!({ "post_id": post_id }))
            .await
    }

    /// Toggle following a seller
    pub async fn follow_user(&self, user_id: u64) -> ApiResult<serde_json::Value> {
        self.auth_post("/follow-user", serde_json::json!({ "user_id": user_id }))
            .await
    }

    async fn auth_post(&self, path: &str, body: serde_json::Value) -> ApiResult<serde_json::Value> {
        let token = self.bearer_token().await?;
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Fetch upload credentials for the object store
    pub async fn backblaze_credentials(&self) -> ApiResult<BackblazeCredentials> {
        let token = self.bearer_token().await?;
        let response = self
            .http
            .get(self.url("/backblaze/credentials"))
            .bearer_auth(token)
            .send()
            .await?;
        let value = Self::check(response).await?;
        Ok(parse_enveloped(value)?)
    }

    /// Fetch the scooter brand reference list
    pub async fn scooter_brands(&self) -> ApiResult<Vec<Brand>> {
        let token = self.bearer_token().await?;
        let response = self
            .http
            .get(self.url("/scooter/brand"))
            .bearer_auth(token)
            .send()
            .await?;
        let value = Self::check(response).await?;
        Ok(parse_enveloped(value)?)
    }
}

/// Unwrap the backend's optional `{ "data": ... }` envelope
fn parse_enveloped<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, serde_json::Error> {
    let inner = match value {
        serde_json::Value::Object(ref map) if map.contains_key("data") => {
            map["data"].clone()
        }
        other => other,
    };
    serde_json::from_value(inner)
}

// ============================================================================
// Tests
// ============================================================================
