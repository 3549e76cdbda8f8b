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

//! Listing attachments: image slots and the single video slot
//!
//! An attachment is either freshly picked (`is_new`, a local file that still
//! needs uploading) or already remote (a reference saved with a previous
//! version of the listing). The distinction drives removal semantics:
//!
//! - removing a *new* attachment is purely local and must never touch the
//!   deleted list or trigger a remote delete
//! - removing an *existing* attachment always clears the local reference and
//!   records the identifier in the deleted list, whether or not a
//!   best-effort remote delete succeeds; the backend reconciles the list at
//!   submission time

use crate::error::AttachmentError;
use serde::{Deserialize, Serialize};

/// An image attached to a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Local file URI (new) or remote reference (existing)
    pub uri: String,

    /// True when the image was picked this session and is not yet uploaded
    pub is_new: bool,
}

/// The single video attached to a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAttachment {
    /// Public URL of the uploaded video
    pub video_url: String,

    /// Storage-provider file id, when known
    pub video_id: Option<String>,

    /// True when the video was uploaded this session (unsaved listing edit)
    pub is_new: bool,
}

/// What a removal did, so the caller knows whether a best-effort remote
/// delete may be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovedAttachment {
    /// A new (never-saved) attachment; nothing left to clean up
    New,

    /// An existing remote attachment; its identifier is now on the deleted
    /// list and the caller may fire a non-blocking remote delete
    Existing {
        /// Remote identifier (URL or file reference)
        identifier: String,
        /// Provider file id when the attachment carried one
        file_id: Option<String>,
    },
}

/// Attachment state for one listing form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentSet {
    images: Vec<ImageAttachment>,
    video: Option<VideoAttachment>,

    /// Identifiers of removed remote images, consumed by the backend on submit
    deleted_images: Vec<String>,

    /// URL of a removed remote video, consumed by the backend on submit
    deleted_video_url: Option<String>,
}

impl AttachmentSet {
    /// Create an empty set (new listing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set pre-populated from a fetched listing (edit mode)
    pub fn from_existing(
        image_refs: impl IntoIterator<Item = String>,
        video: Option<VideoAttachment>,
    ) -> Self {
        AttachmentSet {
            images: image_refs
                .into_iter()
                .map(|uri| ImageAttachment { uri, is_new: false })
                .collect(),
            video,
            deleted_images: Vec::new(),
            deleted_video_url: None,
        }
    }

    /// All images, in display order
    pub fn images(&self) -> &[ImageAttachment] {
        &self.images
    }

    /// Freshly picked image URIs (to upload on submit)
    pub fn new_images(&self) -> impl Iterator<Item = &str> {
        self.images.iter().filter(|i| i.is_new).map(|i| i.uri.as_str())
    }

    /// Retained remote image references (to preserve on submit)
    pub fn existing_images(&self) -> impl Iterator<Item = &str> {
        self.images.iter().filter(|i| !i.is_new).map(|i| i.uri.as_str())
    }

    /// Removed remote image identifiers
    pub fn deleted_images(&self) -> &[String] {
        &self.deleted_images
    }

    /// Removed remote video URL, if any
    pub fn deleted_video_url(&self) -> Option<&str> {
        self.deleted_video_url.as_deref()
    }

    /// Current video attachment, if any
    pub fn video(&self) -> Option<&VideoAttachment> {
        self.video.as_ref()
    }

    /// Attach a picked or remote image
    pub fn add_image(&mut self, uri: impl Into<String>, is_new: bool) {
        self.images.push(ImageAttachment {
            uri: uri.into(),
            is_new,
        });
    }

    /// Remove the image at `index`
    ///
    /// New attachments vanish without a trace; existing ones land on the
    /// deleted list. Removal is idempotent with respect to the deleted list:
    /// an identifier is recorded at most once.
    pub fn remove_image(&mut self, index: usize) -> Result<RemovedAttachment, AttachmentError> {
        if index >= self.images.len() {
            return Err(AttachmentError::NoSuchImage(index));
        }

        let removed = self.images.remove(index);
        if removed.is_new {
            return Ok(RemovedAttachment::New);
        }

        if !self.deleted_images.contains(&removed.uri) {
            self.deleted_images.push(removed.uri.clone());
        }

        Ok(RemovedAttachment::Existing {
            identifier: removed.uri,
            file_id: None,
        })
    }

    /// Attach a video; the single slot must be empty
    pub fn set_video(&mut self, video: VideoAttachment) -> Result<(), AttachmentError> {
        if self.video.is_some() {
            return Err(AttachmentError::VideoSlotOccupied);
        }
        self.video = Some(video);
        Ok(())
    }

    /// Clear the video slot
    ///
    /// Removing a previously saved video records its URL for the backend;
    /// removing a video uploaded this session does not.
    pub fn remove_video(&mut self) -> Result<RemovedAttachment, AttachmentError> {
        let video = self.video.take().ok_or(AttachmentError::NoVideo)?;

        if video.is_new {
            return Ok(RemovedAttachment::New);
        }

        self.deleted_video_url = Some(video.video_url.clone());
        Ok(RemovedAttachment::Existing {
            identifier: video.video_url,
            file_id: video.video_id,
        })
    }

    /// Record a completed upload in the video slot, replacing nothing
    pub fn record_uploaded_video(
        &mut self,
        video_url: impl Into<String>,
        video_id: impl Into<String>,
    ) -> Result<(), AttachmentError> {
        self.set_video(VideoAttachment {
            video_url: video_url.into(),
            video_id: Some(video_id.into()),
            is_new: true,
        })
    }
}
