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

//! Error types for client-side state

use crate::slot::{OperationState, VideoSlotState};
use thiserror::Error;

/// Result alias for fallible core operations
pub type CoreResult<T> = Result<T, KvError>;

/// Draft validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// A required form field is empty or absent
    #[error("required field '{0}' is missing")]
    MissingField(String),
}

/// Attachment bookkeeping errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    /// The single video slot already holds an attachment
    #[error("a video is already attached; remove it first")]
    VideoSlotOccupied,

    /// No image exists at the given position
    #[error("no image attachment at index {0}")]
    NoSuchImage(usize),

    /// The video slot is empty
    #[error("no video attached")]
    NoVideo,
}

/// Operation slot errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// An operation is already running in this slot
    #[error("operation already in progress")]
    Busy,

    /// The requested transition is not permitted from the current state
    #[error("invalid operation transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: OperationState,
        to: OperationState,
    },

    /// The requested video slot transition is not permitted
    #[error("invalid video slot transition from {from:?} to {to:?}")]
    InvalidVideoTransition {
        from: VideoSlotState,
        to: VideoSlotState,
    },
}

/// Key-value store errors
#[derive(Error, Debug)]
pub enum KvError {
    /// Underlying storage read/write failed
    #[error("key-value store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be serialized or parsed
    #[error("key-value serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
