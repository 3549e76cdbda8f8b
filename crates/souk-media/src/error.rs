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

//! Media pipeline error types

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors from probing, compression, and the upload pipeline
#[derive(Error, Debug)]
pub enum MediaError {
    /// The input file does not exist or cannot be read
    #[error("Video file not found or inaccessible: {0}")]
    FileInaccessible(PathBuf),

    /// The video exceeds the duration limit
    #[error("Video is too long: {actual_secs}s exceeds the {max_secs}s limit")]
    TooLong {
        /// Measured duration, seconds
        actual_secs: u64,
        /// Configured limit, seconds
        max_secs: u64,
    },

    /// The compressor adapter reported failure
    #[error("Video compression failed: {0}")]
    CompressionFailed(String),

    /// The compressed output never became a non-empty file
    #[error("Compressed output never appeared after {attempts} checks")]
    OutputNeverAppeared {
        /// Number of polls performed before giving up
        attempts: u32,
    },

    /// An illegal pipeline state transition was attempted
    #[error(transparent)]
    Slot(#[from] souk_core::SlotError),

    /// The storage layer rejected the upload or delete
    #[error(transparent)]
    Storage(#[from] souk_storage::StorageError),

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Best-effort human-readable message for a failed pipeline run
///
/// Matches known substrings of the error text; anything unrecognized gets
/// the generic retry message.
pub fn user_message(error: &MediaError) -> &'static str {
    let text = error.to_string();
    if text.contains("authorization") || text.contains("Authorization") || text.contains("401") {
        "Authentication required. Please sign in again."
    } else if text.contains("upload URL") {
        "Failed to get upload URL. Please try again."
    } else if text.contains("too long") {
        "This video is too long to upload."
    } else {
        "Something went wrong. Please try again."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_substrings_map_to_specific_messages() {
        let auth = MediaError::Storage(souk_storage::StorageError::AuthFailed {
            status: 401,
            body: "bad key".to_string(),
        });
        assert_eq!(user_message(&auth), "Authentication required. Please sign in again.");

        let url = MediaError::Storage(souk_storage::StorageError::UploadUrlFailed {
            status: 503,
            body: "busy".to_string(),
        });
        assert_eq!(user_message(&url), "Failed to get upload URL. Please try again.");

        let long = MediaError::TooLong {
            actual_secs: 300,
            max_secs: 120,
        };
        assert_eq!(user_message(&long), "This video is too long to upload.");
    }

    #[test]
    fn test_unknown_errors_get_generic_message() {
        let e = MediaError::CompressionFailed("codec exploded".to_string());
        assert_eq!(user_message(&e), "Something went wrong. Please try again.");
    }
}
