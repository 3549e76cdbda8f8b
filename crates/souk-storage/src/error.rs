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

//! Storage error types

use thiserror::Error;

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from the object storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Transport-level HTTP failure (DNS, TLS, connection reset)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// `b2_authorize_account` rejected the credentials
    #[error("Account authorization failed (status {status}): {body}")]
    AuthFailed {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// `b2_get_upload_url` failed
    #[error("Could not obtain upload URL (status {status}): {body}")]
    UploadUrlFailed {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The upload POST was rejected
    #[error("Upload of '{file_name}' rejected (status {status}): {body}")]
    UploadFailed {
        /// Remote file name being uploaded
        file_name: String,
        /// HTTP status returned by the provider
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// A delete call failed
    #[error("Delete of '{file_name}' failed (status {status}): {body}")]
    DeleteFailed {
        /// Remote file name being deleted
        file_name: String,
        /// HTTP status returned by the provider
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The object to delete could not be found by name
    #[error("No stored file named '{0}'")]
    FileNotFound(String),

    /// The provider returned a body we could not parse
    #[error("Unparseable provider response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_context() {
        let e = StorageError::UploadFailed {
            file_name: "videos/clip.mp4".to_string(),
            status: 503,
            body: "service unavailable".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("videos/clip.mp4"));
        assert!(msg.contains("503"));
    }
}
