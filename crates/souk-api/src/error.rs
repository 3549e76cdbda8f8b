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

//! API client error types

use thiserror::Error;

/// Result alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the backend, Places, and YouTube clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level HTTP failure
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// No bearer token in the key-value store
    #[error("Authentication required: no stored token")]
    Unauthorized,

    /// The backend returned a non-success status
    #[error("Request failed (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// A response body could not be parsed
    #[error("Unparseable response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The Places API returned a non-OK status field
    #[error("Places API returned status '{0}'")]
    PlacesStatus(String),

    /// The resumable session response carried no Location header
    #[error("Resumable upload session response had no Location header")]
    MissingSessionUri,

    /// Another submission is already in flight
    #[error(transparent)]
    Slot(#[from] souk_core::SlotError),

    /// The key-value store failed
    #[error(transparent)]
    Kv(#[from] souk_core::KvError),

    /// The draft failed validation
    #[error(transparent)]
    Draft(#[from] souk_core::DraftError),

    /// Reading a local attachment failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
