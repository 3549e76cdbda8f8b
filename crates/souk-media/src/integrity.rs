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

//! Compressed-output integrity check
//!
//! Platform transcoders report completion before the container is fully
//! flushed, so the output is polled until it is a non-empty file. An output
//! that never materializes, or that is no smaller than the input, loses to
//! the original.

use crate::error::{MediaError, MediaResult};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Poll `path` until it exists with a non-zero size
///
/// Returns the observed size. At most `attempts` stat calls are made,
/// `delay` apart; exhausting them is a compression failure.
pub async fn wait_for_nonempty(path: &Path, attempts: u32, delay: Duration) -> MediaResult<u64> {
    for attempt in 1..=attempts {
        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.len() > 0 => {
                debug!(attempt, size = metadata.len(), "Compressed output ready");
                return Ok(metadata.len());
            }
            _ => {
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(MediaError::OutputNeverAppeared { attempts })
}

/// Pick which file to upload after a compression pass
///
/// The compressed file wins only when it is strictly smaller than the
/// original; otherwise the original bytes are uploaded unchanged.
pub fn pick_smaller<'a>(
    original: &'a Path,
    original_size: u64,
    compressed: &'a Path,
    compressed_size: u64,
) -> &'a Path {
    if compressed_size >= original_size {
        warn!(
            original_size,
            compressed_size, "Compression did not shrink the file; uploading original"
        );
        original
    } else {
        let saved_pct = 100 - (compressed_size * 100 / original_size.max(1));
        info!(original_size, compressed_size, saved_pct, "Using compressed output");
        compressed
    }
}
