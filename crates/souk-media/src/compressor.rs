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

//! Compressor adapter seam
//!
//! The actual transcoder is platform-provided; this crate only defines the
//! seam. Compression is best-effort throughout the pipeline: a failing or
//! absent compressor falls back to uploading the original bytes.

use crate::error::MediaResult;
use crate::tiering::CompressionProfile;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

/// Receives compression progress as a percentage in `[0, 100]`
pub trait CompressionProgress: Send + Sync {
    /// Report percent complete
    fn on_percent(&self, percent: u8);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCompressionProgress;

impl CompressionProgress for NullCompressionProgress {
    fn on_percent(&self, _percent: u8) {}
}

/// Transcodes a video file down to a profile
#[async_trait]
pub trait VideoCompressor: Send + Sync + Debug {
    /// Compress `input` into `output` using `profile`
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        profile: CompressionProfile,
        progress: Arc<dyn CompressionProgress>,
    ) -> MediaResult<()>;
}

/// Compressor that copies the input unchanged
///
/// Produces an output the same size as the input, which the integrity check
/// then rejects in favor of the original. The net effect is the
/// compression-skip path with full pipeline coverage.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCompressor;

#[async_trait]
impl VideoCompressor for PassthroughCompressor {
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        _profile: CompressionProfile,
        progress: Arc<dyn CompressionProgress>,
    ) -> MediaResult<()> {
        progress.on_percent(0);
        tokio::fs::copy(input, output).await?;
        progress.on_percent(100);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_copies_bytes_and_reports_completion() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.mp4");
        let output = dir.path().join("out.mp4");
        tokio::fs::write(&input, b"original bytes").await.expect("write");

        #[derive(Debug, Default)]
        struct Last(std::sync::Mutex<Option<u8>>);
        impl CompressionProgress for Last {
            fn on_percent(&self, percent: u8) {
                *self.0.lock().expect("lock") = Some(percent);
            }
        }

        let progress = Arc::new(Last::default());
        PassthroughCompressor
            .compress(
                &input,
                &output,
                CompressionProfile::for_size(14),
                progress.clone(),
            )
            .await
            .expect("compress");

        let copied = tokio::fs::read(&output).await.expect("read");
        assert_eq!(copied, b"original bytes");
        assert_eq!(*progress.0.lock().expect("lock"), Some(100));
    }
}
