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

//! Local video probing
//!
//! Size comes from file metadata; duration comes from a best-effort MP4
//! container parse. Duration is advisory (used for the "too long" check) so
//! an unparseable container degrades to `None` rather than failing the
//! probe.

use crate::error::{MediaError, MediaResult};
use std::path::Path;
use tracing::debug;

/// What we know about a local video file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProbe {
    /// File size in bytes
    pub size_bytes: u64,

    /// Container duration in seconds, when the MP4 parse succeeds
    pub duration_secs: Option<f64>,
}

impl VideoProbe {
    /// Enforce the configured duration ceiling
    ///
    /// Unknown duration passes; the limit only binds when we could measure.
    pub fn check_duration(&self, max_secs: u64) -> MediaResult<()> {
        if let Some(duration) = self.duration_secs {
            if duration > max_secs as f64 {
                return Err(MediaError::TooLong {
                    actual_secs: duration.round() as u64,
                    max_secs,
                });
            }
        }
        Ok(())
    }
}

/// Probe size and duration of a local file
pub async fn probe_video(path: &Path) -> MediaResult<VideoProbe> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| MediaError::FileInaccessible(path.to_path_buf()))?;
    let size_bytes = metadata.len();

    let duration_secs = match tokio::fs::read(path).await {
        Ok(bytes) => parse_mp4_duration(&bytes),
        Err(_) => None,
    };

    debug!(path = %path.display(), size_bytes, ?duration_secs, "Probed video");
    Ok(VideoProbe {
        size_bytes,
        duration_secs,
    })
}

/// Best-effort MP4 duration from the movie header
fn parse_mp4_duration(bytes: &[u8]) -> Option<f64> {
    let mut cursor = std::io::Cursor::new(bytes);
    let context = match mp4parse::read_mp4(&mut cursor) {
        Ok(context) => context,
        Err(e) => {
            debug!(error = ?e, "MP4 parse failed; duration unknown");
            return None;
        }
    };

    context.tracks.iter().find_map(|track| {
        let duration = track.duration?;
        let timescale = track.timescale?;
        if timescale.0 == 0 {
            return None;
        }
        Some(duration.0 as f64 / timescale.0 as f64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_reports_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, vec![0u8; 2048]).await.expect("write");

        let probe = probe_video(&path).await.expect("probe");
        assert_eq!(probe.size_bytes, 2048);
    }

    #[tokio::test]
    async fn test_probe_missing_file_is_distinguishable() {
        let result = probe_video(Path::new("/nonexistent/clip.mp4")).await;
        assert!(matches!(result, Err(MediaError::FileInaccessible(_))));
    }

    #[tokio::test]
    async fn test_garbage_container_degrades_to_unknown_duration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, b"this is not an mp4 container")
            .await
            .expect("write");

        let probe = probe_video(&path).await.expect("probe");
        assert_eq!(probe.duration_secs, None);
    }

    #[test]
    fn test_duration_limit_binds_only_when_measured() {
        let unknown = VideoProbe {
            size_bytes: 1,
            duration_secs: None,
        };
        assert!(unknown.check_duration(120).is_ok());

        let short = VideoProbe {
            size_bytes: 1,
            duration_secs: Some(90.0),
        };
        assert!(short.check_duration(120).is_ok());

        let long = VideoProbe {
            size_bytes: 1,
            duration_secs: Some(300.4),
        };
        let err = long.check_duration(120).expect_err("too long");
        assert!(matches!(
            err,
            MediaError::TooLong {
                actual_secs: 300,
                max_secs: 120
            }
        ));
    }
}
