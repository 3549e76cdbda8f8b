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

//! Compress-then-upload pipeline
//!
//! One video at a time, strictly sequential: probe, compress to the size
//! tier, verify the output, upload whichever file won, report every stage
//! through a [`PipelineObserver`]. No cancellation, no retries, no
//! resumption; a failed run falls back to the empty slot and the caller may
//! start over.

use crate::compressor::{CompressionProgress, VideoCompressor};
use crate::error::{MediaError, MediaResult};
use crate::integrity::{pick_smaller, wait_for_nonempty};
use crate::probe::probe_video;
use crate::tiering::CompressionProfile;
use souk_core::VideoSlotState;
use souk_storage::{ObjectStore, ProgressObserver, UploadedFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Pipeline tuning knobs
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Max stat calls while waiting for the compressed output
    pub poll_attempts: u32,

    /// Delay between stat calls
    pub poll_delay: Duration,

    /// Duration ceiling enforced before any work starts
    pub max_video_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            poll_attempts: 10,
            poll_delay: Duration::from_millis(500),
            max_video_secs: 120,
        }
    }
}

/// Receives pipeline stage and progress notifications
///
/// All methods default to no-ops so observers implement only what they
/// display.
pub trait PipelineObserver: Send + Sync {
    /// The video slot moved to a new state
    fn on_state(&self, _state: VideoSlotState) {}

    /// Compression progress in `[0, 100]`
    fn on_compression_percent(&self, _percent: u8) {}

    /// Upload progress as `(bytes_sent, total_bytes)`
    fn on_upload_progress(&self, _bytes_sent: u64, _total_bytes: u64) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPipelineObserver;

impl PipelineObserver for NullPipelineObserver {}

// Adapts a PipelineObserver to the storage and compressor progress seams.
struct ObserverBridge(Arc<dyn PipelineObserver>);

impl ProgressObserver for ObserverBridge {
    fn on_progress(&self, bytes_sent: u64, total_bytes: u64) {
        self.0.on_upload_progress(bytes_sent, total_bytes);
    }
}

impl CompressionProgress for ObserverBridge {
    fn on_percent(&self, percent: u8) {
        self.0.on_compression_percent(percent);
    }
}

/// The compress-then-upload orchestrator
#[derive(Debug)]
pub struct VideoPipeline {
    store: Arc<dyn ObjectStore>,
    compressor: Option<Arc<dyn VideoCompressor>>,
    config: PipelineConfig,
}

impl VideoPipeline {
    /// Pipeline with compression enabled
    pub fn new(
        store: Arc<dyn ObjectStore>,
        compressor: Arc<dyn VideoCompressor>,
        config: PipelineConfig,
    ) -> Self {
        VideoPipeline {
            store,
            compressor: Some(compressor),
            config,
        }
    }

    /// Pipeline that uploads originals directly
    pub fn without_compression(store: Arc<dyn ObjectStore>, config: PipelineConfig) -> Self {
        VideoPipeline {
            store,
            compressor: None,
            config,
        }
    }

    /// Run the full pipeline on one local video
    ///
    /// Returns the stored file on success. On failure the observer sees the
    /// slot fall back to [`VideoSlotState::Empty`] before the error is
    /// returned.
    #[instrument(skip(self, observer), fields(remote_name = %remote_name))]
    pub async fn run(
        &self,
        input: &Path,
        remote_name: &str,
        content_type: &str,
        observer: Arc<dyn PipelineObserver>,
    ) -> MediaResult<UploadedFile> {
        let probe = probe_video(input).await?;
        probe.check_duration(self.config.max_video_secs)?;

        let profile = CompressionProfile::for_size(probe.size_bytes);
        info!(
            size = probe.size_bytes,
            tier = %profile.tier,
            max_height = profile.max_height,
            "Starting video pipeline"
        );

        let mut state = VideoSlotState::Empty;
        let bridge = Arc::new(ObserverBridge(Arc::clone(&observer)));

        let (source, scratch) = match &self.compressor {
            Some(compressor) => {
                state = state.transition_to(VideoSlotState::Compressing)?;
                observer.on_state(state);

                let output = scratch_path(input);
                let source = self
                    .compress_with_fallback(compressor.as_ref(), input, &output, probe, profile, &bridge)
                    .await;
                (source, Some(output))
            }
            None => (input.to_path_buf(), None),
        };

        state = state.transition_to(VideoSlotState::Uploading)?;
        observer.on_state(state);

        let upload_result = self
            .store
            .upload(
                &source,
                remote_name,
                content_type,
                Arc::clone(&bridge) as Arc<dyn ProgressObserver>,
            )
            .await;

        if let Some(scratch) = scratch {
            let _ = tokio::fs::remove_file(&scratch).await;
        }

        match upload_result {
            Ok(uploaded) => {
                state = state.transition_to(VideoSlotState::Uploaded)?;
                observer.on_state(state);
                info!(file_id = %uploaded.file_id, url = %uploaded.public_url, "Video pipeline complete");
                Ok(uploaded)
            }
            Err(e) => {
                let state = state.transition_to(VideoSlotState::Empty)?;
                observer.on_state(state);
                Err(MediaError::Storage(e))
            }
        }
    }

    /// Compress and verify; any failure quietly yields the original path
    async fn compress_with_fallback(
        &self,
        compressor: &dyn VideoCompressor,
        input: &Path,
        output: &Path,
        probe: crate::probe::VideoProbe,
        profile: CompressionProfile,
        bridge: &Arc<ObserverBridge>,
    ) -> PathBuf {
        let progress = Arc::clone(bridge) as Arc<dyn CompressionProgress>;
        if let Err(e) = compressor.compress(input, output, profile, progress).await {
            warn!(error = %e, "Compression failed; uploading original");
            return input.to_path_buf();
        }

        match wait_for_nonempty(output, self.config.poll_attempts, self.config.poll_delay).await {
            Ok(compressed_size) => {
                pick_smaller(input, probe.size_bytes, output, compressed_size).to_path_buf()
            }
            Err(e) => {
                warn!(error = %e, "Compressed output missing; uploading original");
                input.to_path_buf()
            }
        }
    }
}

fn scratch_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    input.with_file_name(format!("{stem}.compressed.mp4"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compressor::PassthroughCompressor;
    use async_trait::async_trait;
    use souk_storage::MockStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingObserver {
        states: Mutex<Vec<VideoSlotState>>,
        last_progress: Mutex<Option<(u64, u64)>>,
    }

    impl PipelineObserver for CapturingObserver {
        fn on_state(&self, state: VideoSlotState) {
            self.states.lock().expect("lock").push(state);
        }

        fn on_upload_progress(&self, bytes_sent: u64, total_bytes: u64) {
            *self.last_progress.lock().expect("lock") = Some((bytes_sent, total_bytes));
        }
    }

    /// Compressor that always errors
    #[derive(Debug)]
    struct FailingCompressor;

    #[async_trait]
    impl VideoCompressor for FailingCompressor {
        async fn compress(
            &self,
            _input: &Path,
            _output: &Path,
            _profile: CompressionProfile,
            _progress: Arc<dyn CompressionProgress>,
        ) -> MediaResult<()> {
            Err(MediaError::CompressionFailed("transcoder crashed".to_string()))
        }
    }

    /// Compressor that halves the input
    #[derive(Debug)]
    struct HalvingCompressor;

    #[async_trait]
    impl VideoCompressor for HalvingCompressor {
        async fn compress(
            &self,
            input: &Path,
            output: &Path,
            _profile: CompressionProfile,
            _progress: Arc<dyn CompressionProgress>,
        ) -> MediaResult<()> {
            let bytes = tokio::fs::read(input).await?;
            tokio::fs::write(output, &bytes[..bytes.len() / 2]).await?;
            Ok(())
        }
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            poll_attempts: 10,
            poll_delay: Duration::from_millis(2),
            max_video_secs: 120,
        }
    }

    async fn input_file(dir: &tempfile::TempDir, size: usize) -> PathBuf {
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, vec![0x5au8; size]).await.expect("write");
        path
    }

    #[tokio::test]
    async fn test_happy_path_uploads_compressed_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 1000).await;
        let store = MockStore::new();
        let observer = Arc::new(CapturingObserver::default());

        let pipeline = VideoPipeline::new(
            Arc::new(store.clone()),
            Arc::new(HalvingCompressor),
            fast_config(),
        );
        let uploaded = pipeline
            .run(&input, "videos/clip.mp4", "video/mp4", observer.clone())
            .await
            .expect("run");

        assert_eq!(uploaded.size, 500);
        assert_eq!(store.uploads().await[0].size, 500);
        assert_eq!(
            *observer.states.lock().expect("lock"),
            vec![
                VideoSlotState::Compressing,
                VideoSlotState::Uploading,
                VideoSlotState::Uploaded
            ]
        );
        assert_eq!(*observer.last_progress.lock().expect("lock"), Some((500, 500)));
    }

    #[tokio::test]
    async fn test_failing_compressor_falls_back_to_original() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 1000).await;
        let store = MockStore::new();

        let pipeline = VideoPipeline::new(
            Arc::new(store.clone()),
            Arc::new(FailingCompressor),
            fast_config(),
        );
        let uploaded = pipeline
            .run(
                &input,
                "videos/clip.mp4",
                "video/mp4",
                Arc::new(NullPipelineObserver),
            )
            .await
            .expect("run");

        // The original file goes up, byte for byte.
        assert_eq!(uploaded.size, 1000);
        let original = tokio::fs::read(&input).await.expect("read input");
        assert_eq!(store.uploads().await[0].body, original);
    }

    #[tokio::test]
    async fn test_non_shrinking_output_falls_back_to_original() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 1000).await;
        let store = MockStore::new();

        // Passthrough output is exactly the input size, so it must lose.
        let pipeline = VideoPipeline::new(
            Arc::new(store.clone()),
            Arc::new(PassthroughCompressor),
            fast_config(),
        );
        let uploaded = pipeline
            .run(
                &input,
                "videos/clip.mp4",
                "video/mp4",
                Arc::new(NullPipelineObserver),
            )
            .await
            .expect("run");

        assert_eq!(uploaded.size, 1000);
        let original = tokio::fs::read(&input).await.expect("read input");
        assert_eq!(store.uploads().await[0].body, original);
    }

    #[tokio::test]
    async fn test_compression_skip_path_states() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 300).await;
        let store = MockStore::new();
        let observer = Arc::new(CapturingObserver::default());

        let pipeline = VideoPipeline::without_compression(Arc::new(store), fast_config());
        pipeline
            .run(&input, "videos/clip.mp4", "video/mp4", observer.clone())
            .await
            .expect("run");

        assert_eq!(
            *observer.states.lock().expect("lock"),
            vec![VideoSlotState::Uploading, VideoSlotState::Uploaded]
        );
    }

    #[tokio::test]
    async fn test_upload_failure_falls_back_to_empty_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 300).await;
        let store = MockStore::new();
        store.fail_uploads(true);
        let observer = Arc::new(CapturingObserver::default());

        let pipeline = VideoPipeline::without_compression(Arc::new(store), fast_config());
        let result = pipeline
            .run(&input, "videos/clip.mp4", "video/mp4", observer.clone())
            .await;

        assert!(matches!(result, Err(MediaError::Storage(_))));
        assert_eq!(
            observer.states.lock().expect("lock").last(),
            Some(&VideoSlotState::Empty)
        );
    }

    #[tokio::test]
    async fn test_missing_input_aborts_before_any_state_change() {
        let store = MockStore::new();
        let observer = Arc::new(CapturingObserver::default());
        let pipeline = VideoPipeline::without_compression(Arc::new(store.clone()), fast_config());

        let result = pipeline
            .run(
                Path::new("/nonexistent/clip.mp4"),
                "videos/clip.mp4",
                "video/mp4",
                observer.clone(),
            )
            .await;

        assert!(matches!(result, Err(MediaError::FileInaccessible(_))));
        assert!(observer.states.lock().expect("lock").is_empty());
        assert!(store.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn test_public_url_reaches_caller_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 100).await;
        let store = MockStore::new();

        let pipeline = VideoPipeline::without_compression(Arc::new(store), fast_config());
        let uploaded = pipeline
            .run(
                &input,
                "videos/1692000000_abc123.mp4",
                "video/mp4",
                Arc::new(NullPipelineObserver),
            )
            .await
            .expect("run");

        assert_eq!(
            uploaded.public_url,
            "https://mock.store/file/mock-bucket/videos/1692000000_abc123.mp4"
        );
        assert_eq!(uploaded.file_name, "videos/1692000000_abc123.mp4");
    }

    #[tokio::test]
    async fn test_scratch_file_removed_after_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = input_file(&dir, 1000).await;
        let store = MockStore::new();

        let pipeline = VideoPipeline::new(
            Arc::new(store),
            Arc::new(HalvingCompressor),
            fast_config(),
        );
        pipeline
            .run(
                &input,
                "videos/clip.mp4",
                "video/mp4",
                Arc::new(NullPipelineObserver),
            )
            .await
            .expect("run");

        assert!(!scratch_path(&input).exists());
    }
}
