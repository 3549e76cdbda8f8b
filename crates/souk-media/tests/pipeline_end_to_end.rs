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

//! Full pipeline scenario: compress, verify, upload, and wire the result
//! into the listing's attachment state.

use souk_core::{AttachmentSet, VideoAttachment};
use souk_media::{NullPipelineObserver, PipelineConfig, VideoPipeline};
use souk_storage::MockStore;
use std::sync::Arc;
use std::time::Duration;

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        poll_attempts: 10,
        poll_delay: Duration::from_millis(2),
        max_video_secs: 120,
    }
}

#[tokio::test]
async fn test_upload_result_flows_into_form_state_exactly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("clip.mp4");
    tokio::fs::write(&input, vec![0x42u8; 4096]).await.expect("write");

    let store = MockStore::new();
    let pipeline = VideoPipeline::without_compression(Arc::new(store.clone()), fast_config());

    let uploaded = pipeline
        .run(
            &input,
            "videos/1692000000_abc123.mp4",
            "video/mp4",
            Arc::new(NullPipelineObserver),
        )
        .await
        .expect("pipeline run");

    // The listing form records exactly what the store returned.
    let mut attachments = AttachmentSet::new();
    attachments
        .record_uploaded_video(uploaded.public_url.clone(), uploaded.file_id.clone())
        .expect("record video");

    let video = attachments.video().expect("video present");
    assert_eq!(video.video_url, uploaded.public_url);
    assert_eq!(video.video_id.as_deref(), Some(uploaded.file_id.as_str()));
    assert!(video.is_new);
    assert!(uploaded
        .public_url
        .ends_with("/videos/1692000000_abc123.mp4"));
}

#[tokio::test]
async fn test_removing_uploaded_video_after_failed_delete_keeps_tombstone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("clip.mp4");
    tokio::fs::write(&input, vec![0x42u8; 1024]).await.expect("write");

    let store = MockStore::new();
    let pipeline = VideoPipeline::without_compression(Arc::new(store.clone()), fast_config());
    let uploaded = pipeline
        .run(
            &input,
            "videos/clip.mp4",
            "video/mp4",
            Arc::new(NullPipelineObserver),
        )
        .await
        .expect("pipeline run");

    // Simulate an edit session on a saved listing: the video is existing.
    let mut attachments = AttachmentSet::from_existing(
        Vec::new(),
        Some(VideoAttachment {
            video_url: uploaded.public_url.clone(),
            video_id: Some(uploaded.file_id.clone()),
            is_new: false,
        }),
    );

    // Remote delete fails, local removal must still leave the tombstone.
    store.fail_deletes(true);
    let removed = attachments.remove_video().expect("remove");
    let handle = souk_storage::spawn_best_effort_delete(
        Arc::new(store.clone()),
        souk_storage::DeleteTarget::ByName(uploaded.file_name.clone()),
    );
    handle.await.expect("join");

    assert!(attachments.video().is_none());
    assert_eq!(attachments.deleted_video_url(), Some(uploaded.public_url.as_str()));
    assert!(store.deleted_names().await.is_empty());
    drop(removed);
}
