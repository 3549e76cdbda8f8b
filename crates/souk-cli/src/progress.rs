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

//! Terminal progress for the upload pipeline
//!
//! Progress goes to stderr so stdout stays clean for piping the resulting
//! URL.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use souk_core::VideoSlotState;
use souk_media::PipelineObserver;
use std::time::Duration;

/// Indicatif-backed pipeline observer
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    /// Create a bar, hidden when quiet
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.green/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                .expect("valid progress template")
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        TerminalProgress { bar }
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for TerminalProgress {
    fn on_state(&self, state: VideoSlotState) {
        let msg = match state {
            VideoSlotState::Empty => "Idle",
            VideoSlotState::Compressing => "Compressing",
            VideoSlotState::Uploading => "Uploading",
            VideoSlotState::Uploaded => "Done",
        };
        self.bar.set_message(msg);
    }

    fn on_compression_percent(&self, percent: u8) {
        self.bar.set_length(100);
        self.bar.set_position(percent as u64);
    }

    fn on_upload_progress(&self, bytes_sent: u64, total_bytes: u64) {
        self.bar.set_length(total_bytes);
        self.bar.set_position(bytes_sent);
    }
}
