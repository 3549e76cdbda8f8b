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

//! Upload command - run the compress-then-upload pipeline

use crate::commands::load_config;
use crate::progress::TerminalProgress;
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use souk_media::{
    user_message, PassthroughCompressor, PipelineConfig, VideoPipeline,
};
use souk_storage::{B2Client, B2Credentials};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Upload a local video through the full pipeline
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Upload with the default remote name (videos/<unix-time>_<stem>.mp4)
    souk upload clip.mp4

    # Upload under an explicit remote name
    souk upload clip.mp4 --remote-name videos/demo.mp4

    # Skip the compression stage entirely
    souk upload clip.mp4 --skip-compression")]
pub struct UploadCmd {
    /// Local video file
    pub file: PathBuf,

    /// Remote object name; defaults to a timestamped name under videos/
    #[arg(long)]
    pub remote_name: Option<String>,

    /// MIME type sent with the upload
    #[arg(long, default_value = "video/mp4")]
    pub content_type: String,

    /// Upload the original bytes without a compression pass
    #[arg(long)]
    pub skip_compression: bool,

    /// Config file path (defaults to souk.toml, then environment)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl UploadCmd {
    pub async fn execute(self, quiet: bool) -> Result<()> {
        let config = load_config(self.config.as_ref()).await?;

        let store = B2Client::new(B2Credentials {
            key_id: config.b2.key_id.clone(),
            application_key: config.b2.application_key.clone(),
            bucket_id: config.b2.bucket_id.clone(),
            bucket_name: config.b2.bucket_name.clone(),
        })
        .context("building B2 client")?;

        let pipeline_config = PipelineConfig {
            poll_attempts: config.media.poll_attempts,
            poll_delay: Duration::from_millis(config.media.poll_delay_ms),
            max_video_secs: config.media.max_video_secs,
        };
        let pipeline = if self.skip_compression {
            VideoPipeline::without_compression(Arc::new(store), pipeline_config)
        } else {
            VideoPipeline::new(
                Arc::new(store),
                Arc::new(PassthroughCompressor),
                pipeline_config,
            )
        };

        let remote_name = self.remote_name.unwrap_or_else(|| default_remote_name(&self.file));
        let progress = Arc::new(TerminalProgress::new(quiet));

        let result = pipeline
            .run(&self.file, &remote_name, &self.content_type, progress.clone())
            .await;
        progress.finish();

        match result {
            Ok(uploaded) => {
                if !quiet {
                    eprintln!(
                        "{} {} ({} bytes)",
                        style("Uploaded").green().bold(),
                        uploaded.file_name,
                        uploaded.size
                    );
                }
                println!("{}", uploaded.public_url);
                Ok(())
            }
            Err(e) => {
                eprintln!("{} {}", style("Error:").red().bold(), user_message(&e));
                Err(e.into())
            }
        }
    }
}

fn default_remote_name(file: &std::path::Path) -> String {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("videos/{now}_{stem}.mp4")
}
