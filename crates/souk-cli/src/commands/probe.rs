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

//! Probe command - inspect a local video without uploading

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::HumanBytes;
use souk_media::{probe_video, CompressionProfile};
use std::path::PathBuf;

/// Print size, duration, and the compression tier a file would get
#[derive(Parser, Debug)]
pub struct ProbeCmd {
    /// Local video file
    pub file: PathBuf,
}

impl ProbeCmd {
    pub async fn execute(self) -> Result<()> {
        let probe = probe_video(&self.file).await?;
        let profile = CompressionProfile::for_size(probe.size_bytes);

        println!(
            "{}  {}",
            style("Size:").bold(),
            HumanBytes(probe.size_bytes)
        );
        match probe.duration_secs {
            Some(secs) => println!("{}  {secs:.1}s", style("Duration:").bold()),
            None => println!("{}  unknown (not a parseable MP4)", style("Duration:").bold()),
        }
        println!(
            "{}  {} ({}p, quality {})",
            style("Tier:").bold(),
            profile.tier,
            profile.max_height,
            profile.quality
        );
        Ok(())
    }
}
