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

//! Video processing for Souk
//!
//! Probes local videos, picks a size-tiered compression profile, verifies
//! the compressed output, and drives the compress-then-upload pipeline
//! against an object store. Compression is best-effort: every failure path
//! falls back to uploading the original bytes.
//!
//! # Modules
//!
//! - [`probe`]: file size and best-effort MP4 duration
//! - [`tiering`]: the size → profile table
//! - [`compressor`]: the transcoder seam and pass-through implementation
//! - [`integrity`]: non-empty polling and smaller-file selection
//! - [`pipeline`]: the orchestrator

pub mod compressor;
pub mod error;
pub mod integrity;
pub mod pipeline;
pub mod probe;
pub mod tiering;

pub use compressor::{CompressionProgress, PassthroughCompressor, VideoCompressor};
pub use error::{user_message, MediaError, MediaResult};
pub use pipeline::{NullPipelineObserver, PipelineConfig, PipelineObserver, VideoPipeline};
pub use probe::{probe_video, VideoProbe};
pub use tiering::{CompressionProfile, CompressionTier};
