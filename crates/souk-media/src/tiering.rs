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

//! Size-tiered compression profiles
//!
//! The profile is a pure function of input size. Bigger inputs get squeezed
//! harder: above 100 MB resolution drops to 720p at half quality; 50 MB and
//! up stays 1080p at 0.6; everything smaller gets the light 1080p/0.7 pass.

use std::fmt;

const MB: u64 = 1024 * 1024;

/// Which rung of the compression ladder a file lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionTier {
    /// Strictly below 50 MB
    Light,

    /// 50 MB up to and including 100 MB
    Medium,

    /// Strictly above 100 MB
    Large,
}

impl fmt::Display for CompressionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionTier::Light => write!(f, "light"),
            CompressionTier::Medium => write!(f, "medium"),
            CompressionTier::Large => write!(f, "large"),
        }
    }
}

impl CompressionTier {
    /// Tier for a file of the given size; boundaries fall in the medium tier
    pub fn for_size(size_bytes: u64) -> Self {
        if size_bytes > 100 * MB {
            CompressionTier::Large
        } else if size_bytes >= 50 * MB {
            CompressionTier::Medium
        } else {
            CompressionTier::Light
        }
    }
}

/// Target resolution and quality for one compression pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionProfile {
    /// Which tier produced this profile
    pub tier: CompressionTier,

    /// Output height ceiling in pixels
    pub max_height: u32,

    /// Encoder quality factor in (0, 1]
    pub quality: f32,
}

impl CompressionProfile {
    /// Profile for a file of the given size
    pub fn for_size(size_bytes: u64) -> Self {
        let tier = CompressionTier::for_size(size_bytes);
        match tier {
            CompressionTier::Large => CompressionProfile {
                tier,
                max_height: 720,
                quality: 0.5,
            },
            CompressionTier::Medium => CompressionProfile {
                tier,
                max_height: 1080,
                quality: 0.6,
            },
            CompressionTier::Light => CompressionProfile {
                tier,
                max_height: 1080,
                quality: 0.7,
            },
        }
    }
}
