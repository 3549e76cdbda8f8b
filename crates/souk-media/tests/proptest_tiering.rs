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
#![allow(clippy::unwrap_used)]
//! Property-Based Tests for Compression Tiering
//!
//! The profile must be a total, pure function of size that always lands on
//! one of the three table rows, and squeezing must never relax as files grow.

use proptest::prelude::*;
use souk_media::{CompressionProfile, CompressionTier};

const MB: u64 = 1024 * 1024;

fn arb_size() -> impl Strategy<Value = u64> {
    // Cluster around the tier boundaries plus a broad range.
    prop_oneof![
        0u64..(4 * 1024 * MB),
        (49 * MB)..(51 * MB),
        (99 * MB)..(101 * MB + 2),
    ]
}

#[test]
fn proptest_profile_always_matches_one_table_row() {
    proptest!(|(size in arb_size())| {
        let profile = CompressionProfile::for_size(size);
        let row = (profile.tier, profile.max_height, profile.quality);
        prop_assert!(
            row == (CompressionTier::Light, 1080, 0.7)
                || row == (CompressionTier::Medium, 1080, 0.6)
                || row == (CompressionTier::Large, 720, 0.5)
        );
    });
}

#[test]
fn proptest_tier_bands_are_exact() {
    proptest!(|(size in arb_size())| {
        let expected = if size > 100 * MB {
            CompressionTier::Large
        } else if size >= 50 * MB {
            CompressionTier::Medium
        } else {
            CompressionTier::Light
        };
        prop_assert_eq!(CompressionProfile::for_size(size).tier, expected);
    });
}

#[test]
fn proptest_quality_never_increases_with_size() {
    proptest!(|(a in arb_size(), b in arb_size())| {
        let (small, big) = if a <= b { (a, b) } else { (b, a) };
        let small_profile = CompressionProfile::for_size(small);
        let big_profile = CompressionProfile::for_size(big);
        prop_assert!(big_profile.quality <= small_profile.quality);
        prop_assert!(big_profile.max_height <= small_profile.max_height);
    });
}
