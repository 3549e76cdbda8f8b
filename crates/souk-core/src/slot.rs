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

//! Per-operation state machines
//!
//! [`OperationSlot`] replaces the ad hoc "is submitting" boolean: an
//! operation may only begin from a quiescent state, so a double tap on
//! submit results in exactly one network call. [`VideoSlotState`] tracks the
//! single-video widget through its strictly sequential compress-then-upload
//! lifecycle.

use crate::error::SlotError;
use serde::{Deserialize, Serialize};

/// State of one user-initiated operation (submit, upload, report, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// Nothing running, nothing ran
    #[default]
    Idle,

    /// The operation is in flight; a second begin is rejected
    InProgress,

    /// The last run completed; a new run may begin
    Done,

    /// The last run failed; the user may retry from scratch
    Failed,
}

impl OperationState {
    /// Whether a new operation may start from this state
    pub const fn can_begin(self) -> bool {
        !matches!(self, OperationState::InProgress)
    }
}

/// Guard for one operation at a time
///
/// All failures leave the slot in `Failed`, from which `begin` is permitted,
/// so the UI always stays recoverable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSlot {
    state: OperationState,
}

impl OperationSlot {
    /// Create an idle slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Whether an operation is currently running
    pub fn in_progress(&self) -> bool {
        self.state == OperationState::InProgress
    }

    /// Start an operation; fails with [`SlotError::Busy`] while one runs
    pub fn begin(&mut self) -> Result<(), SlotError> {
        if !self.state.can_begin() {
            return Err(SlotError::Busy);
        }
        self.state = OperationState::InProgress;
        Ok(())
    }

    /// Mark the running operation complete
    pub fn complete(&mut self) -> Result<(), SlotError> {
        self.transition(OperationState::Done)
    }

    /// Mark the running operation failed
    pub fn fail(&mut self) -> Result<(), SlotError> {
        self.transition(OperationState::Failed)
    }

    fn transition(&mut self, to: OperationState) -> Result<(), SlotError> {
        if self.state != OperationState::InProgress {
            return Err(SlotError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

/// Lifecycle of the single-video widget
///
/// The happy path is `Empty → Compressing → Uploading → Uploaded`, with
/// `Uploaded → Empty` on removal. Compression may be skipped
/// (`Empty → Uploading`) and any in-flight state may fall back to `Empty` on
/// unrecoverable failure. Transitions are strictly sequential; there is no
/// concurrent compress+upload and no resumption of a partial upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSlotState {
    /// No video attached
    #[default]
    Empty,

    /// Client-side compression running
    Compressing,

    /// Bytes streaming to the storage provider
    Uploading,

    /// Upload finished; the slot holds a remote reference
    Uploaded,
}

impl VideoSlotState {
    /// States reachable from this one
    pub fn valid_transitions(self) -> &'static [VideoSlotState] {
        match self {
            // Uploading directly from Empty is the compression-skip path
            VideoSlotState::Empty => &[VideoSlotState::Compressing, VideoSlotState::Uploading],
            // Failure falls back to Empty; success moves to Uploading
            VideoSlotState::Compressing => &[VideoSlotState::Uploading, VideoSlotState::Empty],
            VideoSlotState::Uploading => &[VideoSlotState::Uploaded, VideoSlotState::Empty],
            VideoSlotState::Uploaded => &[VideoSlotState::Empty],
        }
    }

    /// Whether `to` is a permitted next state
    pub fn can_transition_to(self, to: VideoSlotState) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate and return the transition target
    pub fn transition_to(self, to: VideoSlotState) -> Result<VideoSlotState, SlotError> {
        if !self.can_transition_to(to) {
            return Err(SlotError::InvalidVideoTransition { from: self, to });
        }
        Ok(to)
    }

    /// Whether work is currently in flight
    pub const fn is_busy(self) -> bool {
        matches!(self, VideoSlotState::Compressing | VideoSlotState::Uploading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_begin_rejected() {
        let mut slot = OperationSlot::new();
        slot.begin().expect("first begin");
        assert_eq!(slot.begin(), Err(SlotError::Busy));
    }

    #[test]
    fn test_begin_allowed_after_completion() {
        let mut slot = OperationSlot::new();
        slot.begin().expect("begin");
        slot.complete().expect("complete");
        assert!(slot.begin().is_ok());
    }

    #[test]
    fn test_begin_allowed_after_failure() {
        let mut slot = OperationSlot::new();
        slot.begin().expect("begin");
        slot.fail().expect("fail");
        assert_eq!(slot.state(), OperationState::Failed);
        assert!(slot.begin().is_ok());
    }

    #[test]
    fn test_complete_without_begin_rejected() {
        let mut slot = OperationSlot::new();
        assert!(slot.complete().is_err());
        assert!(slot.fail().is_err());
    }

    #[test]
    fn test_video_happy_path() {
        let state = VideoSlotState::Empty;
        let state = state.transition_to(VideoSlotState::Compressing).expect("compress");
        let state = state.transition_to(VideoSlotState::Uploading).expect("upload");
        let state = state.transition_to(VideoSlotState::Uploaded).expect("uploaded");
        assert_eq!(state, VideoSlotState::Uploaded);
    }

    #[test]
    fn test_video_compression_skip_path() {
        assert!(VideoSlotState::Empty.can_transition_to(VideoSlotState::Uploading));
    }

    #[test]
    fn test_video_failure_fallbacks() {
        assert!(VideoSlotState::Compressing.can_transition_to(VideoSlotState::Empty));
        assert!(VideoSlotState::Uploading.can_transition_to(VideoSlotState::Empty));
    }

    #[test]
    fn test_video_invalid_transitions() {
        assert!(VideoSlotState::Empty
            .transition_to(VideoSlotState::Uploaded)
            .is_err());
        assert!(VideoSlotState::Uploaded
            .transition_to(VideoSlotState::Compressing)
            .is_err());
        assert!(VideoSlotState::Compressing
            .transition_to(VideoSlotState::Uploaded)
            .is_err());
    }
}
