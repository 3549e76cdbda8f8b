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

//! Client-side state for the Souk marketplace
//!
//! This crate holds the transient, in-memory entities every listing form
//! works with:
//!
//! - [`ListingDraft`]: the flat field map a category form edits
//! - [`AttachmentSet`]: image slots and the single video slot, with the
//!   deleted-identifier bookkeeping the backend reconciles at submit time
//! - [`OperationSlot`]: the per-operation state machine that replaces ad hoc
//!   "is submitting" booleans and makes double-submit prevention testable
//! - [`VideoSlotState`]: the video widget's compress/upload lifecycle
//! - [`KeyValueStore`]: the device-local persistence seam (auth token, user
//!   id, cached default location)
//!
//! Everything here is UI-scoped: created when a form mounts, discarded on
//! navigation or successful submission. The only value that outlives a form
//! is the cached default location, which is last-write-wins with no expiry.

pub mod attachments;
pub mod draft;
pub mod error;
pub mod kv;
pub mod location;
pub mod slot;

pub use attachments::{AttachmentSet, ImageAttachment, RemovedAttachment, VideoAttachment};
pub use draft::{FieldValue, ListingDraft};
pub use error::{AttachmentError, CoreResult, DraftError, KvError, SlotError};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use kv::{AUTH_TOKEN_KEY, DEFAULT_LOCATION_KEY, USER_ID_KEY};
pub use location::{DefaultLocation, LocationCache};
pub use slot::{OperationSlot, OperationState, VideoSlotState};
