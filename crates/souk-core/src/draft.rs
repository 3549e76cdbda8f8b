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

//! Listing draft: the flat field map behind every category form
//!
//! A draft is created blank when a listing form mounts, or pre-populated
//! from a fetched listing in edit mode. Fields are mutated one at a time by
//! user input and the whole draft is discarded on navigation away or after a
//! successful submit. The only validation is ad hoc per form: the caller
//! names its required fields and the draft reports the first empty one.

use crate::error::DraftError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single form field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text (brand, description, address, ...)
    Text(String),
    /// Numeric input (year, price, kilometers, ...)
    Number(f64),
    /// Toggle (e.g. `show_phone`)
    Flag(bool),
    /// Multi-select (features, amenities, ...)
    List(Vec<String>),
}

impl FieldValue {
    /// Render the value the way the submission form encodes it
    pub fn as_form_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                // Integers print without a trailing ".0"
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Flag(b) => if *b { "1" } else { "0" }.to_string(),
            FieldValue::List(items) => items.join(","),
        }
    }

    /// A field counts as empty when it carries no user input
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Flag(_) => false,
            FieldValue::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// In-memory draft of a listing form
///
/// `category_id`, `guard_name`, and `post_type` travel with every submission
/// alongside the free-form field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    /// Category this listing belongs to
    pub category_id: Option<u64>,

    /// Backend guard name (role scope) for the submission
    pub guard_name: String,

    /// Post type discriminator ("sell", "rent", ...)
    pub post_type: String,

    /// Free-form field name → value map
    fields: BTreeMap<String, FieldValue>,
}

impl ListingDraft {
    /// Create a blank draft for a new listing
    pub fn new(category_id: u64, guard_name: impl Into<String>, post_type: impl Into<String>) -> Self {
        ListingDraft {
            category_id: Some(category_id),
            guard_name: guard_name.into(),
            post_type: post_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Pre-populate a draft from an existing listing (edit mode)
    pub fn from_fields(
        category_id: u64,
        guard_name: impl Into<String>,
        post_type: impl Into<String>,
        fields: impl IntoIterator<Item = (String, FieldValue)>,
    ) -> Self {
        ListingDraft {
            category_id: Some(category_id),
            guard_name: guard_name.into(),
            post_type: post_type.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Set (or overwrite) a field
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Read a field
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Remove a field, returning its previous value
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the draft holds no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in stable (sorted) order, rendered as form strings
    pub fn form_fields(&self) -> impl Iterator<Item = (&str, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_form_value()))
    }

    /// Check that every named field is present and non-empty
    ///
    /// Returns the first missing field, matching the per-form ad hoc checks
    /// the listing screens perform before submit.
    pub fn validate(&self, required: &[&str]) -> Result<(), DraftError> {
        for name in required {
            match self.fields.get(*name) {
                Some(value) if !value.is_empty() => {}
                _ => return Err(DraftError::MissingField((*name).to_string())),
            }
        }
        Ok(())
    }

    /// Discard all user input, keeping the category/guard/type identity
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_fields() {
        let mut draft = ListingDraft::new(7, "web", "sell");
        draft.set_field("brand", "Vespa");
        draft.set_field("year", 2021i64);
        draft.set_field("show_phone", true);

        assert_eq!(draft.field("brand"), Some(&FieldValue::Text("Vespa".into())));
        assert_eq!(draft.len(), 3);
    }

    #[test]
    fn test_form_value_rendering() {
        assert_eq!(FieldValue::Text("x".into()).as_form_value(), "x");
        assert_eq!(FieldValue::Number(2021.0).as_form_value(), "2021");
        assert_eq!(FieldValue::Number(12.5).as_form_value(), "12.5");
        assert_eq!(FieldValue::Flag(true).as_form_value(), "1");
        assert_eq!(FieldValue::Flag(false).as_form_value(), "0");
        assert_eq!(
            FieldValue::List(vec!["abs".into(), "alloy".into()]).as_form_value(),
            "abs,alloy"
        );
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut draft = ListingDraft::new(7, "web", "sell");
        draft.set_field("brand", "Vespa");
        draft.set_field("address", "   ");

        let result = draft.validate(&["brand", "address", "price"]);
        assert_eq!(result, Err(DraftError::MissingField("address".to_string())));
    }

    #[test]
    fn test_validate_passes_when_all_present() {
        let mut draft = ListingDraft::new(7, "web", "sell");
        draft.set_field("brand", "Vespa");
        draft.set_field("price", 45_000i64);

        assert!(draft.validate(&["brand", "price"]).is_ok());
    }

    #[test]
    fn test_empty_list_counts_as_missing() {
        let mut draft = ListingDraft::new(7, "web", "sell");
        draft.set_field("features", FieldValue::List(vec![]));
        assert!(draft.validate(&["features"]).is_err());
    }

    #[test]
    fn test_clear_keeps_identity() {
        let mut draft = ListingDraft::new(7, "web", "sell");
        draft.set_field("brand", "Vespa");
        draft.clear();

        assert!(draft.is_empty());
        assert_eq!(draft.category_id, Some(7));
        assert_eq!(draft.post_type, "sell");
    }

    #[test]
    fn test_edit_mode_prepopulation() {
        let draft = ListingDraft::from_fields(
            3,
            "web",
            "rent",
            vec![("brand".to_string(), FieldValue::Text("Honda".into()))],
        );
        assert_eq!(draft.field("brand"), Some(&FieldValue::Text("Honda".into())));
    }
}
