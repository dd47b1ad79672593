// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Persisted comparison record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::{ActivityOption, Category, Comparison};

/// Owner ID for records saved without a registered identity.
pub const GUEST_OWNER_ID: &str = "guest";
/// Owner ID for records saved with no identity information at all.
pub const ANONYMOUS_OWNER_ID: &str = "anonymous";

/// Longest note a record may carry.
pub const MAX_NOTES_LEN: u64 = 500;

/// A saved comparison. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Record {
    /// Opaque unique ID
    pub id: String,
    /// External ID of the owning identity, or "guest"/"anonymous"
    pub owner_id: String,
    pub owner_display_name: String,
    pub activity_type: Category,
    pub option_a: ActivityOption,
    pub option_b: ActivityOption,
    /// Absolute gap between the two emissions (kg CO2e)
    pub savings: f64,
    /// Emission of the higher-impact option (kg CO2e)
    pub total_emission: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Input to `RecordStore::append`.
///
/// `id` and `created_at` are filled in by the store when absent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_finite_values"))]
pub struct RecordDraft {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,
    #[validate(length(min = 1, max = 100))]
    pub owner_display_name: String,
    pub activity_type: Category,
    pub option_a: ActivityOption,
    pub option_b: ActivityOption,
    pub savings: f64,
    pub total_emission: f64,
    #[validate(length(max = MAX_NOTES_LEN))]
    pub notes: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl RecordDraft {
    /// Build a draft from a computed comparison.
    ///
    /// The activity type is taken from option A.
    pub fn from_comparison(
        comparison: &Comparison,
        owner_id: impl Into<String>,
        owner_display_name: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            owner_id: owner_id.into(),
            owner_display_name: owner_display_name.into(),
            activity_type: comparison.option_a.activity.category,
            option_a: comparison.option_a.clone(),
            option_b: comparison.option_b.clone(),
            savings: comparison.savings,
            total_emission: comparison.higher_emission(),
            notes: notes.into(),
            created_at: None,
        }
    }

    /// Finalize into a record with the given ID and creation time.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> Record {
        Record {
            id,
            owner_id: self.owner_id,
            owner_display_name: self.owner_display_name,
            activity_type: self.activity_type,
            option_a: self.option_a,
            option_b: self.option_b,
            savings: self.savings,
            total_emission: self.total_emission,
            notes: self.notes,
            created_at,
        }
    }
}

/// JSON has no NaN or infinity, so a stored record must hold finite numbers only.
fn validate_finite_values(draft: &RecordDraft) -> Result<(), validator::ValidationError> {
    let values = [
        draft.option_a.activity.amount,
        draft.option_a.emission,
        draft.option_b.activity.amount,
        draft.option_b.emission,
        draft.savings,
        draft.total_emission,
    ];
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("non_finite_value"))
    }
}

/// True for the reserved owner IDs that never map to an identity.
pub fn is_reserved_owner(owner_id: &str) -> bool {
    owner_id == GUEST_OWNER_ID || owner_id == ANONYMOUS_OWNER_ID
}
