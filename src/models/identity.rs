// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Identity model: a registered student and their running footprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::record::is_reserved_owner;

/// Registered identity. Created on registration,
/// accumulated on every later save, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: String,
    /// Student ID or equivalent (registry key)
    pub external_id: String,
    /// Sum of `total_emission` over every record saved by this identity (kg CO2e)
    #[serde(default)]
    pub running_total_emission: f64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Identity {
    pub fn new(display_name: String, external_id: String, now: DateTime<Utc>) -> Self {
        Self {
            display_name,
            external_id,
            running_total_emission: 0.0,
            created_at: now,
            last_updated: now,
        }
    }

    /// Add a saved record's emission to the running total.
    ///
    /// The total stays finite: values that are not, or that would overflow
    /// it, are dropped.
    pub fn accumulate(&mut self, emission: f64, now: DateTime<Utc>) {
        let total = self.running_total_emission + emission;
        if emission.is_finite() && emission > 0.0 && total.is_finite() {
            self.running_total_emission = total;
        } else if emission != 0.0 {
            tracing::warn!(
                external_id = %self.external_id,
                emission,
                "Emission not added to running total"
            );
        }
        self.last_updated = now;
    }
}

/// Registration request (from the sign-up form or a roster import).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_not_reserved"))]
pub struct IdentityRegistration {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(length(min = 1, max = 64))]
    pub external_id: String,
}

impl IdentityRegistration {
    pub fn new(display_name: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into().trim().to_string(),
            external_id: external_id.into().trim().to_string(),
        }
    }
}

fn validate_not_reserved(
    registration: &IdentityRegistration,
) -> Result<(), validator::ValidationError> {
    if is_reserved_owner(&registration.external_id) {
        return Err(validator::ValidationError::new("reserved_external_id"));
    }
    Ok(())
}
