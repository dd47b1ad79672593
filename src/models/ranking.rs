// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Class ranking entries and class-wide summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Identity;

/// Leaderboard row, derived 1:1 from an [`Identity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankingEntry {
    pub external_id: String,
    pub display_name: String,
    /// kg CO2e; lower ranks better
    pub running_total_emission: f64,
    pub last_updated: DateTime<Utc>,
}

impl From<&Identity> for RankingEntry {
    fn from(identity: &Identity) -> Self {
        Self {
            external_id: identity.external_id.clone(),
            display_name: identity.display_name.clone(),
            running_total_emission: identity.running_total_emission,
            last_updated: identity.last_updated,
        }
    }
}

/// Class-wide summary for the ranking and admin views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClassStats {
    /// Number of ranked identities
    pub class_size: u32,
    /// Mean running total across ranked identities (0 when empty)
    pub class_average_emission: f64,
    /// Records across every owner list and the guest list
    pub total_records: u32,
    /// Sum of `total_emission` across those records
    pub total_emission: f64,
}
