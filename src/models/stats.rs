//! Per-owner statistics computed from saved records.
//!
//! Backs the "my records" summary cards: count, totals, tree equivalents
//! and a per-category breakdown.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::{Category, Record};
use crate::services::footprint::equivalent_trees;

/// Aggregated statistics over a set of records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStatistics {
    // ─── Totals ──────────────────────────────────────────────────
    /// Records counted
    #[serde(default)]
    pub total_records: u32,
    /// Sum of record `total_emission` (kg CO2e)
    #[serde(default)]
    pub total_emission: f64,
    /// Sum of record `savings` (kg CO2e)
    #[serde(default)]
    pub total_savings: f64,
    /// Trees needed for a year to absorb `total_savings`
    #[serde(default)]
    pub trees_saved: f64,

    // ─── By Category ─────────────────────────────────────────────
    #[serde(default)]
    pub emission_by_category: BTreeMap<Category, f64>,
    #[serde(default)]
    pub records_by_category: BTreeMap<Category, u32>,

    // ─── Time Series ─────────────────────────────────────────────
    /// Record count per month ("YYYY-MM" format)
    #[serde(default)]
    pub records_by_month: BTreeMap<String, u32>,

    // ─── Idempotency ─────────────────────────────────────────────
    #[serde(skip)]
    counted_ids: HashSet<String>,
}

impl UserStatistics {
    /// Build statistics from a list of records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.update_from_record(record);
        }
        stats
    }

    /// Fold one record into the statistics.
    ///
    /// Returns `false` if a record with the same ID was already counted.
    pub fn update_from_record(&mut self, record: &Record) -> bool {
        if !self.counted_ids.insert(record.id.clone()) {
            return false;
        }

        self.total_records += 1;
        self.total_emission += record.total_emission;
        self.total_savings += record.savings;
        self.trees_saved = equivalent_trees(self.total_savings);

        *self
            .emission_by_category
            .entry(record.activity_type)
            .or_insert(0.0) += record.total_emission;
        *self
            .records_by_category
            .entry(record.activity_type)
            .or_insert(0) += 1;

        let month_key = record.created_at.format("%Y-%m").to_string();
        *self.records_by_month.entry(month_key).or_insert(0) += 1;

        true
    }
}
