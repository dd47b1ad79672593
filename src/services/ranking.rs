// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Class ranking aggregator.
//!
//! Holds no state of its own: every call reads or updates the identity
//! registry and ranking table owned by the [`RecordStore`].

use std::sync::Arc;

use crate::db::{RecordStore, StorageBackend};
use crate::error::Result;
use crate::models::record::is_reserved_owner;
use crate::models::{ClassStats, RankingEntry, Record, RecordDraft};

/// Leaderboard and class-average view over a record store.
pub struct RankingAggregator<B> {
    store: Arc<RecordStore<B>>,
}

impl<B> Clone for RankingAggregator<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<B: StorageBackend> RankingAggregator<B> {
    pub fn new(store: Arc<RecordStore<B>>) -> Self {
        Self { store }
    }

    /// Credit a saved record to its owner.
    ///
    /// Call after `RecordStore::append` succeeded for an identified owner.
    /// Guest and anonymous records are ignored and return `None`.
    pub async fn record_save(
        &self,
        external_id: &str,
        record: &Record,
    ) -> Result<Option<RankingEntry>> {
        if is_reserved_owner(external_id) {
            tracing::debug!(record_id = %record.id, "Guest record, ranking unchanged");
            return Ok(None);
        }

        let entry = self
            .store
            .accumulate_emission(external_id, record.total_emission)
            .await?;
        Ok(Some(entry))
    }

    /// Append a record and credit its owner in a single store transaction.
    ///
    /// Guest and anonymous drafts are appended without touching the ranking.
    pub async fn append_and_record(
        &self,
        draft: RecordDraft,
    ) -> Result<(Record, Option<RankingEntry>)> {
        if is_reserved_owner(&draft.owner_id) {
            let record = self.store.append(draft).await?;
            return Ok((record, None));
        }

        let (record, entry) = self.store.append_and_accumulate(draft).await?;
        Ok((record, Some(entry)))
    }

    /// Every identity's entry, lowest footprint first.
    pub async fn leaderboard(&self) -> Result<Vec<RankingEntry>> {
        let entries = self.store.ranking_entries().await?;
        Ok(rank_entries(entries))
    }

    /// Mean running total across entries, 0 when there are none.
    pub async fn class_average(&self) -> Result<f64> {
        let entries = self.store.ranking_entries().await?;
        Ok(average_total(&entries))
    }

    /// Class size, average and record totals.
    pub async fn class_stats(&self) -> Result<ClassStats> {
        let entries = self.store.ranking_entries().await?;
        let records = self.store.all_records().await?;

        Ok(ClassStats {
            class_size: entries.len() as u32,
            class_average_emission: average_total(&entries),
            total_records: records.len() as u32,
            total_emission: records.iter().map(|r| r.total_emission).sum(),
        })
    }
}

/// Sort ascending by running total.
///
/// The sort is stable, so equal totals keep their insertion order.
pub fn rank_entries(mut entries: Vec<RankingEntry>) -> Vec<RankingEntry> {
    entries.sort_by(|a, b| a.running_total_emission.total_cmp(&b.running_total_emission));
    entries
}

/// Arithmetic mean of running totals, 0 for an empty slice.
pub fn average_total(entries: &[RankingEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let sum: f64 = entries.iter().map(|e| e.running_total_emission).sum();
    sum / entries.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str, total: f64) -> RankingEntry {
        RankingEntry {
            external_id: id.to_string(),
            display_name: id.to_string(),
            running_total_emission: total,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_rank_entries_ascending() {
        let ranked = rank_entries(vec![entry("a", 30.0), entry("b", 5.0), entry("c", 12.0)]);
        let ids: Vec<&str> = ranked.iter().map(|e| e.external_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_rank_entries_stable_on_ties() {
        let ranked = rank_entries(vec![
            entry("first", 7.0),
            entry("low", 1.0),
            entry("second", 7.0),
            entry("third", 7.0),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|e| e.external_id.as_str()).collect();
        assert_eq!(ids, vec!["low", "first", "second", "third"]);
    }

    #[test]
    fn test_average_total() {
        assert_eq!(average_total(&[]), 0.0);
        assert_eq!(average_total(&[entry("a", 10.0), entry("b", 20.0)]), 15.0);
    }
}
