// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Save workflow for a computed comparison.
//!
//! Handles the "save this result" flow:
//! 1. Resolve the owner (registered identity, guest or anonymous),
//!    registering a student on their first save
//! 2. Build the record draft from the comparison
//! 3. Append it to the record store and, for identities, credit the
//!    owner's running total and ranking entry in the same transaction

use std::sync::Arc;

use crate::db::{RecordStore, StorageBackend};
use crate::error::Result;
use crate::models::{
    Comparison, IdentityRegistration, RankingEntry, Record, RecordDraft, ANONYMOUS_OWNER_ID,
    GUEST_OWNER_ID,
};
use crate::services::RankingAggregator;

/// Who a record is saved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// A registered student, by external ID
    Student(String),
    /// Signed-in-as-visitor mode
    Guest,
    /// No identity information at all
    Anonymous,
}

impl Owner {
    /// Owner from an optional student ID; blank IDs mean guest.
    pub fn from_student_id(student_id: Option<&str>) -> Self {
        match student_id.map(str::trim) {
            Some(ANONYMOUS_OWNER_ID) => Owner::Anonymous,
            Some(id) if !id.is_empty() && id != GUEST_OWNER_ID => Owner::Student(id.to_string()),
            _ => Owner::Guest,
        }
    }
}

/// Result of saving a comparison.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub record: Record,
    /// Updated ranking entry, `None` for guest/anonymous saves
    pub ranking: Option<RankingEntry>,
}

/// Persists comparisons and keeps the ranking in step.
pub struct ComparisonRecorder<B> {
    store: Arc<RecordStore<B>>,
    ranking: RankingAggregator<B>,
}

impl<B: StorageBackend> ComparisonRecorder<B> {
    pub fn new(store: Arc<RecordStore<B>>) -> Self {
        let ranking = RankingAggregator::new(Arc::clone(&store));
        Self { store, ranking }
    }

    /// Save a comparison for `owner`.
    ///
    /// A student ID that is not registered yet is registered on this first
    /// save, with the ID doubling as the display name until a later
    /// registration refreshes it.
    pub async fn save(
        &self,
        comparison: &Comparison,
        owner: &Owner,
        notes: &str,
    ) -> Result<SaveOutcome> {
        let (owner_id, display_name, registered) = match owner {
            Owner::Student(external_id) => {
                let identity = match self.store.identity(external_id).await? {
                    Some(identity) => identity,
                    None => {
                        tracing::info!(
                            external_id = %external_id,
                            "First save for unregistered student, registering"
                        );
                        self.store
                            .register_identity(IdentityRegistration::new(
                                external_id.as_str(),
                                external_id.as_str(),
                            ))
                            .await?
                    }
                };
                (identity.external_id, identity.display_name, true)
            }
            Owner::Guest => (GUEST_OWNER_ID.to_string(), "Guest".to_string(), false),
            Owner::Anonymous => (
                ANONYMOUS_OWNER_ID.to_string(),
                "Anonymous".to_string(),
                false,
            ),
        };

        let draft = RecordDraft::from_comparison(comparison, owner_id, display_name, notes);
        let (record, ranking) = if registered {
            self.ranking.append_and_record(draft).await?
        } else {
            (self.store.append(draft).await?, None)
        };

        Ok(SaveOutcome { record, ranking })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_from_student_id() {
        assert_eq!(
            Owner::from_student_id(Some(" 17250082 ")),
            Owner::Student("17250082".to_string())
        );
        assert_eq!(Owner::from_student_id(Some("  ")), Owner::Guest);
        assert_eq!(Owner::from_student_id(None), Owner::Guest);
        assert_eq!(Owner::from_student_id(Some("guest")), Owner::Guest);
        assert_eq!(Owner::from_student_id(Some("anonymous")), Owner::Anonymous);
    }
}
