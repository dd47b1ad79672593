// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store with typed operations over a storage backend.
//!
//! Owns:
//! - Records (identified owners' lists and the guest list, most-recent-first)
//! - Identities (the registry of known students)
//! - Ranking table (one entry per identity)
//! - Admin session flag
//!
//! Every read-modify-write runs under one async mutex, so it is a single
//! logical transaction within this process. Across processes sharing the
//! same storage this is best effort only: there is no lock in the storage
//! itself, and a concurrent writer can still lose an update.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use validator::Validate;

use crate::config::Config;
use crate::db::keys;
use crate::db::StorageBackend;
use crate::error::{AppError, Result};
use crate::models::record::is_reserved_owner;
use crate::models::{Identity, IdentityRegistration, RankingEntry, Record, RecordDraft};

/// Identified owners' record lists, keyed by external ID.
type OwnerRecords = BTreeMap<String, Vec<Record>>;

/// Stored value an append replaced, for rolling it back.
struct AppendUndo {
    key: &'static str,
    previous: Option<String>,
}

/// Capacity-bounded record store.
pub struct RecordStore<B> {
    backend: B,
    record_cap: usize,
    guest_record_cap: usize,
    rng: SystemRandom,
    txn: Mutex<()>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Create a store using the configured retention caps.
    pub fn new(backend: B, config: &Config) -> Self {
        Self::with_caps(backend, config.record_cap, config.guest_record_cap)
    }

    pub fn with_caps(backend: B, record_cap: usize, guest_record_cap: usize) -> Self {
        Self {
            backend,
            record_cap: record_cap.max(1),
            guest_record_cap: guest_record_cap.max(1),
            rng: SystemRandom::new(),
            txn: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ─── Helpers ─────────────────────────────────────────────────

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.backend.read(key)? {
            Some(data) => serde_json::from_str(&data).map_err(|e| {
                AppError::PersistenceFailure(format!("Corrupt value for {}: {}", key, e))
            }),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_string(value).map_err(|e| {
            AppError::PersistenceFailure(format!("Failed to serialize {}: {}", key, e))
        })?;
        self.backend.write(key, &data).inspect_err(|e| {
            tracing::warn!(key, error = %e, "Storage write failed");
        })
    }

    /// Write identities then ranking; restore identities if the second write fails.
    fn save_registry(
        &self,
        previous: &[Identity],
        identities: &[Identity],
        ranking: &[RankingEntry],
    ) -> Result<()> {
        self.save(keys::IDENTITIES, identities)?;
        if let Err(e) = self.save(keys::CLASS_RANKING, ranking) {
            if let Err(restore) = self.save(keys::IDENTITIES, previous) {
                tracing::error!(error = %restore, "Failed to restore identities after ranking write failure");
            }
            return Err(e);
        }
        Ok(())
    }

    fn generate_record_id(&self, now: DateTime<Utc>) -> Result<String> {
        let mut bytes = [0u8; 6];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))?;
        Ok(format!("{:x}{}", now.timestamp_millis(), hex::encode(bytes)))
    }

    // ─── Record Operations ───────────────────────────────────────

    /// Append a record to its owner's list (or the guest list).
    ///
    /// Assigns an ID and creation time when the draft has none. The record
    /// goes to an owner list only when `owner_id` is a registered identity;
    /// everything else lands in the guest list. Lists past their cap drop
    /// their oldest entries.
    pub async fn append(&self, draft: RecordDraft) -> Result<Record> {
        draft.validate()?;

        let _txn = self.txn.lock().await;
        let (record, _) = self.append_locked(draft)?;
        Ok(record)
    }

    /// Append a record for a registered identity and credit its running
    /// total, as one transaction.
    ///
    /// If crediting fails the appended record is removed again, so a
    /// retried save never leaves a record without its ranking credit.
    pub async fn append_and_accumulate(
        &self,
        draft: RecordDraft,
    ) -> Result<(Record, RankingEntry)> {
        draft.validate()?;

        let _txn = self.txn.lock().await;

        let identities: Vec<Identity> = self.load(keys::IDENTITIES)?;
        if is_reserved_owner(&draft.owner_id)
            || !identities
                .iter()
                .any(|identity| identity.external_id == draft.owner_id)
        {
            return Err(AppError::NotFound(format!("identity {}", draft.owner_id)));
        }

        let (record, undo) = self.append_locked(draft)?;
        match self.accumulate_locked(&record.owner_id, record.total_emission) {
            Ok(entry) => Ok((record, entry)),
            Err(e) => {
                let restored = match &undo.previous {
                    Some(data) => self.backend.write(undo.key, data),
                    None => self.backend.remove(undo.key),
                };
                if let Err(restore) = restored {
                    tracing::error!(
                        record_id = %record.id,
                        error = %restore,
                        "Failed to roll back record after ranking update failure"
                    );
                } else {
                    tracing::warn!(record_id = %record.id, "Rolled back record, ranking update failed");
                }
                Err(e)
            }
        }
    }

    fn append_locked(&self, draft: RecordDraft) -> Result<(Record, AppendUndo)> {
        let now = Utc::now();
        let id = match draft.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.generate_record_id(now)?,
        };
        let created_at = draft.created_at.unwrap_or(now);
        let record = draft.into_record(id, created_at);

        let identities: Vec<Identity> = self.load(keys::IDENTITIES)?;
        let known = !is_reserved_owner(&record.owner_id)
            && identities
                .iter()
                .any(|identity| identity.external_id == record.owner_id);

        let (evicted, undo) = if known {
            let previous = self.backend.read(keys::OWNER_RECORDS)?;
            let mut owners: OwnerRecords = self.load(keys::OWNER_RECORDS)?;
            let list = owners.entry(record.owner_id.clone()).or_default();
            list.insert(0, record.clone());
            let evicted = enforce_cap(list, self.record_cap);
            self.save(keys::OWNER_RECORDS, &owners)?;
            (
                evicted,
                AppendUndo {
                    key: keys::OWNER_RECORDS,
                    previous,
                },
            )
        } else {
            let previous = self.backend.read(keys::GUEST_RECORDS)?;
            let mut guests: Vec<Record> = self.load(keys::GUEST_RECORDS)?;
            guests.insert(0, record.clone());
            let evicted = enforce_cap(&mut guests, self.guest_record_cap);
            self.save(keys::GUEST_RECORDS, &guests)?;
            (
                evicted,
                AppendUndo {
                    key: keys::GUEST_RECORDS,
                    previous,
                },
            )
        };

        if evicted > 0 {
            tracing::info!(
                owner_id = %record.owner_id,
                evicted,
                "Retention cap reached, dropped oldest records"
            );
        }

        tracing::info!(
            record_id = %record.id,
            owner_id = %record.owner_id,
            guest = !known,
            total_emission = record.total_emission,
            "Record appended"
        );

        Ok((record, undo))
    }

    /// Records for one owner, most-recent-first.
    ///
    /// An owner with an owner list gets exactly that list. Everyone else
    /// ("guest", "anonymous", unknown students) is answered from the guest
    /// list, filtered by owner ID.
    ///
    /// Records appended under a student ID before it was registered stay in
    /// the guest list and never count towards the running total. Once the
    /// student's first owned record exists they are no longer returned
    /// here; `guest_records` still lists them until the guest list is
    /// cleared. `ComparisonRecorder` registers students before their first
    /// save, so this only affects direct `append` callers.
    pub async fn records_for(&self, owner_id: &str) -> Result<Vec<Record>> {
        let _txn = self.txn.lock().await;

        let mut owners: OwnerRecords = self.load(keys::OWNER_RECORDS)?;
        if let Some(records) = owners.remove(owner_id) {
            return Ok(records);
        }

        let guests: Vec<Record> = self.load(keys::GUEST_RECORDS)?;
        Ok(guests
            .into_iter()
            .filter(|record| record.owner_id == owner_id)
            .collect())
    }

    /// The whole guest list, most-recent-first.
    pub async fn guest_records(&self) -> Result<Vec<Record>> {
        let _txn = self.txn.lock().await;
        self.load(keys::GUEST_RECORDS)
    }

    /// Every owner's records followed by the guest list.
    ///
    /// Order across owners is unspecified.
    pub async fn all_records(&self) -> Result<Vec<Record>> {
        let _txn = self.txn.lock().await;

        let owners: OwnerRecords = self.load(keys::OWNER_RECORDS)?;
        let guests: Vec<Record> = self.load(keys::GUEST_RECORDS)?;

        Ok(owners.into_values().flatten().chain(guests).collect())
    }

    /// Empty the guest list. Identified owners' records are untouched.
    pub async fn clear_guest_records(&self) -> Result<()> {
        let _txn = self.txn.lock().await;
        self.backend.remove(keys::GUEST_RECORDS)?;
        tracing::info!("Guest records cleared");
        Ok(())
    }

    // ─── Identity Operations ─────────────────────────────────────

    /// Register an identity, or refresh the display name of an existing one.
    ///
    /// New identities start at a zero running total and get a ranking entry
    /// immediately. Re-registering never touches the running total.
    pub async fn register_identity(&self, registration: IdentityRegistration) -> Result<Identity> {
        registration.validate()?;

        let _txn = self.txn.lock().await;
        let now = Utc::now();

        let previous: Vec<Identity> = self.load(keys::IDENTITIES)?;
        let mut identities = previous.clone();
        let mut ranking: Vec<RankingEntry> = self.load(keys::CLASS_RANKING)?;

        let identity = match identities
            .iter_mut()
            .find(|identity| identity.external_id == registration.external_id)
        {
            Some(existing) => {
                existing.display_name = registration.display_name;
                existing.last_updated = now;
                tracing::debug!(external_id = %existing.external_id, "Identity refreshed");
                existing.clone()
            }
            None => {
                let identity =
                    Identity::new(registration.display_name, registration.external_id, now);
                identities.push(identity.clone());
                tracing::info!(external_id = %identity.external_id, "Identity registered");
                identity
            }
        };

        upsert_entry(&mut ranking, RankingEntry::from(&identity));
        self.save_registry(&previous, &identities, &ranking)?;

        Ok(identity)
    }

    /// Add a saved record's emission to an identity's running total and
    /// upsert its ranking entry.
    pub async fn accumulate_emission(
        &self,
        external_id: &str,
        emission: f64,
    ) -> Result<RankingEntry> {
        let _txn = self.txn.lock().await;
        self.accumulate_locked(external_id, emission)
    }

    fn accumulate_locked(&self, external_id: &str, emission: f64) -> Result<RankingEntry> {
        let now = Utc::now();

        let previous: Vec<Identity> = self.load(keys::IDENTITIES)?;
        let mut identities = previous.clone();
        let mut ranking: Vec<RankingEntry> = self.load(keys::CLASS_RANKING)?;

        let identity = identities
            .iter_mut()
            .find(|identity| identity.external_id == external_id)
            .ok_or_else(|| AppError::NotFound(format!("identity {}", external_id)))?;
        identity.accumulate(emission, now);

        let entry = RankingEntry::from(&*identity);
        upsert_entry(&mut ranking, entry.clone());
        self.save_registry(&previous, &identities, &ranking)?;

        tracing::info!(
            external_id,
            emission,
            running_total = entry.running_total_emission,
            "Ranking updated"
        );

        Ok(entry)
    }

    pub async fn identity(&self, external_id: &str) -> Result<Option<Identity>> {
        let _txn = self.txn.lock().await;
        let identities: Vec<Identity> = self.load(keys::IDENTITIES)?;
        Ok(identities
            .into_iter()
            .find(|identity| identity.external_id == external_id))
    }

    /// All identities in registration order.
    pub async fn identities(&self) -> Result<Vec<Identity>> {
        let _txn = self.txn.lock().await;
        self.load(keys::IDENTITIES)
    }

    /// Ranking table in insertion order (unsorted).
    pub async fn ranking_entries(&self) -> Result<Vec<RankingEntry>> {
        let _txn = self.txn.lock().await;
        self.load(keys::CLASS_RANKING)
    }

    // ─── Admin Session ───────────────────────────────────────────

    /// Persist the admin view marker. This gates a UI view only; it is
    /// not an authorization check.
    pub async fn set_admin_session(&self, active: bool) -> Result<()> {
        let _txn = self.txn.lock().await;
        if active {
            self.save(keys::ADMIN_SESSION, &true)
        } else {
            self.backend.remove(keys::ADMIN_SESSION)
        }
    }

    pub async fn admin_session(&self) -> Result<bool> {
        let _txn = self.txn.lock().await;
        self.load(keys::ADMIN_SESSION)
    }
}

/// Truncate a most-recent-first list to `cap`, returning how many were dropped.
fn enforce_cap(list: &mut Vec<Record>, cap: usize) -> usize {
    let evicted = list.len().saturating_sub(cap);
    list.truncate(cap);
    evicted
}

/// Update an entry in place, or append it if the identity has none yet.
fn upsert_entry(ranking: &mut Vec<RankingEntry>, entry: RankingEntry) {
    match ranking
        .iter_mut()
        .find(|existing| existing.external_id == entry.external_id)
    {
        Some(existing) => *existing = entry,
        None => ranking.push(entry),
    }
}
