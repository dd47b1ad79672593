// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer (key/value JSON storage).

pub mod backend;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use store::RecordStore;

/// Storage key names as constants.
pub mod keys {
    /// Identity registry (ordered list, keyed by external ID)
    pub const IDENTITIES: &str = "carbon_app_identities";
    /// Identified owners' record lists (external ID -> records)
    pub const OWNER_RECORDS: &str = "carbon_app_user_records";
    /// Guest and anonymous records
    pub const GUEST_RECORDS: &str = "carbon_app_guest_records";
    /// Ranking table (ordered by first registration)
    pub const CLASS_RANKING: &str = "carbon_app_class_ranking";
    /// Non-authoritative admin view marker
    pub const ADMIN_SESSION: &str = "carbon_app_admin_session";
}
