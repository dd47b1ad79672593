// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod comparison;
pub mod identity;
pub mod ranking;
pub mod record;
pub mod stats;

pub use activity::{Activity, ActivityOption, Category, ParseCategoryError};
pub use comparison::{Comparison, Lower};
pub use identity::{Identity, IdentityRegistration};
pub use ranking::{ClassStats, RankingEntry};
pub use record::{Record, RecordDraft, ANONYMOUS_OWNER_ID, GUEST_OWNER_ID};
pub use stats::UserStatistics;
