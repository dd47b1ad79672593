// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::atomic::{AtomicBool, Ordering};

use carbon_compare::config::Config;
use carbon_compare::db::{MemoryBackend, StorageBackend};
use carbon_compare::error::AppError;
use carbon_compare::models::{
    Activity, ActivityOption, Category, IdentityRegistration, Record, RecordDraft,
};
use carbon_compare::services::EmissionFactorTable;
use carbon_compare::AppState;

/// Create a test app over in-memory storage with the standard factor table.
#[allow(dead_code)]
pub fn create_test_app() -> AppState<MemoryBackend> {
    create_test_app_with(MemoryBackend::new())
}

/// Create a test app over a caller-supplied backend.
#[allow(dead_code)]
pub fn create_test_app_with(backend: MemoryBackend) -> AppState<MemoryBackend> {
    AppState::with_backend(Config::default(), EmissionFactorTable::standard(), backend)
}

/// Register a student and return nothing; panics on failure.
#[allow(dead_code)]
pub async fn register(state: &AppState<MemoryBackend>, name: &str, student_id: &str) {
    state
        .store
        .register_identity(IdentityRegistration::new(name, student_id))
        .await
        .expect("Failed to register identity");
}

/// Build a record draft whose higher-impact option emits `total`.
#[allow(dead_code)]
pub fn make_draft(owner_id: &str, total: f64) -> RecordDraft {
    RecordDraft {
        id: None,
        owner_id: owner_id.to_string(),
        owner_display_name: owner_id.to_string(),
        activity_type: Category::Transportation,
        option_a: ActivityOption {
            activity: Activity::new(Category::Transportation, "car_small", total / 0.122),
            emission: total,
        },
        option_b: ActivityOption {
            activity: Activity::new(Category::Transportation, "walking", 1.0),
            emission: 0.0,
        },
        savings: total,
        total_emission: total,
        notes: String::new(),
        created_at: None,
    }
}

/// Append a draft with notes set to `label`, so tests can track ordering.
#[allow(dead_code)]
pub async fn append_labeled(
    state: &AppState<MemoryBackend>,
    owner_id: &str,
    label: &str,
) -> Record {
    let mut draft = make_draft(owner_id, 1.0);
    draft.notes = label.to_string();
    state
        .store
        .append(draft)
        .await
        .expect("Failed to append record")
}

/// In-memory backend that rejects writes to one key while armed.
#[allow(dead_code)]
pub struct FailingWrites {
    inner: MemoryBackend,
    key: &'static str,
    armed: AtomicBool,
}

#[allow(dead_code)]
impl FailingWrites {
    pub fn new(key: &'static str) -> Self {
        Self {
            inner: MemoryBackend::new(),
            key,
            armed: AtomicBool::new(false),
        }
    }

    pub fn arm(&self, armed: bool) {
        self.armed.store(armed, Ordering::SeqCst);
    }
}

impl StorageBackend for FailingWrites {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        if key == self.key && self.armed.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceFailure(format!(
                "Injected write failure for {}",
                key
            )));
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.inner.remove(key)
    }
}

/// Create a test app whose backend fails writes to `key` once armed.
#[allow(dead_code)]
pub fn create_failing_app(key: &'static str) -> AppState<FailingWrites> {
    AppState::with_backend(
        Config::default(),
        EmissionFactorTable::standard(),
        FailingWrites::new(key),
    )
}
