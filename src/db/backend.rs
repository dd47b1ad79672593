// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage backends holding serialized values by key.
//!
//! Mirrors browser local storage: whole values are read and written at
//! once, and a write may fail (quota, I/O). Backends never retry.

use crate::error::AppError;
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key/value storage for serialized JSON strings.
pub trait StorageBackend: Send + Sync {
    /// Read a value, `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replace a value.
    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// One JSON file per key under a data directory.
///
/// Writes go to a temp file and are renamed into place, so readers never
/// observe a partially written value.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::PersistenceFailure(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        tracing::info!(path = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::PersistenceFailure(format!(
                "Failed to read {}: {}",
                key, e
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));

        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| AppError::PersistenceFailure(format!("Failed to write {}: {}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::PersistenceFailure(format!(
                "Failed to remove {}: {}",
                key, e
            ))),
        }
    }
}

/// In-memory storage with an optional total size quota.
///
/// Used for tests and as a fallback store when the file backend fails.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: DashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the stored total past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: DashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes currently stored (keys excluded).
    pub fn used_bytes(&self) -> usize {
        self.values.iter().map(|entry| entry.value().len()).sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        if let Some(quota) = self.quota_bytes {
            let current = self.values.get(key).map(|v| v.len()).unwrap_or(0);
            let projected = self.used_bytes() - current + value.len();
            if projected > quota {
                return Err(AppError::PersistenceFailure(format!(
                    "Storage quota exceeded writing {} ({} > {} bytes)",
                    key, projected, quota
                )));
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read_missing_key() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("nothing").unwrap(), None);
    }

    #[test]
    fn test_memory_quota_rejects_oversized_write() {
        let backend = MemoryBackend::with_quota(10);
        backend.write("a", "12345").unwrap();

        let err = backend.write("b", "1234567").unwrap_err();
        assert!(err.is_persistence_failure());

        // Replacing an existing value only counts the difference
        backend.write("a", "1234567890").unwrap();
        assert_eq!(backend.used_bytes(), 10);
    }

    #[test]
    fn test_memory_remove_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.write("a", "1").unwrap();
        backend.remove("a").unwrap();
        backend.remove("a").unwrap();
        assert_eq!(backend.read("a").unwrap(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("nested")).unwrap();

        assert_eq!(backend.read("k").unwrap(), None);
        backend.write("k", "[1,2,3]").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("[1,2,3]"));
        backend.remove("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);
    }
}
