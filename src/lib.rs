// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Carbon-Compare: compare the footprint of two everyday choices
//!
//! This crate provides the emission calculation engine, the persisted
//! record store and the class ranking behind the comparison tool.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::{FileBackend, RecordStore, StorageBackend};
use error::{AppError, Result};
use services::{ComparisonRecorder, EmissionFactorTable, FootprintEngine, RankingAggregator};

/// Shared application state, built once at startup.
pub struct AppState<B> {
    pub config: Config,
    pub engine: FootprintEngine,
    pub store: Arc<RecordStore<B>>,
    pub ranking: RankingAggregator<B>,
    pub recorder: ComparisonRecorder<B>,
}

impl<B: StorageBackend> AppState<B> {
    /// Wire every component around an explicit factor table and backend.
    pub fn with_backend(config: Config, factors: EmissionFactorTable, backend: B) -> Self {
        let engine = FootprintEngine::new(Arc::new(factors), config.advice_thresholds());
        let store = Arc::new(RecordStore::new(backend, &config));
        let ranking = RankingAggregator::new(Arc::clone(&store));
        let recorder = ComparisonRecorder::new(Arc::clone(&store));

        Self {
            config,
            engine,
            store,
            ranking,
            recorder,
        }
    }
}

impl AppState<FileBackend> {
    /// Open file storage under `config.data_dir` and load the factor table.
    pub fn open(config: Config) -> Result<Self> {
        let factors = config
            .load_factor_table()
            .map_err(|e| AppError::Internal(e.into()))?;
        let backend = FileBackend::open(&config.data_dir)?;
        Ok(Self::with_backend(config, factors, backend))
    }
}
