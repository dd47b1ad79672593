// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod factors;
pub mod footprint;
pub mod ranking;
pub mod recorder;

pub use factors::{
    EmissionFactor, EmissionFactorTable, FactorError, UNKNOWN_ACTIVITY_DESCRIPTION,
};
pub use footprint::{
    equivalent_trees, AdviceThresholds, AdviceTier, CalcWarning, FootprintEngine,
    TREE_ABSORPTION_KG_PER_YEAR,
};
pub use ranking::RankingAggregator;
pub use recorder::{ComparisonRecorder, Owner, SaveOutcome};
