// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Result of comparing two activities.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ActivityOption;

/// Which option has the lower emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Lower {
    A,
    B,
}

/// Comparison of two activities.
///
/// `savings` is the absolute gap between the two emissions. It is the
/// only gap field; a separate "difference" would always equal it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comparison {
    pub option_a: ActivityOption,
    pub option_b: ActivityOption,
    /// |emission_a - emission_b| in kg CO2e
    pub savings: f64,
    /// Strictly lower option; ties resolve to `A`
    pub lower: Lower,
}

impl Comparison {
    pub fn lower_option(&self) -> &ActivityOption {
        match self.lower {
            Lower::A => &self.option_a,
            Lower::B => &self.option_b,
        }
    }

    pub fn higher_option(&self) -> &ActivityOption {
        match self.lower {
            Lower::A => &self.option_b,
            Lower::B => &self.option_a,
        }
    }

    /// Emission of the higher-impact option.
    ///
    /// This is what a saved record counts towards the owner's footprint.
    pub fn higher_emission(&self) -> f64 {
        self.option_a.emission.max(self.option_b.emission)
    }
}
