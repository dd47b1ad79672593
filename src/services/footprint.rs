// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint engine: per-activity emissions, comparisons and advice.
//!
//! Every function here is pure. A comparison always produces a number:
//! bad input degrades to zero emission with a logged warning.

use std::sync::Arc;

use crate::models::{Activity, ActivityOption, Category, Comparison, Lower};
use crate::services::EmissionFactorTable;

/// kg CO2 one tree absorbs in a year.
pub const TREE_ABSORPTION_KG_PER_YEAR: f64 = 21.77;

/// Trees needed for a year to absorb `kg_co2`. Unrounded.
pub fn equivalent_trees(kg_co2: f64) -> f64 {
    kg_co2 / TREE_ABSORPTION_KG_PER_YEAR
}

/// Why an emission was clamped to zero.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcWarning {
    #[error("No emission factor for {category}/{item}; counted as zero")]
    UnknownFactor { category: Category, item: String },

    #[error("Invalid amount {amount}; counted as zero")]
    InvalidAmount { amount: f64 },
}

/// Magnitude tier used to pick advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdviceTier {
    Low,
    Moderate,
    High,
}

/// Tier boundaries in kg CO2e.
///
/// `kg <= low_kg` is Low, `kg > high_kg` is High, anything between is Moderate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdviceThresholds {
    pub low_kg: f64,
    pub high_kg: f64,
}

impl Default for AdviceThresholds {
    fn default() -> Self {
        Self {
            low_kg: 2.0,
            high_kg: 10.0,
        }
    }
}

impl AdviceThresholds {
    pub fn tier(&self, emission_kg: f64) -> AdviceTier {
        if emission_kg.is_nan() || emission_kg <= self.low_kg {
            AdviceTier::Low
        } else if emission_kg > self.high_kg {
            AdviceTier::High
        } else {
            AdviceTier::Moderate
        }
    }
}

const LOW_ADVICE: &[&str] = &[
    "Your choice is already relatively low-carbon. Keep it up!",
    "Share what works for you so classmates can try it too.",
];

const MODERATE_ADVICE: &[&str] = &[
    "Your choice produces a moderate amount of emissions. A few ways to optimize:",
    "Pick the lower-carbon option whenever it is practical.",
    "Think about how often you do this and cut unnecessary repeats.",
];

const HIGH_HEADER: &str = "Your choice produces high emissions. Consider the following:";

const TRANSPORTATION_ADVICE: &[&str] = &[
    "Walk or cycle for short trips.",
    "Use public transport such as the bus or subway.",
    "If you must drive, share the ride or choose a smaller car.",
    "For long journeys, take the train instead of flying.",
];

const DIET_ADVICE: &[&str] = &[
    "Eat red meat, especially beef, less often.",
    "Increase the share of plant-based food in your meals.",
    "Choose locally produced food to cut transport emissions.",
    "Plan shopping and cooking to reduce food waste.",
];

const ENERGY_ADVICE: &[&str] = &[
    "Switch off lights and unplug idle devices.",
    "Prefer electricity from renewable sources where available.",
    "Set heating and cooling a degree or two closer to outdoor temperature.",
    "Choose energy-efficient appliances when replacing old ones.",
];

/// Stateless emission calculator over a shared factor table.
#[derive(Debug, Clone)]
pub struct FootprintEngine {
    factors: Arc<EmissionFactorTable>,
    thresholds: AdviceThresholds,
}

impl FootprintEngine {
    pub fn new(factors: Arc<EmissionFactorTable>, thresholds: AdviceThresholds) -> Self {
        Self {
            factors,
            thresholds,
        }
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    pub fn thresholds(&self) -> AdviceThresholds {
        self.thresholds
    }

    /// Emission of an activity, with the reason if it was clamped to zero.
    pub fn emission_with_warning(&self, activity: &Activity) -> (f64, Option<CalcWarning>) {
        let amount = activity.amount;
        if !amount.is_finite() || amount < 0.0 {
            return (0.0, Some(CalcWarning::InvalidAmount { amount }));
        }

        match self.factors.lookup(activity.category, &activity.item) {
            Ok(factor) => {
                let emission = amount * factor;
                if emission.is_finite() {
                    (emission, None)
                } else {
                    // Finite amount, but the product overflowed
                    (0.0, Some(CalcWarning::InvalidAmount { amount }))
                }
            }
            Err(_) => (
                0.0,
                Some(CalcWarning::UnknownFactor {
                    category: activity.category,
                    item: activity.item.clone(),
                }),
            ),
        }
    }

    /// Emission of an activity in kg CO2e (`amount * factor`).
    ///
    /// Returns 0 for negative/NaN amounts and unknown items.
    pub fn emission_of(&self, activity: &Activity) -> f64 {
        let (emission, warning) = self.emission_with_warning(activity);
        if let Some(warning) = warning {
            tracing::warn!(
                category = %activity.category,
                item = %activity.item,
                warning = %warning,
                "Emission clamped to zero"
            );
        }
        emission
    }

    /// Compare two activities. Ties resolve to `Lower::A`.
    ///
    /// Negative or non-finite amounts are stored as 0 in the returned
    /// options, so a comparison always serializes to plain numbers.
    pub fn compare(&self, a: &Activity, b: &Activity) -> Comparison {
        let emission_a = self.emission_of(a);
        let emission_b = self.emission_of(b);

        let lower = if emission_b < emission_a {
            Lower::B
        } else {
            Lower::A
        };

        tracing::debug!(emission_a, emission_b, ?lower, "Compared activities");

        Comparison {
            option_a: ActivityOption {
                activity: sanitized(a),
                emission: emission_a,
            },
            option_b: ActivityOption {
                activity: sanitized(b),
                emission: emission_b,
            },
            savings: (emission_a - emission_b).abs(),
            lower,
        }
    }

    /// Advice lines for an emission, tiered by magnitude.
    ///
    /// Only the high tier uses the category-specific text bank.
    pub fn reduction_advice(&self, emission_kg: f64, category: Category) -> Vec<String> {
        let lines: Vec<&str> = match self.thresholds.tier(emission_kg) {
            AdviceTier::Low => LOW_ADVICE.to_vec(),
            AdviceTier::Moderate => MODERATE_ADVICE.to_vec(),
            AdviceTier::High => {
                let bank = match category {
                    Category::Transportation => TRANSPORTATION_ADVICE,
                    Category::Diet => DIET_ADVICE,
                    Category::Energy => ENERGY_ADVICE,
                };
                std::iter::once(HIGH_HEADER)
                    .chain(bank.iter().copied())
                    .collect()
            }
        };
        lines.into_iter().map(String::from).collect()
    }
}

/// Copy of `activity` with an unusable amount replaced by 0.
fn sanitized(activity: &Activity) -> Activity {
    let mut activity = activity.clone();
    if !activity.amount.is_finite() || activity.amount < 0.0 {
        activity.amount = 0.0;
    }
    activity
}

impl Default for FootprintEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(EmissionFactorTable::standard()),
            AdviceThresholds::default(),
        )
    }
}
