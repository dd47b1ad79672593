// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model: what the user is comparing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of activity an emission factor applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Category {
    Transportation,
    Energy,
    Diet,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Transportation, Category::Energy, Category::Diet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::Energy => "energy",
            Category::Diet => "diet",
        }
    }

    /// Unit the activity amount is measured in.
    ///
    /// Energy items each have their own native unit (kWh, m³, L, ...),
    /// so the category-level label is generic.
    pub fn unit(&self) -> &'static str {
        match self {
            Category::Transportation => "km",
            Category::Energy => "unit",
            Category::Diet => "kg",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transportation" | "transport" => Ok(Category::Transportation),
            "energy" => Ok(Category::Energy),
            "diet" | "food" => Ok(Category::Diet),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown activity category: {0}")]
pub struct ParseCategoryError(pub String);

/// A single activity selection, built per calculation request.
///
/// `amount` comes from unvalidated user input and may be negative or NaN;
/// the footprint engine clamps those to zero emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    pub category: Category,
    /// Item key within the category (e.g. "car_small")
    pub item: String,
    /// Amount in the item's unit
    pub amount: f64,
}

impl Activity {
    pub fn new(category: Category, item: impl Into<String>, amount: f64) -> Self {
        Self {
            category,
            item: item.into(),
            amount,
        }
    }
}

/// One side of a comparison together with its computed emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityOption {
    pub activity: Activity,
    /// Emission in kg CO2e
    pub emission: f64,
}
