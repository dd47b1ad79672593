// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emission factor table: (category, item) -> kg CO2e per unit.
//!
//! Loaded once at startup and shared read-only afterwards.

use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Conversion coefficient for one activity item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub category: Category,
    pub item: String,
    /// kg CO2e per `unit`
    pub factor: f64,
    /// Native unit of the activity amount (km, kWh, m³, kg, L)
    pub unit: String,
    /// Short explanation shown next to the option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Immutable emission factor table.
#[derive(Debug, Clone)]
pub struct EmissionFactorTable {
    /// Factors in declaration order (the order the UI lists options in)
    factors: Vec<EmissionFactor>,
    index: HashMap<(Category, String), usize>,
}

/// Shown for items without a description.
pub const UNKNOWN_ACTIVITY_DESCRIPTION: &str = "Unknown activity";

/// Built-in factors in kg CO2e per unit, with their descriptions.
#[rustfmt::skip]
const STANDARD_FACTORS: &[(Category, &str, f64, &str, &str)] = &[
    (Category::Transportation, "walking", 0.0, "km", "Walking is a zero-emission way to get around"),
    (Category::Transportation, "cycling", 0.0, "km", "Cycling is a low-impact choice"),
    (Category::Transportation, "bus", 0.089, "km", "Taking the bus emits less than a private car"),
    (Category::Transportation, "subway", 0.041, "km", "The subway is one of the cleanest ways to cross a city"),
    (Category::Transportation, "taxi", 0.159, "km", "Taxis have relatively high emissions"),
    (Category::Transportation, "car_small", 0.122, "km", "Small cars have relatively low emissions"),
    (Category::Transportation, "car_medium", 0.172, "km", "Medium cars have moderate emissions"),
    (Category::Transportation, "car_large", 0.221, "km", "Large cars have high emissions"),
    (Category::Transportation, "motorcycle", 0.091, "km", "Motorcycles have relatively high emissions"),
    (Category::Transportation, "train", 0.035, "km", "Taking the train emits far less than flying"),
    (Category::Transportation, "plane_domestic", 0.255, "km", "Domestic flights have high emissions"),
    (Category::Transportation, "plane_international", 0.195, "km", "International flights have high emissions"),
    (Category::Energy, "electricity", 0.610, "kWh", "Grid electricity, mostly generated from coal"),
    (Category::Energy, "natural_gas", 2.16, "m³", "Natural gas burns cleaner than coal or oil"),
    (Category::Energy, "coal", 2.40, "kg", "Coal is the most carbon-intensive fuel"),
    (Category::Energy, "gasoline", 2.31, "L", "Gasoline for cars and small engines"),
    (Category::Energy, "diesel", 2.68, "L", "Diesel emits more per litre than gasoline"),
    (Category::Diet, "beef", 27.0, "kg", "Beef has a very high footprint, mostly from digestion and feed production"),
    (Category::Diet, "lamb", 24.5, "kg", "Lamb has a footprint close to beef"),
    (Category::Diet, "pork", 12.1, "kg", "Pork has a relatively high footprint"),
    (Category::Diet, "chicken", 6.9, "kg", "Chicken has a lower footprint than beef or pork"),
    (Category::Diet, "fish", 5.4, "kg", "Fish has a moderate footprint"),
    (Category::Diet, "eggs", 4.8, "kg", "Eggs have a relatively low footprint"),
    (Category::Diet, "dairy", 2.8, "kg", "Dairy has a moderate footprint"),
    (Category::Diet, "vegetables", 2.0, "kg", "Vegetables usually have a very low footprint"),
    (Category::Diet, "fruits", 1.1, "kg", "Fruit usually has a very low footprint"),
    (Category::Diet, "grains", 2.7, "kg", "Grains have a relatively low footprint"),
];

impl EmissionFactorTable {
    /// The built-in table.
    pub fn standard() -> Self {
        let factors = STANDARD_FACTORS
            .iter()
            .map(|&(category, item, factor, unit, description)| EmissionFactor {
                category,
                item: item.to_string(),
                factor,
                unit: unit.to_string(),
                description: Some(description.to_string()),
            })
            .collect();
        Self::build(factors)
    }

    /// Build a table, rejecting negative/non-finite factors and duplicate keys.
    pub fn from_factors(factors: Vec<EmissionFactor>) -> Result<Self, FactorError> {
        let mut seen = HashSet::with_capacity(factors.len());

        for f in &factors {
            if !f.factor.is_finite() || f.factor < 0.0 {
                return Err(FactorError::InvalidFactor {
                    category: f.category,
                    item: f.item.clone(),
                    factor: f.factor,
                });
            }
            if !seen.insert((f.category, f.item.as_str())) {
                return Err(FactorError::Duplicate {
                    category: f.category,
                    item: f.item.clone(),
                });
            }
        }

        Ok(Self::build(factors))
    }

    fn build(factors: Vec<EmissionFactor>) -> Self {
        let index = factors
            .iter()
            .enumerate()
            .map(|(i, f)| ((f.category, f.item.clone()), i))
            .collect();
        Self { factors, index }
    }

    /// Load a table from a JSON file (array of factor objects).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FactorError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| FactorError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a table from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, FactorError> {
        let factors: Vec<EmissionFactor> = serde_json::from_str(json_data)
            .map_err(|e| FactorError::ParseError(e.to_string()))?;
        let table = Self::from_factors(factors)?;
        tracing::info!(count = table.len(), "Loaded emission factors");
        Ok(table)
    }

    /// Factor for an item, in kg CO2e per unit.
    pub fn lookup(&self, category: Category, item: &str) -> Result<f64, FactorError> {
        self.get(category, item)
            .map(|f| f.factor)
            .ok_or_else(|| FactorError::UnknownFactor {
                category,
                item: item.to_string(),
            })
    }

    pub fn get(&self, category: Category, item: &str) -> Option<&EmissionFactor> {
        self.index
            .get(&(category, item.to_string()))
            .map(|&i| &self.factors[i])
    }

    /// Description of an item, or a fixed text for unknown or undescribed items.
    pub fn describe(&self, category: Category, item: &str) -> &str {
        self.get(category, item)
            .and_then(|f| f.description.as_deref())
            .unwrap_or(UNKNOWN_ACTIVITY_DESCRIPTION)
    }

    /// Category-level unit label.
    pub fn unit_for(category: Category) -> &'static str {
        category.unit()
    }

    /// All items of a category, in declaration order.
    pub fn items(&self, category: Category) -> impl Iterator<Item = &EmissionFactor> + '_ {
        self.factors.iter().filter(move |f| f.category == category)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Errors from factor table operations.
#[derive(Debug, thiserror::Error)]
pub enum FactorError {
    #[error("No emission factor for {category}/{item}")]
    UnknownFactor { category: Category, item: String },

    #[error("Invalid emission factor {factor} for {category}/{item}")]
    InvalidFactor {
        category: Category,
        item: String,
        factor: f64,
    },

    #[error("Duplicate emission factor for {category}/{item}")]
    Duplicate { category: Category, item: String },

    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse factor table: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup() {
        let table = EmissionFactorTable::standard();
        assert_eq!(table.lookup(Category::Transportation, "car_small").unwrap(), 0.122);
        assert_eq!(table.lookup(Category::Transportation, "bus").unwrap(), 0.089);
        assert_eq!(table.lookup(Category::Diet, "beef").unwrap(), 27.0);
    }

    #[test]
    fn test_unknown_factor() {
        let table = EmissionFactorTable::standard();
        let err = table.lookup(Category::Diet, "car_small").unwrap_err();
        assert!(matches!(err, FactorError::UnknownFactor { .. }));
    }

    #[test]
    fn test_items_in_declaration_order() {
        let table = EmissionFactorTable::standard();
        let energy: Vec<&str> = table
            .items(Category::Energy)
            .map(|f| f.item.as_str())
            .collect();
        assert_eq!(
            energy,
            vec!["electricity", "natural_gas", "coal", "gasoline", "diesel"]
        );
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"[
            {"category": "transportation", "item": "bus", "factor": 0.05, "unit": "km"},
            {"category": "diet", "item": "tofu", "factor": 3.0, "unit": "kg"}
        ]"#;
        let table = EmissionFactorTable::load_from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(Category::Diet, "tofu").unwrap(), 3.0);
        assert!(table.lookup(Category::Transportation, "car_small").is_err());
    }

    #[test]
    fn test_describe_known_and_unknown_items() {
        let table = EmissionFactorTable::standard();
        assert_eq!(
            table.describe(Category::Transportation, "walking"),
            "Walking is a zero-emission way to get around"
        );
        assert_eq!(
            table.describe(Category::Diet, "rocket_fuel"),
            UNKNOWN_ACTIVITY_DESCRIPTION
        );
        // Right item, wrong category
        assert_eq!(
            table.describe(Category::Energy, "beef"),
            UNKNOWN_ACTIVITY_DESCRIPTION
        );
    }

    #[test]
    fn test_every_standard_item_is_described() {
        let table = EmissionFactorTable::standard();
        for category in Category::ALL {
            for factor in table.items(category) {
                assert_ne!(
                    table.describe(category, &factor.item),
                    UNKNOWN_ACTIVITY_DESCRIPTION,
                    "{}/{}",
                    category,
                    factor.item
                );
            }
        }
    }

    #[test]
    fn test_json_description_is_optional() {
        let json = r#"[
            {"category": "diet", "item": "tofu", "factor": 3.0, "unit": "kg", "description": "Soy protein"},
            {"category": "diet", "item": "seitan", "factor": 1.0, "unit": "kg"}
        ]"#;
        let table = EmissionFactorTable::load_from_json(json).unwrap();
        assert_eq!(table.describe(Category::Diet, "tofu"), "Soy protein");
        assert_eq!(
            table.describe(Category::Diet, "seitan"),
            UNKNOWN_ACTIVITY_DESCRIPTION
        );
    }

    #[test]
    fn test_rejects_negative_factor() {
        let json = r#"[{"category": "energy", "item": "solar", "factor": -1.0, "unit": "kWh"}]"#;
        let err = EmissionFactorTable::load_from_json(json).unwrap_err();
        assert!(matches!(err, FactorError::InvalidFactor { .. }));
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let json = r#"[
            {"category": "energy", "item": "coal", "factor": 2.4, "unit": "kg"},
            {"category": "energy", "item": "coal", "factor": 3.5, "unit": "kg"}
        ]"#;
        let err = EmissionFactorTable::load_from_json(json).unwrap_err();
        assert!(matches!(err, FactorError::Duplicate { .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EmissionFactorTable::load_from_json("not json"),
            Err(FactorError::ParseError(_))
        ));
    }
}
