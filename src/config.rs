// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Built once at startup and passed explicitly to every component.
//! Nothing reads the environment after `from_env` returns.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::{AdviceThresholds, EmissionFactorTable, FactorError};

/// Default per-owner retention cap.
pub const DEFAULT_RECORD_CAP: usize = 100;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted JSON values
    pub data_dir: PathBuf,
    /// Maximum records kept per identified owner
    pub record_cap: usize,
    /// Maximum records kept in the guest list
    pub guest_record_cap: usize,
    /// Below this many kg CO2e, advice is affirmative
    pub advice_low_kg: f64,
    /// Above this many kg CO2e, advice is category-specific
    pub advice_high_kg: f64,
    /// Optional JSON file replacing the built-in factor table
    pub factor_table_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let thresholds = AdviceThresholds::default();
        Self {
            data_dir: PathBuf::from("data"),
            record_cap: DEFAULT_RECORD_CAP,
            guest_record_cap: DEFAULT_RECORD_CAP,
            advice_low_kg: thresholds.low_kg,
            advice_high_kg: thresholds.high_kg,
            factor_table_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional. Unparseable numbers fall back to the
    /// default value; only an inverted threshold pair is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();
        let config = Self {
            data_dir: env::var("CARBON_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            record_cap: parse_or("CARBON_RECORD_CAP", defaults.record_cap),
            guest_record_cap: parse_or("CARBON_GUEST_RECORD_CAP", defaults.guest_record_cap),
            advice_low_kg: parse_or("CARBON_ADVICE_LOW_KG", defaults.advice_low_kg),
            advice_high_kg: parse_or("CARBON_ADVICE_HIGH_KG", defaults.advice_high_kg),
            factor_table_path: env::var("CARBON_FACTOR_TABLE").ok().map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.advice_low_kg >= 0.0 && self.advice_low_kg <= self.advice_high_kg) {
            return Err(ConfigError::InvalidThresholds {
                low: self.advice_low_kg,
                high: self.advice_high_kg,
            });
        }
        if self.record_cap == 0 || self.guest_record_cap == 0 {
            return Err(ConfigError::InvalidCap);
        }
        Ok(())
    }

    /// Advice tier thresholds derived from this configuration.
    pub fn advice_thresholds(&self) -> AdviceThresholds {
        AdviceThresholds {
            low_kg: self.advice_low_kg,
            high_kg: self.advice_high_kg,
        }
    }

    /// Load the configured factor table, or the built-in one.
    pub fn load_factor_table(&self) -> Result<EmissionFactorTable, FactorError> {
        match &self.factor_table_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading emission factor table");
                EmissionFactorTable::load_from_file(path)
            }
            None => Ok(EmissionFactorTable::standard()),
        }
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Advice thresholds must satisfy 0 <= low <= high (got low={low}, high={high})")]
    InvalidThresholds { low: f64, high: f64 },

    #[error("Retention caps must be at least 1")]
    InvalidCap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("CARBON_DATA_DIR", "/tmp/carbon-test");
        env::set_var("CARBON_RECORD_CAP", "25");
        env::set_var("CARBON_GUEST_RECORD_CAP", "not-a-number");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/carbon-test"));
        assert_eq!(config.record_cap, 25);
        assert_eq!(config.guest_record_cap, DEFAULT_RECORD_CAP);

        env::remove_var("CARBON_DATA_DIR");
        env::remove_var("CARBON_RECORD_CAP");
        env::remove_var("CARBON_GUEST_RECORD_CAP");
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = Config {
            advice_low_kg: 50.0,
            advice_high_kg: 5.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_default_loads_standard_table() {
        let table = Config::default()
            .load_factor_table()
            .expect("built-in table");
        assert!(!table.is_empty());
    }
}
