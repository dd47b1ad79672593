// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for display formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a UTC timestamp for tables ("YYYY-MM-DD HH:MM").
pub fn format_table_time(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an emission in kg CO2e with a magnitude-appropriate unit.
pub fn format_emission(kg: f64) -> String {
    if kg == 0.0 {
        "0 kg".to_string()
    } else if kg < 0.001 {
        format!("{:.2} mg", kg * 1_000_000.0)
    } else if kg < 1.0 {
        format!("{:.2} g", kg * 1000.0)
    } else if kg < 1000.0 {
        format!("{:.2} kg", kg)
    } else {
        format!("{:.2} t", kg / 1000.0)
    }
}
