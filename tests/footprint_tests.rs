// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint engine behavior against the standard factor table.
//!
//! These cover the numbers the comparison page shows: per-option
//! emissions, the savings gap, which option wins, and tree equivalents.

use carbon_compare::models::{Activity, Category, Lower};
use carbon_compare::services::{equivalent_trees, AdviceTier, FootprintEngine};

const EPSILON: f64 = 1e-9;

fn engine() -> FootprintEngine {
    FootprintEngine::default()
}

#[test]
fn test_emission_is_amount_times_factor() {
    let engine = engine();

    for category in Category::ALL {
        for factor in engine.factors().items(category) {
            for amount in [0.0, 0.5, 3.0, 120.0] {
                let activity = Activity::new(category, factor.item.clone(), amount);
                let emission = engine.emission_of(&activity);
                assert!(
                    (emission - amount * factor.factor).abs() < EPSILON,
                    "{}/{} x {} gave {}",
                    category,
                    factor.item,
                    amount,
                    emission
                );
            }
        }
    }
}

#[test]
fn test_unknown_item_or_negative_amount_is_zero() {
    let engine = engine();

    let unknown = Activity::new(Category::Transportation, "teleporter", 100.0);
    assert_eq!(engine.emission_of(&unknown), 0.0);

    // Known item, wrong category
    let misplaced = Activity::new(Category::Energy, "beef", 2.0);
    assert_eq!(engine.emission_of(&misplaced), 0.0);

    let negative = Activity::new(Category::Diet, "beef", -2.0);
    assert_eq!(engine.emission_of(&negative), 0.0);

    let nan = Activity::new(Category::Diet, "beef", f64::NAN);
    assert_eq!(engine.emission_of(&nan), 0.0);
}

#[test]
fn test_car_vs_bus_scenario() {
    let car = Activity::new(Category::Transportation, "car_small", 10.0);
    let bus = Activity::new(Category::Transportation, "bus", 10.0);

    let comparison = engine().compare(&car, &bus);

    assert!((comparison.option_a.emission - 1.22).abs() < EPSILON);
    assert!((comparison.option_b.emission - 0.89).abs() < EPSILON);
    assert!((comparison.savings - 0.33).abs() < EPSILON);
    assert_eq!(comparison.lower, Lower::B);
    assert_eq!(comparison.lower_option().activity.item, "bus");
    assert!((comparison.higher_emission() - 1.22).abs() < EPSILON);
}

#[test]
fn test_savings_symmetric() {
    let engine = engine();
    let pairs = [
        (
            Activity::new(Category::Diet, "beef", 0.5),
            Activity::new(Category::Diet, "vegetables", 0.5),
        ),
        (
            Activity::new(Category::Energy, "coal", 12.0),
            Activity::new(Category::Energy, "natural_gas", 7.5),
        ),
        (
            Activity::new(Category::Transportation, "plane_domestic", 800.0),
            Activity::new(Category::Transportation, "train", 800.0),
        ),
    ];

    for (a, b) in &pairs {
        let forward = engine.compare(a, b);
        let backward = engine.compare(b, a);
        assert!((forward.savings - backward.savings).abs() < EPSILON);
        assert!(forward.savings >= 0.0);
    }
}

#[test]
fn test_identical_options_zero_savings_and_lower_a() {
    let a = Activity::new(Category::Diet, "chicken", 1.5);
    let comparison = engine().compare(&a, &a);

    assert_eq!(comparison.savings, 0.0);
    assert_eq!(comparison.lower, Lower::A);
}

#[test]
fn test_tie_between_different_items_resolves_to_a() {
    let engine = engine();
    let walk = Activity::new(Category::Transportation, "walking", 3.0);
    let cycle = Activity::new(Category::Transportation, "cycling", 3.0);

    // Deterministic across repeated calls and either argument order
    for _ in 0..3 {
        assert_eq!(engine.compare(&walk, &cycle).lower, Lower::A);
        assert_eq!(engine.compare(&cycle, &walk).lower, Lower::A);
    }
}

#[test]
fn test_invalid_option_still_produces_comparison() {
    let broken = Activity::new(Category::Transportation, "car_small", f64::NAN);
    let bus = Activity::new(Category::Transportation, "bus", 10.0);

    let comparison = engine().compare(&broken, &bus);

    assert_eq!(comparison.option_a.emission, 0.0);
    assert_eq!(comparison.lower, Lower::A);
    assert!((comparison.savings - 0.89).abs() < EPSILON);
}

#[test]
fn test_equivalent_trees() {
    assert!((equivalent_trees(21.77) - 1.0).abs() < EPSILON);
    assert!((equivalent_trees(43.54) - 2.0).abs() < EPSILON);
}

#[test]
fn test_advice_tiers_are_monotonic() {
    let engine = engine();
    let thresholds = engine.thresholds();

    let mut last = AdviceTier::Low;
    for kg in [0.0, 0.5, 1.9, 2.0, 2.1, 5.0, 9.9, 10.0, 10.1, 50.0, 1e6] {
        let tier = thresholds.tier(kg);
        assert!(tier >= last, "tier went down at {} kg", kg);
        last = tier;
    }
    assert_eq!(last, AdviceTier::High);
}

#[test]
fn test_advice_nonempty_for_every_tier_and_category() {
    let engine = engine();
    for category in Category::ALL {
        for kg in [0.0, 5.0, 500.0] {
            assert!(!engine.reduction_advice(kg, category).is_empty());
        }
    }
}
