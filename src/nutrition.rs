// ABOUTME: Pure nutrition aggregation over ingredient facts with threshold classification
// ABOUTME: Sums calories/protein/fiber/sugar and tags each total as low, moderate, or high
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Nutrition summary calculations
//!
//! Aggregates the nutrition facts of a bowl's ingredients into per-metric
//! totals and classifies each total against configurable thresholds. All
//! functions here are pure: same inputs, same outputs, no I/O.

use serde::{Deserialize, Serialize};

use crate::config::environment::NutritionThresholds;
use crate::models::NutritionFacts;

/// Classification of a nutrition total relative to its thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutritionLevel {
    /// Below the moderate bound
    Low,
    /// At or above the moderate bound, below the high bound
    Moderate,
    /// At or above the high bound
    High,
}

impl NutritionLevel {
    /// String form used in API responses
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for NutritionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated nutrition totals for a bowl with per-metric classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Total calories (kcal)
    pub calories: f64,
    /// Total protein (g)
    pub protein: f64,
    /// Total fiber (g)
    pub fiber: f64,
    /// Total sugar (g)
    pub sugar: f64,
    /// Classification of the calorie total
    pub calories_level: NutritionLevel,
    /// Classification of the protein total
    pub protein_level: NutritionLevel,
    /// Classification of the fiber total
    pub fiber_level: NutritionLevel,
    /// Classification of the sugar total
    pub sugar_level: NutritionLevel,
}

/// Classify a total against its moderate and high bounds
///
/// Boundary values land in the upper band: a total exactly at a bound
/// gets that bound's level.
const fn classify(value: f64, moderate_bound: f64, high_bound: f64) -> NutritionLevel {
    if value >= high_bound {
        NutritionLevel::High
    } else if value >= moderate_bound {
        NutritionLevel::Moderate
    } else {
        NutritionLevel::Low
    }
}

/// Aggregate ingredient facts into a classified nutrition summary
///
/// Each occurrence in `facts` contributes its full values, so an ingredient
/// added twice counts twice. An empty slice yields zero totals with every
/// metric classified `Low`.
#[must_use]
pub fn summarize(facts: &[NutritionFacts], thresholds: &NutritionThresholds) -> NutritionSummary {
    let mut calories = 0.0;
    let mut protein = 0.0;
    let mut fiber = 0.0;
    let mut sugar = 0.0;

    for item in facts {
        calories += item.calories;
        protein += item.protein;
        fiber += item.fiber;
        sugar += item.sugar;
    }

    NutritionSummary {
        calories,
        protein,
        fiber,
        sugar,
        calories_level: classify(calories, thresholds.calories_moderate, thresholds.calories_high),
        protein_level: classify(protein, thresholds.protein_moderate, thresholds.protein_high),
        fiber_level: classify(fiber, thresholds.fiber_moderate, thresholds.fiber_high),
        sugar_level: classify(sugar, thresholds.sugar_moderate, thresholds.sugar_high),
    }
}
