// ABOUTME: Core data models for users, ingredients, bowls, and composition edges
// ABOUTME: Defines the persistence-backed structs shared by storage, services, and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! # Data Models
//!
//! Core data structures used throughout the Bowlful server.
//!
//! ## Design Principles
//!
//! - **Serializable**: All models support JSON serialization at the boundary
//! - **Type Safe**: Strong typing prevents common data handling errors
//! - **Storage Backed**: Each struct maps to one row of its table; derived
//!   aggregates (totals, tags) are computed on demand and never persisted
//!
//! ## Core Models
//!
//! - `User`: An account owning zero or more bowls
//! - `Ingredient`: A catalog entry with per-serving nutrition values
//! - `Bowl`: A user's in-progress or saved ingredient collection
//! - `BowlIngredient`: An edge recording an ingredient currently in a bowl
//! - `NutritionFacts`: The four per-serving metrics carried by an ingredient
//! - `UserIngredientNutrition`: A per-user override of an ingredient's facts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: i64,
    /// Login name (unique, 3-30 chars, alphanumeric plus underscore)
    pub username: String,
    /// Name shown in greetings and bowl listings
    pub display_name: Option<String>,
    /// Hashed password for authentication
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// The four per-serving nutrition metrics
///
/// Used both as the catalog values carried by an [`Ingredient`] and as the
/// payload of a per-user override. All values are per serving unit and
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    /// Kilocalories per serving
    pub calories: f64,
    /// Protein grams per serving
    pub protein: f64,
    /// Fiber grams per serving
    pub fiber: f64,
    /// Sugar grams per serving
    pub sugar: f64,
}

impl NutritionFacts {
    /// True when any metric is negative
    #[must_use]
    pub fn has_negative_values(&self) -> bool {
        self.calories < 0.0 || self.protein < 0.0 || self.fiber < 0.0 || self.sugar < 0.0
    }
}

/// Catalog ingredient
///
/// Immutable after creation: bowl operations never write to the catalog, and
/// user-specific adjustments live in [`UserIngredientNutrition`] rows instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient identifier
    pub id: i64,
    /// Unique ingredient name
    pub name: String,
    /// Default per-serving nutrition values
    #[serde(flatten)]
    pub facts: NutritionFacts,
    /// Selection list icon asset, when one exists
    pub icon_filename: Option<String>,
    /// Bowl display image asset, when one exists
    pub bowl_image_filename: Option<String>,
    /// Drizzle ingredients render as a topping layer; still counted in totals
    pub is_drizzle: bool,
    /// Catalog presentation order
    pub position: i64,
}

/// A user's bowl, in progress (unsaved) or finalized (saved)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bowl {
    /// Unique bowl identifier
    pub id: i64,
    /// Bowl name, non-empty after trimming
    pub name: String,
    /// Owning user
    pub user_id: i64,
    /// Whether the bowl has been finalized
    pub saved: bool,
    /// When the bowl was created
    pub created_at: DateTime<Utc>,
    /// Stamped on the first successful save; ordering key for saved listings
    pub saved_at: Option<DateTime<Utc>>,
}

/// Composition edge: one ingredient currently in one bowl
///
/// Repetition is expressed as multiple edges; there is no quantity column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BowlIngredient {
    /// Unique edge identifier
    pub id: i64,
    /// Bowl this edge belongs to
    pub bowl_id: i64,
    /// Ingredient this edge references
    pub ingredient_id: i64,
    /// When the ingredient was added
    pub created_at: DateTime<Utc>,
}

/// Per-user override of an ingredient's nutrition facts
///
/// At most one row per (user, ingredient) pair; replaces the catalog values
/// wholesale when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIngredientNutrition {
    /// Owning user
    pub user_id: i64,
    /// Overridden ingredient
    pub ingredient_id: i64,
    /// Replacement per-serving values
    pub facts: NutritionFacts,
    /// Last override write
    pub updated_at: DateTime<Utc>,
}
