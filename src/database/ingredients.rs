// ABOUTME: Ingredient catalog database operations with per-user nutrition overrides
// ABOUTME: Serves the read-only catalog and layers user overrides into effective facts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, NutritionFacts, UserIngredientNutrition};

/// Ingredient catalog database operations manager
///
/// The catalog itself is read-only at runtime; it is populated by the
/// `seed-catalog` binary. Per-user nutrition overrides are the only rows
/// this manager writes.
pub struct IngredientCatalog {
    pool: SqlitePool,
}

impl IngredientCatalog {
    /// Create a new catalog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the ingredients and override tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                calories REAL NOT NULL,
                protein REAL NOT NULL,
                fiber REAL NOT NULL,
                sugar REAL NOT NULL,
                icon_filename TEXT,
                bowl_image_filename TEXT,
                is_drizzle INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredients table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_ingredient_nutrition (
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                calories REAL NOT NULL,
                protein REAL NOT NULL,
                fiber REAL NOT NULL,
                sugar REAL NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, ingredient_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create nutrition overrides table: {e}"))
        })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_ingredients_position ON ingredients(position)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredients index: {e}")))?;

        Ok(())
    }

    /// Get an ingredient by id with its catalog default facts
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, ingredient_id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(
            r"
            SELECT id, name, calories, protein, fiber, sugar,
                   icon_filename, bowl_image_filename, is_drizzle, position
            FROM ingredients
            WHERE id = $1
            ",
        )
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// Get an ingredient by id with the user's override applied
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_effective(
        &self,
        ingredient_id: i64,
        user_id: i64,
    ) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(
            r"
            SELECT i.id, i.name,
                   COALESCE(o.calories, i.calories) AS calories,
                   COALESCE(o.protein, i.protein) AS protein,
                   COALESCE(o.fiber, i.fiber) AS fiber,
                   COALESCE(o.sugar, i.sugar) AS sugar,
                   i.icon_filename, i.bowl_image_filename, i.is_drizzle, i.position
            FROM ingredients i
            LEFT JOIN user_ingredient_nutrition o
                   ON o.ingredient_id = i.id AND o.user_id = $2
            WHERE i.id = $1
            ",
        )
        .bind(ingredient_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// List the full catalog in display order with the user's overrides applied
    ///
    /// Order is the catalog-defined position, then id; stable across calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_effective(&self, user_id: i64) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            r"
            SELECT i.id, i.name,
                   COALESCE(o.calories, i.calories) AS calories,
                   COALESCE(o.protein, i.protein) AS protein,
                   COALESCE(o.fiber, i.fiber) AS fiber,
                   COALESCE(o.sugar, i.sugar) AS sugar,
                   i.icon_filename, i.bowl_image_filename, i.is_drizzle, i.position
            FROM ingredients i
            LEFT JOIN user_ingredient_nutrition o
                   ON o.ingredient_id = i.id AND o.user_id = $1
            ORDER BY i.position, i.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Resolve an ingredient's effective facts for a user
    ///
    /// Layers the user's override, if any, over the catalog defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn effective_facts(
        &self,
        user_id: i64,
        ingredient: &Ingredient,
    ) -> AppResult<NutritionFacts> {
        let override_row = self.get_override(user_id, ingredient.id).await?;
        Ok(override_row.map_or(ingredient.facts, |o| o.facts))
    }

    /// Get a user's nutrition override for an ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_override(
        &self,
        user_id: i64,
        ingredient_id: i64,
    ) -> AppResult<Option<UserIngredientNutrition>> {
        let row = sqlx::query(
            r"
            SELECT user_id, ingredient_id, calories, protein, fiber, sugar, updated_at
            FROM user_ingredient_nutrition
            WHERE user_id = $1 AND ingredient_id = $2
            ",
        )
        .bind(user_id)
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get nutrition override: {e}")))?;

        row.map(|r| row_to_override(&r)).transpose()
    }

    /// Upsert a user's nutrition override for an ingredient
    ///
    /// At most one row exists per (user, ingredient) pair; repeated calls
    /// replace the previous values.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn set_override(
        &self,
        user_id: i64,
        ingredient_id: i64,
        facts: &NutritionFacts,
    ) -> AppResult<UserIngredientNutrition> {
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO user_ingredient_nutrition (
                user_id, ingredient_id, calories, protein, fiber, sugar, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, ingredient_id) DO UPDATE SET
                calories = excluded.calories,
                protein = excluded.protein,
                fiber = excluded.fiber,
                sugar = excluded.sugar,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(ingredient_id)
        .bind(facts.calories)
        .bind(facts.protein)
        .bind(facts.fiber)
        .bind(facts.sugar)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to set nutrition override: {e}")))?;

        Ok(UserIngredientNutrition {
            user_id,
            ingredient_id,
            facts: *facts,
            updated_at: now,
        })
    }
}

/// Convert a database row to an Ingredient struct
fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let is_drizzle: i64 = row.get("is_drizzle");

    Ok(Ingredient {
        id: row.get("id"),
        name: row.get("name"),
        facts: NutritionFacts {
            calories: row.get("calories"),
            protein: row.get("protein"),
            fiber: row.get("fiber"),
            sugar: row.get("sugar"),
        },
        icon_filename: row.get("icon_filename"),
        bowl_image_filename: row.get("bowl_image_filename"),
        is_drizzle: is_drizzle == 1,
        position: row.get("position"),
    })
}

/// Convert a database row to an override struct
fn row_to_override(row: &SqliteRow) -> AppResult<UserIngredientNutrition> {
    let updated_at_str: String = row.get("updated_at");

    Ok(UserIngredientNutrition {
        user_id: row.get("user_id"),
        ingredient_id: row.get("ingredient_id"),
        facts: NutritionFacts {
            calories: row.get("calories"),
            protein: row.get("protein"),
            fiber: row.get("fiber"),
            sugar: row.get("sugar"),
        },
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
