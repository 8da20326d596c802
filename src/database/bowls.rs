// ABOUTME: Bowl composition database operations with single-unsaved-bowl enforcement
// ABOUTME: Handles bowl lifecycle, ingredient edges, and effective facts for aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::database::is_unique_violation;
use crate::errors::{AppError, AppResult};
use crate::models::{Bowl, BowlIngredient};

/// Bowl composition database operations manager
///
/// The single-unsaved-bowl-per-user invariant is enforced by a partial
/// unique index on `bowls(user_id) WHERE saved = 0`; creation races are
/// resolved by re-reading the winning row.
pub struct BowlStore {
    pool: SqlitePool,
}

impl BowlStore {
    /// Create a new bowl store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the bowls and bowl_ingredients tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bowls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                saved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                saved_at TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create bowls table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bowl_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                bowl_id INTEGER NOT NULL REFERENCES bowls(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create bowl_ingredients table: {e}")))?;

        // One unsaved bowl per user, enforced at the storage layer
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_bowls_one_unsaved_per_user
            ON bowls(user_id) WHERE saved = 0
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create unsaved bowl index: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_bowls_user_saved ON bowls(user_id, saved)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create bowls index: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_bowl_ingredients_bowl_id ON bowl_ingredients(bowl_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create bowl_ingredients index: {e}")))?;

        Ok(())
    }

    /// Get a bowl by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, bowl_id: i64) -> AppResult<Option<Bowl>> {
        let row = sqlx::query(
            r"
            SELECT id, name, user_id, saved, created_at, saved_at
            FROM bowls
            WHERE id = $1
            ",
        )
        .bind(bowl_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get bowl: {e}")))?;

        row.map(|r| row_to_bowl(&r)).transpose()
    }

    /// Get a user's unsaved bowl, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_unsaved(&self, user_id: i64) -> AppResult<Option<Bowl>> {
        let row = sqlx::query(
            r"
            SELECT id, name, user_id, saved, created_at, saved_at
            FROM bowls
            WHERE user_id = $1 AND saved = 0
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get unsaved bowl: {e}")))?;

        row.map(|r| row_to_bowl(&r)).transpose()
    }

    /// Get the user's unsaved bowl, creating it when absent
    ///
    /// Two concurrent creators race on the partial unique index; the loser's
    /// insert fails with a unique violation and the winner's row is re-read,
    /// so both callers observe the same bowl.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_or_create_unsaved(&self, user_id: i64, name: &str) -> AppResult<Bowl> {
        if let Some(bowl) = self.get_unsaved(user_id).await? {
            return Ok(bowl);
        }

        match self.insert_unsaved(user_id, name).await {
            Ok(bowl) => Ok(bowl),
            Err(e) if is_unique_violation(&e) => {
                // Lost the creation race; the winner's bowl is authoritative
                self.get_unsaved(user_id).await?.ok_or_else(|| {
                    AppError::internal("Unsaved bowl vanished after creation conflict")
                })
            }
            Err(e) => Err(AppError::database(format!(
                "Failed to create unsaved bowl: {e}"
            ))),
        }
    }

    /// Replace the user's unsaved bowl with a fresh one
    ///
    /// Deletes any existing unsaved bowl together with its ingredient edges
    /// and inserts the replacement in a single transaction. Saved bowls are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_replacing_unsaved(&self, user_id: i64, name: &str) -> AppResult<Bowl> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            DELETE FROM bowl_ingredients
            WHERE bowl_id IN (SELECT id FROM bowls WHERE user_id = $1 AND saved = 0)
            ",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear unsaved bowl edges: {e}")))?;

        sqlx::query("DELETE FROM bowls WHERE user_id = $1 AND saved = 0")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear unsaved bowl: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO bowls (name, user_id, saved, created_at, saved_at)
            VALUES ($1, $2, 0, $3, NULL)
            ",
        )
        .bind(name)
        .bind(user_id)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let bowl_id = result.last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit bowl replacement: {e}")))?;

        Ok(Bowl {
            id: bowl_id,
            name: name.to_owned(),
            user_id,
            saved: false,
            created_at: now,
            saved_at: None,
        })
    }

    /// Add an ingredient occurrence to a bowl
    ///
    /// Each call inserts a distinct edge; repetition is represented by
    /// multiple edges for the same ingredient.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn add_ingredient(
        &self,
        bowl_id: i64,
        ingredient_id: i64,
    ) -> AppResult<BowlIngredient> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO bowl_ingredients (bowl_id, ingredient_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(bowl_id)
        .bind(ingredient_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add ingredient to bowl: {e}")))?;

        Ok(BowlIngredient {
            id: result.last_insert_rowid(),
            bowl_id,
            ingredient_id,
            created_at: now,
        })
    }

    /// Remove a single ingredient occurrence from a bowl by its entry id
    ///
    /// The entry must belong to the given bowl; returns false when no
    /// matching edge exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove_ingredient(&self, bowl_id: i64, entry_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bowl_ingredients WHERE id = $1 AND bowl_id = $2")
            .bind(entry_id)
            .bind(bowl_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to remove ingredient from bowl: {e}"))
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// List a bowl's ingredient edges in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ingredients(&self, bowl_id: i64) -> AppResult<Vec<BowlIngredient>> {
        let rows = sqlx::query(
            r"
            SELECT id, bowl_id, ingredient_id, created_at
            FROM bowl_ingredients
            WHERE bowl_id = $1
            ORDER BY id
            ",
        )
        .bind(bowl_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list bowl ingredients: {e}")))?;

        rows.iter().map(row_to_bowl_ingredient).collect()
    }

    /// Mark a bowl as saved, stamping `saved_at` exactly once
    ///
    /// Saving an already-saved bowl is a no-op that returns the bowl with
    /// its original `saved_at` intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn save(&self, bowl_id: i64) -> AppResult<Option<Bowl>> {
        let Some(bowl) = self.get(bowl_id).await? else {
            return Ok(None);
        };

        if bowl.saved {
            return Ok(Some(bowl));
        }

        // Guarded by saved = 0 so a concurrent save cannot restamp
        sqlx::query("UPDATE bowls SET saved = 1, saved_at = $1 WHERE id = $2 AND saved = 0")
            .bind(Utc::now().to_rfc3339())
            .bind(bowl_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to save bowl: {e}")))?;

        self.get(bowl_id).await
    }

    /// Rename a bowl
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn rename(&self, bowl_id: i64, name: &str) -> AppResult<Option<Bowl>> {
        let result = sqlx::query("UPDATE bowls SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(bowl_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to rename bowl: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(bowl_id).await
    }

    /// Delete a bowl and its ingredient edges
    ///
    /// Edges and the bowl row go in one transaction; returns false when the
    /// bowl does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, bowl_id: i64) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM bowl_ingredients WHERE bowl_id = $1")
            .bind(bowl_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete bowl edges: {e}")))?;

        let result = sqlx::query("DELETE FROM bowls WHERE id = $1")
            .bind(bowl_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete bowl: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit bowl deletion: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the user's unsaved bowl and its edges, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete_unsaved(&self, user_id: i64) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            DELETE FROM bowl_ingredients
            WHERE bowl_id IN (SELECT id FROM bowls WHERE user_id = $1 AND saved = 0)
            ",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear unsaved bowl edges: {e}")))?;

        let result = sqlx::query("DELETE FROM bowls WHERE user_id = $1 AND saved = 0")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear unsaved bowl: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit bowl reset: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's saved bowls, most recently saved first
    ///
    /// Ties on `saved_at` break by id, newest first, so the order is total
    /// and stable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_saved(&self, user_id: i64) -> AppResult<Vec<Bowl>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, user_id, saved, created_at, saved_at
            FROM bowls
            WHERE user_id = $1 AND saved = 1
            ORDER BY saved_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list saved bowls: {e}")))?;

        rows.iter().map(row_to_bowl).collect()
    }

    /// Insert a fresh unsaved bowl, surfacing raw database errors
    ///
    /// Callers inspect the error for unique violations on the partial index.
    async fn insert_unsaved(&self, user_id: i64, name: &str) -> Result<Bowl, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO bowls (name, user_id, saved, created_at, saved_at)
            VALUES ($1, $2, 0, $3, NULL)
            ",
        )
        .bind(name)
        .bind(user_id)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Bowl {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            user_id,
            saved: false,
            created_at: now,
            saved_at: None,
        })
    }
}

/// Convert a database row to a Bowl struct
fn row_to_bowl(row: &SqliteRow) -> AppResult<Bowl> {
    let saved: i64 = row.get("saved");
    let created_at_str: String = row.get("created_at");
    let saved_at_str: Option<String> = row.get("saved_at");

    Ok(Bowl {
        id: row.get("id"),
        name: row.get("name"),
        user_id: row.get("user_id"),
        saved: saved == 1,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        saved_at: saved_at_str
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
    })
}

/// Convert a database row to a bowl ingredient edge
fn row_to_bowl_ingredient(row: &SqliteRow) -> AppResult<BowlIngredient> {
    let created_at_str: String = row.get("created_at");

    Ok(BowlIngredient {
        id: row.get("id"),
        bowl_id: row.get("bowl_id"),
        ingredient_id: row.get("ingredient_id"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
