// ABOUTME: Bowl business logic extracted from route handlers
// ABOUTME: Orchestrates ownership checks, composition changes, and nutrition summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::environment::NutritionThresholds;
use crate::constants::{defaults, limits, messages};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Bowl, Ingredient, NutritionFacts};
use crate::nutrition::{summarize, NutritionSummary};
use crate::services::access::verify_bowl_access;

/// One ingredient occurrence in a bowl view
///
/// The id is the edge id; removing this occurrence goes through it.
#[derive(Debug, Clone, Serialize)]
pub struct BowlIngredientView {
    /// Edge id for this occurrence
    pub id: i64,
    /// The referenced ingredient with the caller's effective facts
    pub ingredient: Ingredient,
}

/// Read-side projection of a bowl with its contents and nutrition
#[derive(Debug, Clone, Serialize)]
pub struct BowlView {
    /// Bowl id
    pub id: i64,
    /// Bowl name
    pub name: String,
    /// Owning user id
    pub user_id: i64,
    /// Whether the bowl has been finalized
    pub saved: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// First save timestamp, if saved
    pub saved_at: Option<DateTime<Utc>>,
    /// Ingredient occurrences in insertion order
    pub ingredients: Vec<BowlIngredientView>,
    /// Aggregated nutrition for the current contents
    pub nutrition: NutritionSummary,
}

/// Bowl composition service
///
/// Every operation takes the authenticated user's id and enforces the
/// ownership guard before touching a bowl.
#[derive(Clone)]
pub struct BowlService {
    database: Database,
    thresholds: NutritionThresholds,
}

impl BowlService {
    /// Create a new bowl service
    #[must_use]
    pub const fn new(database: Database, thresholds: NutritionThresholds) -> Self {
        Self {
            database,
            thresholds,
        }
    }

    /// Get the user's unsaved bowl, creating an empty one when absent
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn current_bowl(&self, user_id: i64) -> AppResult<BowlView> {
        let bowl = self
            .database
            .bowls()
            .get_or_create_unsaved(user_id, defaults::DEFAULT_BOWL_NAME)
            .await?;

        self.view_of(bowl, user_id).await
    }

    /// Start a fresh bowl, replacing any existing unsaved one
    ///
    /// The previous unsaved bowl and its edges are removed in the same
    /// transaction; saved bowls are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if name validation or the database operation fails
    pub async fn create_bowl(&self, user_id: i64, name: Option<&str>) -> AppResult<BowlView> {
        let name = match name {
            Some(raw) => validate_bowl_name(raw)?,
            None => defaults::DEFAULT_BOWL_NAME.to_owned(),
        };

        let bowl = self
            .database
            .bowls()
            .create_replacing_unsaved(user_id, &name)
            .await?;

        tracing::info!("Created bowl {} for user {}", bowl.id, user_id);
        self.view_of(bowl, user_id).await
    }

    /// Read a bowl the user owns, with contents and nutrition
    ///
    /// # Errors
    ///
    /// Returns an error if the bowl is missing, owned by another user, or
    /// the database operation fails
    pub async fn bowl_view(&self, user_id: i64, bowl_id: i64) -> AppResult<BowlView> {
        let bowl = self.load_owned(user_id, bowl_id).await?;
        self.view_of(bowl, user_id).await
    }

    /// Add one occurrence of an ingredient to a bowl
    ///
    /// Repetition is modeled as multiple edges; adding the same ingredient
    /// twice yields two occurrences that each count in the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bowl or ingredient is missing, the bowl is
    /// owned by another user, or the database operation fails
    pub async fn add_ingredient(
        &self,
        user_id: i64,
        bowl_id: i64,
        ingredient_id: i64,
    ) -> AppResult<BowlView> {
        let bowl = self.load_owned(user_id, bowl_id).await?;

        validate_id(ingredient_id, "Ingredient")?;
        self.database
            .ingredients()
            .get(ingredient_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Ingredient").with_resource_id(ingredient_id.to_string())
            })?;

        let edge = self
            .database
            .bowls()
            .add_ingredient(bowl.id, ingredient_id)
            .await?;

        tracing::debug!(
            "Added ingredient {} to bowl {} (entry {})",
            ingredient_id,
            bowl.id,
            edge.id
        );
        self.view_of(bowl, user_id).await
    }

    /// Remove a single ingredient occurrence from a bowl by entry id
    ///
    /// # Errors
    ///
    /// Returns an error if the bowl or entry is missing, the bowl is owned
    /// by another user, or the database operation fails
    pub async fn remove_ingredient(
        &self,
        user_id: i64,
        bowl_id: i64,
        entry_id: i64,
    ) -> AppResult<BowlView> {
        let bowl = self.load_owned(user_id, bowl_id).await?;

        validate_id(entry_id, "Bowl ingredient entry")?;
        let removed = self
            .database
            .bowls()
            .remove_ingredient(bowl.id, entry_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Bowl ingredient entry")
                .with_resource_id(entry_id.to_string()));
        }

        tracing::debug!("Removed entry {} from bowl {}", entry_id, bowl.id);
        self.view_of(bowl, user_id).await
    }

    /// Finalize a bowl, stamping `saved_at` on the first transition
    ///
    /// Saving an already-saved bowl is a no-op success that preserves the
    /// original `saved_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bowl is missing, owned by another user, or
    /// the database operation fails
    pub async fn save_bowl(&self, user_id: i64, bowl_id: i64) -> AppResult<BowlView> {
        let bowl = self.load_owned(user_id, bowl_id).await?;

        let saved = self
            .database
            .bowls()
            .save(bowl.id)
            .await?
            .ok_or_else(|| AppError::not_found("Bowl").with_resource_id(bowl.id.to_string()))?;

        tracing::info!("Saved bowl {} for user {}", saved.id, user_id);
        self.view_of(saved, user_id).await
    }

    /// Rename a bowl the user owns
    ///
    /// # Errors
    ///
    /// Returns an error if name validation fails, the bowl is missing or
    /// owned by another user, or the database operation fails
    pub async fn rename_bowl(&self, user_id: i64, bowl_id: i64, name: &str) -> AppResult<BowlView> {
        let bowl = self.load_owned(user_id, bowl_id).await?;
        let name = validate_bowl_name(name)?;

        let renamed = self
            .database
            .bowls()
            .rename(bowl.id, &name)
            .await?
            .ok_or_else(|| AppError::not_found("Bowl").with_resource_id(bowl.id.to_string()))?;

        self.view_of(renamed, user_id).await
    }

    /// Delete a bowl the user owns together with its edges
    ///
    /// # Errors
    ///
    /// Returns an error if the bowl is missing, owned by another user, or
    /// the database operation fails
    pub async fn delete_bowl(&self, user_id: i64, bowl_id: i64) -> AppResult<()> {
        let bowl = self.load_owned(user_id, bowl_id).await?;

        let deleted = self.database.bowls().delete(bowl.id).await?;
        if !deleted {
            return Err(AppError::not_found("Bowl").with_resource_id(bowl.id.to_string()));
        }

        tracing::info!("Deleted bowl {} for user {}", bowl.id, user_id);
        Ok(())
    }

    /// Discard the user's unsaved bowl so the next access starts fresh
    ///
    /// Succeeds whether or not an unsaved bowl existed; returns true when
    /// one was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn reset_unsaved(&self, user_id: i64) -> AppResult<bool> {
        let removed = self.database.bowls().delete_unsaved(user_id).await?;
        if removed {
            tracing::info!("Reset unsaved bowl for user {}", user_id);
        }
        Ok(removed)
    }

    /// List the user's saved bowls, most recently saved first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_saved(&self, user_id: i64) -> AppResult<Vec<BowlView>> {
        let bowls = self.database.bowls().list_saved(user_id).await?;
        let catalog = self.catalog_index(user_id).await?;

        let mut views = Vec::with_capacity(bowls.len());
        for bowl in bowls {
            views.push(self.build_view(bowl, &catalog).await?);
        }
        Ok(views)
    }

    /// Fetch a bowl and verify the caller owns it
    async fn load_owned(&self, user_id: i64, bowl_id: i64) -> AppResult<Bowl> {
        validate_id(bowl_id, "Bowl")?;

        let bowl = self
            .database
            .bowls()
            .get(bowl_id)
            .await?
            .ok_or_else(|| AppError::not_found("Bowl").with_resource_id(bowl_id.to_string()))?;

        verify_bowl_access(bowl, user_id)
    }

    /// Build the read-side view for a bowl
    async fn view_of(&self, bowl: Bowl, user_id: i64) -> AppResult<BowlView> {
        let catalog = self.catalog_index(user_id).await?;
        self.build_view(bowl, &catalog).await
    }

    /// Effective catalog keyed by ingredient id
    async fn catalog_index(&self, user_id: i64) -> AppResult<HashMap<i64, Ingredient>> {
        let catalog = self.database.ingredients().list_effective(user_id).await?;
        Ok(catalog.into_iter().map(|i| (i.id, i)).collect())
    }

    /// Join a bowl's edges against the effective catalog and summarize
    async fn build_view(
        &self,
        bowl: Bowl,
        catalog: &HashMap<i64, Ingredient>,
    ) -> AppResult<BowlView> {
        let edges = self.database.bowls().list_ingredients(bowl.id).await?;

        let mut ingredients = Vec::with_capacity(edges.len());
        for edge in edges {
            let ingredient = catalog.get(&edge.ingredient_id).cloned().ok_or_else(|| {
                AppError::internal(format!(
                    "Bowl {} references unknown ingredient {}",
                    bowl.id, edge.ingredient_id
                ))
            })?;
            ingredients.push(BowlIngredientView {
                id: edge.id,
                ingredient,
            });
        }

        let facts: Vec<NutritionFacts> = ingredients
            .iter()
            .map(|entry| entry.ingredient.facts)
            .collect();
        let nutrition = summarize(&facts, &self.thresholds);

        Ok(BowlView {
            id: bowl.id,
            name: bowl.name,
            user_id: bowl.user_id,
            saved: bowl.saved,
            created_at: bowl.created_at,
            saved_at: bowl.saved_at,
            ingredients,
            nutrition,
        })
    }
}

/// Reject non-positive resource ids before they reach the database
fn validate_id(id: i64, what: &str) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::invalid_input(format!(
            "{what} id must be a positive integer"
        )));
    }
    Ok(())
}

/// Trim and validate a bowl name
fn validate_bowl_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input(messages::EMPTY_BOWL_NAME));
    }
    if name.len() > limits::MAX_BOWL_NAME_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Bowl name must be at most {} characters",
            limits::MAX_BOWL_NAME_LENGTH
        )));
    }
    Ok(name.to_owned())
}
