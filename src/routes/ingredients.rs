// ABOUTME: Route handlers for the ingredient catalog REST API
// ABOUTME: Serves the catalog with per-user effective facts and nutrition overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Ingredient catalog routes
//!
//! The catalog is read-only; the only write this module accepts is a
//! per-user nutrition override, which shadows the catalog defaults for
//! that user without touching anyone else's numbers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Ingredient, NutritionFacts};
use crate::resources::ServerResources;
use crate::routes::authenticate;

/// Request body for overriding an ingredient's nutrition facts
#[derive(Debug, Deserialize)]
pub struct UpdateNutritionBody {
    pub calories: f64,
    pub protein: f64,
    pub fiber: f64,
    pub sugar: f64,
}

/// Response for listing the ingredient catalog
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    /// Catalog entries in display order with the caller's overrides applied
    pub ingredients: Vec<Ingredient>,
    /// Total number of catalog entries
    pub total: usize,
}

/// Ingredient routes handler
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients", get(Self::handle_list))
            .route("/api/ingredients/:id", get(Self::handle_get))
            .route(
                "/api/ingredients/:id/nutrition",
                patch(Self::handle_update_nutrition),
            )
            .with_state(resources)
    }

    /// Handle GET /api/ingredients - List the catalog with effective facts
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let ingredients = resources
            .database
            .ingredients()
            .list_effective(auth.user_id)
            .await?;
        let response = ListIngredientsResponse {
            total: ingredients.len(),
            ingredients,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/ingredients/:id - Get one ingredient with effective facts
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(ingredient_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let ingredient = resources
            .database
            .ingredients()
            .get_effective(ingredient_id, auth.user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Ingredient").with_resource_id(ingredient_id.to_string())
            })?;

        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle PATCH /api/ingredients/:id/nutrition - Override facts for the caller
    async fn handle_update_nutrition(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(ingredient_id): Path<i64>,
        Json(body): Json<UpdateNutritionBody>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let facts = NutritionFacts {
            calories: body.calories,
            protein: body.protein,
            fiber: body.fiber,
            sugar: body.sugar,
        };
        if facts.has_negative_values() {
            return Err(AppError::invalid_input(
                "Nutrition values must be non-negative",
            ));
        }

        let catalog = resources.database.ingredients();
        let ingredient = catalog.get(ingredient_id).await?.ok_or_else(|| {
            AppError::not_found("Ingredient").with_resource_id(ingredient_id.to_string())
        })?;

        catalog
            .set_override(auth.user_id, ingredient.id, &facts)
            .await?;
        tracing::info!(
            "Updated nutrition override for ingredient {} (user {})",
            ingredient.id,
            auth.user_id
        );

        let updated = Ingredient { facts, ..ingredient };
        Ok((StatusCode::OK, Json(updated)).into_response())
    }
}
