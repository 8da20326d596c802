// ABOUTME: Route handlers for the bowl composition REST API
// ABOUTME: Provides endpoints for building, saving, listing, and deleting bowls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Bowl routes
//!
//! This module handles bowl endpoints for composing and managing bowls.
//! All endpoints require JWT authentication; ownership is enforced in the
//! service layer on every bowl id.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::routes::authenticate;
use crate::services::bowls::BowlView;

/// Request body for starting a new bowl
#[derive(Debug, Deserialize)]
pub struct CreateBowlBody {
    /// Bowl name; defaults when omitted
    pub name: Option<String>,
}

/// Request body for renaming a bowl
#[derive(Debug, Deserialize)]
pub struct RenameBowlBody {
    /// New bowl name
    pub name: String,
}

/// Request body for adding an ingredient occurrence
#[derive(Debug, Deserialize)]
pub struct AddIngredientBody {
    /// Catalog id of the ingredient to add
    pub ingredient_id: i64,
}

/// Response for listing saved bowls
#[derive(Debug, Serialize)]
pub struct ListBowlsResponse {
    /// Saved bowls, most recently saved first
    pub bowls: Vec<BowlView>,
    /// Total number of saved bowls
    pub total: usize,
}

/// Bowl routes handler
pub struct BowlRoutes;

impl BowlRoutes {
    /// Create all bowl routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/bowls", get(Self::handle_list_saved))
            .route("/api/bowls", post(Self::handle_create))
            .route("/api/bowls/current", get(Self::handle_current))
            .route("/api/bowls/current", delete(Self::handle_reset_current))
            .route("/api/bowls/:id", get(Self::handle_get))
            .route("/api/bowls/:id", put(Self::handle_rename))
            .route("/api/bowls/:id", delete(Self::handle_delete))
            .route("/api/bowls/:id/save", post(Self::handle_save))
            .route("/api/bowls/:id/ingredients", post(Self::handle_add_ingredient))
            .route(
                "/api/bowls/:id/ingredients/:entry_id",
                delete(Self::handle_remove_ingredient),
            )
            .with_state(resources)
    }

    /// Handle GET /api/bowls - List the caller's saved bowls
    async fn handle_list_saved(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let bowls = resources.bowl_service.list_saved(auth.user_id).await?;
        let response = ListBowlsResponse {
            total: bowls.len(),
            bowls,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/bowls - Start a fresh bowl, replacing any unsaved one
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateBowlBody>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources
            .bowl_service
            .create_bowl(auth.user_id, body.name.as_deref())
            .await?;

        Ok((StatusCode::CREATED, Json(view)).into_response())
    }

    /// Handle GET /api/bowls/current - Get or create the caller's unsaved bowl
    async fn handle_current(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources.bowl_service.current_bowl(auth.user_id).await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle DELETE /api/bowls/current - Discard the caller's unsaved bowl
    async fn handle_reset_current(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        resources.bowl_service.reset_unsaved(auth.user_id).await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/bowls/:id - Read one owned bowl with its summary
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bowl_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources
            .bowl_service
            .bowl_view(auth.user_id, bowl_id)
            .await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle PUT /api/bowls/:id - Rename an owned bowl
    async fn handle_rename(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bowl_id): Path<i64>,
        Json(body): Json<RenameBowlBody>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources
            .bowl_service
            .rename_bowl(auth.user_id, bowl_id, &body.name)
            .await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle DELETE /api/bowls/:id - Delete an owned bowl and its contents
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bowl_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        resources
            .bowl_service
            .delete_bowl(auth.user_id, bowl_id)
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/bowls/:id/save - Finalize an owned bowl
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bowl_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources
            .bowl_service
            .save_bowl(auth.user_id, bowl_id)
            .await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle POST /api/bowls/:id/ingredients - Add an ingredient occurrence
    async fn handle_add_ingredient(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(bowl_id): Path<i64>,
        Json(body): Json<AddIngredientBody>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources
            .bowl_service
            .add_ingredient(auth.user_id, bowl_id, body.ingredient_id)
            .await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }

    /// Handle DELETE /api/bowls/:id/ingredients/:entry_id - Remove one occurrence
    async fn handle_remove_ingredient(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((bowl_id, entry_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let view = resources
            .bowl_service
            .remove_ingredient(auth.user_id, bowl_id, entry_id)
            .await?;

        Ok((StatusCode::OK, Json(view)).into_response())
    }
}
