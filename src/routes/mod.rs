// ABOUTME: Route module organization for Bowlful server HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain with clean separation of concerns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Route module for the Bowlful server
//!
//! This module organizes all HTTP routes by domain for better maintainability
//! and clear separation of concerns. Each domain module contains only route
//! definitions and thin handler functions that delegate to service layers.

/// Authentication and registration routes
pub mod auth;
/// Bowl composition and lifecycle routes
pub mod bowls;
/// Health check and system status routes
pub mod health;
/// Ingredient catalog and nutrition override routes
pub mod ingredients;

/// Authentication route handlers
pub use auth::AuthRoutes;
/// Bowl route handlers
pub use bowls::BowlRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Ingredient catalog route handlers
pub use ingredients::IngredientRoutes;

use axum::http::HeaderMap;

use crate::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Extract and authenticate the caller from the Authorization header
///
/// Only the `Bearer` scheme is accepted. The returned user id comes from
/// the validated token's `sub` claim.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> Result<AuthenticatedUser, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::auth_required)?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::auth_invalid("Authorization header must use the Bearer scheme")
    })?;

    let claims = resources.auth_manager.validate_token(token)?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

    Ok(AuthenticatedUser {
        user_id,
        username: claims.username,
    })
}
