// ABOUTME: Ownership verification for bowl operations
// ABOUTME: Ensures a bowl can only be read or mutated by the user who owns it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::models::Bowl;

/// Verify that a bowl belongs to the acting user
///
/// Returns the bowl unchanged on success. Every bowl operation that accepts
/// a bowl id runs through this guard; no mutation path may skip it.
///
/// # Errors
///
/// Returns [`crate::errors::ErrorCode::PermissionDenied`] when the bowl is
/// owned by a different user
pub fn verify_bowl_access(bowl: Bowl, user_id: i64) -> AppResult<Bowl> {
    if bowl.user_id == user_id {
        Ok(bowl)
    } else {
        tracing::warn!(
            "User {} denied access to bowl {} owned by user {}",
            user_id,
            bowl.id,
            bowl.user_id
        );
        Err(AppError::permission_denied(messages::BOWL_NOT_OWNED)
            .with_user_id(user_id)
            .with_resource_id(bowl.id.to_string()))
    }
}
