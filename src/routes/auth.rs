// ABOUTME: User authentication route handlers for registration and login
// ABOUTME: Provides REST endpoints for account creation and JWT token issuance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Authentication routes for user management
//!
//! This module handles user registration and login. All handlers are thin
//! wrappers that delegate business logic to the service layer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthManager;
use crate::constants::{limits, messages};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// User registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub username: String,
    pub message: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User info for login response
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub jwt_token: String,
    pub expires_at: String,
    pub user: UserInfo,
}

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    database: Arc<Database>,
    auth_manager: Arc<AuthManager>,
}

impl AuthService {
    #[must_use]
    pub const fn new(database: Arc<Database>, auth_manager: Arc<AuthManager>) -> Self {
        Self {
            database,
            auth_manager,
        }
    }

    /// Handle user registration
    ///
    /// # Errors
    /// Returns error if user validation fails or the database operation fails
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        tracing::info!("User registration attempt for username: {}", request.username);

        // Validate username format
        if !Self::is_valid_username(&request.username) {
            return Err(AppError::invalid_input(messages::INVALID_USERNAME_FORMAT));
        }

        // Validate password strength
        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(messages::PASSWORD_TOO_WEAK));
        }

        // Check if user already exists
        if self
            .database
            .users()
            .get_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_input(messages::USER_ALREADY_EXISTS));
        }

        // Hash password
        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        // Create user
        let user = self
            .database
            .users()
            .create(
                &request.username,
                request.display_name.as_deref(),
                &password_hash,
            )
            .await?;

        tracing::info!(
            "User registered successfully: {} ({})",
            user.username,
            user.id
        );

        Ok(RegisterResponse {
            user_id: user.id,
            username: user.username,
            message: "User registered successfully".into(),
        })
    }

    /// Handle user login
    ///
    /// # Errors
    /// Returns error if authentication fails or token generation fails
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        tracing::info!("User login attempt for username: {}", request.username);

        // Get user from database; missing users fail with the same message
        // as a wrong password
        let Some(user) = self
            .database
            .users()
            .get_by_username(&request.username)
            .await?
        else {
            return Err(AppError::auth_invalid(messages::INVALID_CREDENTIALS));
        };

        // Verify password using spawn_blocking to avoid blocking async executor
        let password = request.password.clone();
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.username);
            return Err(AppError::auth_invalid(messages::INVALID_CREDENTIALS));
        }

        // Generate JWT token
        let jwt_token = self
            .auth_manager
            .generate_token(&user)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
        let expires_at =
            chrono::Utc::now() + chrono::Duration::hours(self.auth_manager.expiry_hours());

        tracing::info!(
            "User logged in successfully: {} ({})",
            user.username,
            user.id
        );

        Ok(LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id,
                username: user.username,
                display_name: user.display_name,
            },
        })
    }

    /// Validate username format
    ///
    /// Usernames are 3-30 characters of letters, digits, or underscore.
    #[must_use]
    pub fn is_valid_username(username: &str) -> bool {
        let length_ok = (limits::MIN_USERNAME_LENGTH..=limits::MAX_USERNAME_LENGTH)
            .contains(&username.chars().count());
        length_ok
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Validate password strength
    ///
    /// Passwords need a minimum length and at least one special character.
    #[must_use]
    pub fn is_valid_password(password: &str) -> bool {
        password.chars().count() >= limits::MIN_PASSWORD_LENGTH
            && password.chars().any(|c| !c.is_alphanumeric())
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .with_state(resources)
    }

    /// Build the auth service from shared resources
    fn service(resources: &Arc<ServerResources>) -> AuthService {
        AuthService::new(resources.database.clone(), resources.auth_manager.clone())
    }

    /// Handle POST /api/auth/register - Create a new user account
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let response = Self::service(&resources).register(body).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login - Authenticate and issue a token
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let response = Self::service(&resources).login(body).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
