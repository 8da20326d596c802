// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, user, and catalog seeding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `bowlful_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use bowlful_server::{
    auth::AuthManager,
    config::environment::{
        AuthConfig, CorsConfig, DatabaseConfig, DatabaseUrl, LogLevel, NutritionThresholds,
        ServerConfig,
    },
    database::Database,
    models::User,
    resources::ServerResources,
};
use std::sync::{Arc, Once};

/// JWT signing secret shared by all test fixtures
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-not-for-production";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG environment variable controls test logging verbosity
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database with the full schema applied
///
/// The pool is capped at a single connection: each pooled connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let config = DatabaseConfig {
        url: DatabaseUrl::Memory,
        max_connections: 1,
        acquire_timeout_secs: 5,
    };
    let database = Arc::new(Database::new(&config).await?);
    Ok(database)
}

/// Create a test authentication manager with the shared secret
pub fn create_test_auth_manager() -> Arc<AuthManager> {
    Arc::new(AuthManager::new(TEST_JWT_SECRET, 24))
}

/// Create a standard test user
pub async fn create_test_user(database: &Database) -> Result<User> {
    create_test_user_named(database, "test_user").await
}

/// Create a test user with a custom username
pub async fn create_test_user_named(database: &Database, username: &str) -> Result<User> {
    let user = database
        .users()
        .create(username, Some("Test User"), "test_hash")
        .await?;
    Ok(user)
}

/// Insert a catalog ingredient directly, returning its id
///
/// Facts are given as `(calories, protein, fiber, sugar)`.
pub async fn seed_test_ingredient(
    database: &Database,
    name: &str,
    position: i64,
    facts: (f64, f64, f64, f64),
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO ingredients (name, calories, protein, fiber, sugar, is_drizzle, position)
        VALUES ($1, $2, $3, $4, $5, 0, $6)
        ",
    )
    .bind(name)
    .bind(facts.0)
    .bind(facts.1)
    .bind(facts.2)
    .bind(facts.3)
    .bind(position)
    .execute(database.pool())
    .await?;
    Ok(result.last_insert_rowid())
}

/// Server configuration for tests: in-memory database, permissive CORS
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        http_port: 8000,
        log_level: LogLevel::Info,
        request_timeout_secs: 30,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
            acquire_timeout_secs: 5,
        },
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_hours: 24,
        },
        cors: CorsConfig {
            allowed_origins: "*".to_string(),
        },
        nutrition: NutritionThresholds::default(),
    }
}

/// Complete resource bundle over a fresh in-memory database
pub async fn setup_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let auth_manager = create_test_auth_manager();
    let config = Arc::new(test_server_config());

    Ok(Arc::new(ServerResources::new(
        (*database).clone(),
        (*auth_manager).clone(),
        config,
    )))
}

/// Issue an Authorization header value for a user
pub fn bearer_token(resources: &ServerResources, user: &User) -> Result<String> {
    let token = resources.auth_manager.generate_token(user)?;
    Ok(format!("Bearer {token}"))
}
