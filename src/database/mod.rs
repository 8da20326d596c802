// ABOUTME: Database management and connection pooling for SQLite storage
// ABOUTME: Owns the pool, runs schema migrations, and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! # Database Management
//!
//! This module provides database functionality for the Bowlful server. It
//! handles user storage, the ingredient catalog, and bowl composition data.
//! Each domain gets its own manager struct over the shared connection pool.

mod bowls;
mod ingredients;
mod users;

pub use bowls::BowlStore;
pub use ingredients::IngredientCatalog;
pub use users::UsersManager;

use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::config::environment::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};

/// Database manager for user, catalog, and bowl storage
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file's parent directory cannot be created
    /// - The connection pool cannot be established
    /// - Schema migration fails
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = &config.url {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::config(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_url = config.url.to_connection_string();
        let connection_options = if config.url.is_memory() {
            connection_url
        } else {
            format!("{connection_url}?mode=rwc")
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&connection_options)
            .await
            .map_err(|e| {
                AppError::storage_unavailable(format!("Failed to connect to database: {e}"))
            })?;

        let db = Self { pool };

        // Run migrations
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        // User tables
        self.users().migrate().await?;

        // Ingredient catalog tables
        self.ingredients().migrate().await?;

        // Bowl composition tables
        self.bowls().migrate().await?;

        Ok(())
    }

    /// User account operations
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Ingredient catalog operations
    #[must_use]
    pub fn ingredients(&self) -> IngredientCatalog {
        IngredientCatalog::new(self.pool.clone())
    }

    /// Bowl composition operations
    #[must_use]
    pub fn bowls(&self) -> BowlStore {
        BowlStore::new(self.pool.clone())
    }
}

/// Check whether a sqlx error is a unique constraint violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
