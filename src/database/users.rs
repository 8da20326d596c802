// ABOUTME: User account database operations
// ABOUTME: Handles user registration lookups and credential storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::database::is_unique_violation;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// User account database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                display_name TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create users index: {e}")))?;

        Ok(())
    }

    /// Create a new user account
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ErrorCode::ResourceAlreadyExists`] if the
    /// username is taken, or a database error otherwise
    pub async fn create(
        &self,
        username: &str,
        display_name: Option<&str>,
        password_hash: &str,
    ) -> AppResult<User> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO users (username, display_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(username)
        .bind(display_name)
        .bind(password_hash)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(crate::constants::messages::USER_ALREADY_EXISTS)
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_owned(),
            display_name: display_name.map(str::to_owned),
            password_hash: password_hash.to_owned(),
            created_at: now,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, display_name, password_hash, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, display_name, password_hash, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by username: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }
}

/// Convert a database row to a User struct
fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let created_at_str: String = row.get("created_at");

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        password_hash: row.get("password_hash"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
