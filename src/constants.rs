// ABOUTME: System-wide constants and environment-based configuration values
// ABOUTME: Contains server defaults, validation limits, and nutrition threshold defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! # Constants Module
//!
//! Application constants and environment variable configuration.
//! This module provides both hardcoded constants and environment accessors.

use std::env;

/// Service identity constants
pub mod service {
    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Default server name
    pub const SERVER_NAME: &str = "bowlful-server";
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get `HTTP` server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .unwrap_or_else(|_| crate::constants::ports::DEFAULT_HTTP_PORT.to_string())
            .parse()
            .unwrap_or(crate::constants::ports::DEFAULT_HTTP_PORT)
    }

    /// Get database `URL` from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL")
            .unwrap_or_else(|_| crate::constants::defaults::DEFAULT_DATABASE_URL.into())
    }

    /// Get `JWT` signing secret from environment
    #[must_use]
    pub fn jwt_secret() -> Option<String> {
        env::var("JWT_SECRET").ok()
    }

    /// Get `JWT` expiry hours from environment or default
    #[must_use]
    pub fn jwt_expiry_hours() -> i64 {
        env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| crate::constants::limits::JWT_EXPIRY_HOURS.to_string())
            .parse()
            .unwrap_or(crate::constants::limits::JWT_EXPIRY_HOURS)
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    }
}

/// Default port configurations
pub mod ports {
    /// Default `HTTP` server port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}

/// Numeric limits and validation thresholds
pub mod limits {
    /// Authentication
    pub const MIN_PASSWORD_LENGTH: usize = 6;
    pub const MIN_USERNAME_LENGTH: usize = 3;
    pub const MAX_USERNAME_LENGTH: usize = 30;
    pub const JWT_EXPIRY_HOURS: i64 = 24;

    /// Bowl naming
    pub const MAX_BOWL_NAME_LENGTH: usize = 100;

    /// Storage pool sizing and patience
    pub const DB_MAX_CONNECTIONS: u32 = 5;
    pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

    /// Whole-request deadline enforced at the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request body cap in bytes
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
}

/// Default nutrition tag thresholds (value >= bound ranks the tag)
///
/// Overridable at runtime via `NUTRITION_*` environment variables; see
/// `config::environment::NutritionThresholds`.
pub mod nutrition {
    /// Calories tagged moderate at or above this bound
    pub const CALORIES_MODERATE: f64 = 200.0;
    /// Calories tagged high at or above this bound
    pub const CALORIES_HIGH: f64 = 400.0;
    /// Protein grams tagged moderate at or above this bound
    pub const PROTEIN_MODERATE: f64 = 10.0;
    /// Protein grams tagged high at or above this bound
    pub const PROTEIN_HIGH: f64 = 20.0;
    /// Fiber grams tagged moderate at or above this bound
    pub const FIBER_MODERATE: f64 = 3.0;
    /// Fiber grams tagged high at or above this bound
    pub const FIBER_HIGH: f64 = 6.0;
    /// Sugar grams tagged moderate at or above this bound
    pub const SUGAR_MODERATE: f64 = 10.0;
    /// Sugar grams tagged high at or above this bound
    pub const SUGAR_HIGH: f64 = 20.0;
}

/// User and application defaults
pub mod defaults {
    /// Name given to a lazily created unsaved bowl
    pub const DEFAULT_BOWL_NAME: &str = "My Bowl";

    /// Default database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/bowlful.db";
}

/// User-facing messages
pub mod messages {
    /// Authentication messages
    pub const INVALID_USERNAME_FORMAT: &str =
        "Username must be 3-30 characters of letters, digits, or underscores";
    pub const PASSWORD_TOO_WEAK: &str =
        "Password must be at least 6 characters and contain a special character";
    pub const USER_ALREADY_EXISTS: &str = "Username is already registered";
    pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

    /// Bowl messages
    pub const EMPTY_BOWL_NAME: &str = "Bowl name must not be empty";
    pub const BOWL_NOT_OWNED: &str = "Not authorized to access this bowl";
}
