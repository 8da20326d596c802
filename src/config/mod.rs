// ABOUTME: Configuration management module for centralized server settings and parameters
// ABOUTME: Handles environment-driven config, database URLs, and nutrition threshold tuning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Configuration module for the Bowlful server
//!
//! Centralized configuration management:
//!
//! - **Environment**: Server configuration from environment variables
//! - **Nutrition**: Tag thresholds driving qualitative nutrition labels

/// Environment and server configuration
pub mod environment;

// Re-export main configuration types from environment
pub use environment::{
    AuthConfig, CorsConfig, DatabaseConfig, DatabaseUrl, LogLevel, NutritionThresholds,
    ServerConfig,
};
