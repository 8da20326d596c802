// ABOUTME: Main library entry point for the Bowlful bowl composition platform
// ABOUTME: Provides the REST API, ingredient catalog, and nutrition aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

#![deny(unsafe_code)]

//! # Bowlful Server
//!
//! A bowl composition service: authenticated users assemble bowls from a
//! fixed ingredient catalog, see live nutrition summaries, and keep a
//! library of saved bowls.
//!
//! ## Features
//!
//! - **Bowl building**: One in-progress bowl per user, saved bowls unlimited
//! - **Ingredient catalog**: Position-ordered, seeded once, immutable at runtime
//! - **Nutrition summaries**: Totals plus low/moderate/high tags per metric
//! - **Per-user overrides**: Users can re-pin an ingredient's nutrition facts
//! - **JWT authentication**: Stateless bearer tokens over bcrypt credentials
//!
//! ## Quick Start
//!
//! 1. Seed the ingredient catalog with the `seed-catalog` binary
//! 2. Start the API with `bowlful-server`
//! 3. Register a user via `POST /api/auth/register` and start building
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bowlful_server::config::environment::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("Bowlful server configured with port: HTTP={}", config.http_port);
//!
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests (tests/).
// They must remain `pub` so external consumers can access them.

/// Authentication and session management
pub mod auth;

/// Configuration management and persistence
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Database management and per-domain data managers
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for cross-cutting request concerns
pub mod middleware;

/// Core domain data structures
pub mod models;

/// Nutrition aggregation and level tagging
pub mod nutrition;

/// Centralized server resource management
pub mod resources;

/// HTTP routes for the bowl composition REST API
pub mod routes;

/// HTTP server assembly and lifecycle
pub mod server;

/// Domain service layer between routes and storage
pub mod services;
