// ABOUTME: Shared server resources threaded through every route handler
// ABOUTME: Bundles the database, auth manager, bowl service, and config behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Centralized dependency container for server components
//!
//! All shared server dependencies are created once at startup and passed
//! via `Arc<ServerResources>` to eliminate per-request construction.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::services::bowls::BowlService;

/// Shared resources for all protocol handlers
pub struct ServerResources {
    /// Database with connection pooling
    pub database: Arc<Database>,
    /// JWT authentication manager
    pub auth_manager: Arc<AuthManager>,
    /// Bowl composition service
    pub bowl_service: Arc<BowlService>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let bowl_service = BowlService::new(database.clone(), config.nutrition);

        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            bowl_service: Arc::new(bowl_service),
            config,
        }
    }
}
