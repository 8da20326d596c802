// ABOUTME: Production server binary for the Bowlful bowl composition API
// ABOUTME: Loads configuration, opens the database, and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! # Bowlful API Server Binary
//!
//! This binary starts the Bowlful REST API with user authentication,
//! bowl composition, and nutrition aggregation.

use anyhow::Result;
use bowlful_server::{
    auth::AuthManager,
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    resources::ServerResources,
    server::BowlfulServer,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "bowlful-server")]
#[command(about = "Bowlful API - Bowl composition and nutrition tracking service")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using default configuration for production mode");
            Args {
                http_port: None,
                database_url: None,
            }
        }
    };

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Apply command-line overrides
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&database_url)?;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Bowlful API - Production Mode");
    info!("{}", config.summary());

    // Initialize database and run migrations
    let database = Database::new(&config.database).await?;
    info!(
        "Database initialized successfully: {}",
        config.database.url.to_connection_string()
    );

    // Initialize authentication manager
    let auth_manager = AuthManager::new(&config.auth.jwt_secret, config.auth.jwt_expiry_hours);
    info!("Authentication manager initialized");

    // Create server resources and server
    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        config.clone(),
    ));
    let server = BowlfulServer::new(resources);

    info!("Server starting on port {} (HTTP)", config.http_port);

    // Display all available API endpoints
    display_available_endpoints(&config);

    info!("Ready to serve bowls!");

    // Run the server (includes all routes)
    if let Err(e) = server.run(config.http_port).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints with their ports
fn display_available_endpoints(config: &ServerConfig) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    info!("=== Available API Endpoints ===");
    display_auth_endpoints(&host, config.http_port);
    display_ingredient_endpoints(&host, config.http_port);
    display_bowl_endpoints(&host, config.http_port);
    display_health_endpoints(&host, config.http_port);
    info!("=== End of Endpoint List ===");
}

fn display_auth_endpoints(host: &str, port: u16) {
    info!("Authentication:");
    info!("   User Registration: POST http://{host}:{port}/api/auth/register");
    info!("   User Login:        POST http://{host}:{port}/api/auth/login");
}

fn display_ingredient_endpoints(host: &str, port: u16) {
    info!("Ingredient Catalog:");
    info!("   List Catalog:      GET http://{host}:{port}/api/ingredients");
    info!("   Get Ingredient:    GET http://{host}:{port}/api/ingredients/:id");
    info!("   Override Facts:    PATCH http://{host}:{port}/api/ingredients/:id/nutrition");
}

#[allow(clippy::cognitive_complexity)]
fn display_bowl_endpoints(host: &str, port: u16) {
    info!("Bowls:");
    info!("   List Saved Bowls:  GET http://{host}:{port}/api/bowls");
    info!("   Start New Bowl:    POST http://{host}:{port}/api/bowls");
    info!("   Current Bowl:      GET http://{host}:{port}/api/bowls/current");
    info!("   Discard Current:   DELETE http://{host}:{port}/api/bowls/current");
    info!("   Get Bowl:          GET http://{host}:{port}/api/bowls/:id");
    info!("   Rename Bowl:       PUT http://{host}:{port}/api/bowls/:id");
    info!("   Delete Bowl:       DELETE http://{host}:{port}/api/bowls/:id");
    info!("   Save Bowl:         POST http://{host}:{port}/api/bowls/:id/save");
    info!("   Add Ingredient:    POST http://{host}:{port}/api/bowls/:id/ingredients");
    info!("   Remove Ingredient: DELETE http://{host}:{port}/api/bowls/:id/ingredients/:entry_id");
}

fn display_health_endpoints(host: &str, port: u16) {
    info!("Monitoring:");
    info!("   Health Check:      GET http://{host}:{port}/health");
}
