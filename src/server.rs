// ABOUTME: HTTP server assembly and lifecycle for the bowl composition API
// ABOUTME: Merges route groups into one axum router and serves it until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! HTTP server wiring
//!
//! Assembles the route groups into a single router, applies the shared
//! middleware layers, and runs the listener until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::constants::limits;
use crate::middleware::setup_cors;
use crate::resources::ServerResources;
use crate::routes::{AuthRoutes, BowlRoutes, HealthRoutes, IngredientRoutes};

/// HTTP server for the bowl composition API
#[derive(Clone)]
pub struct BowlfulServer {
    resources: Arc<ServerResources>,
}

impl BowlfulServer {
    /// Create a new server with centralized resource management
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Assemble the complete router with all route groups and middleware
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = setup_cors(&self.resources.config);
        let timeout = Duration::from_secs(self.resources.config.request_timeout_secs);

        Router::new()
            .merge(HealthRoutes::routes())
            .merge(AuthRoutes::routes(self.resources.clone()))
            .merge(IngredientRoutes::routes(self.resources.clone()))
            .merge(BowlRoutes::routes(self.resources.clone()))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(limits::MAX_REQUEST_BODY_BYTES))
                    .layer(cors)
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// Run the HTTP server on the given port until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server exits
    /// abnormally
    pub async fn run(self, port: u16) -> Result<()> {
        let app = self.router();
        let address = format!("0.0.0.0:{port}");

        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {address}"))?;
        info!("HTTP server listening on {}", address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server exited abnormally")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for a shutdown request (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
