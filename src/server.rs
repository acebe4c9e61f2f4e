// ABOUTME: Shared server resources and the axum HTTP server assembly
// ABOUTME: Merges the per-resource routers and applies tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, warn, Level};

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::routes::{
    AuthRoutes, BookingRoutes, HealthRoutes, NotificationRoutes, ProviderRoutes,
};

/// Shared state threaded through every route handler
pub struct ServerResources {
    /// Connection pool and store managers
    pub database: Database,
    /// Token issuance and validation
    pub auth_manager: AuthManager,
    /// Runtime configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the shared server state
    #[must_use]
    pub const fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        Self {
            database,
            auth_manager,
            config,
        }
    }
}

/// HTTP server for the booking API
pub struct BookingServer {
    resources: Arc<ServerResources>,
}

impl BookingServer {
    /// Create a server around shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Bind the listener and serve until the process exits
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails
    pub async fn run(&self, port: u16) -> AppResult<()> {
        let app = Self::router(&self.resources);

        // Middleware layers apply bottom-up
        let app = app
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        info!("HTTP server listening on http://{addr}");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

        info!("Server stopped");
        Ok(())
    }

    /// Merge all route modules behind the shared resources
    #[must_use]
    pub fn router(resources: &Arc<ServerResources>) -> Router {
        Router::new()
            .merge(HealthRoutes::routes(Arc::clone(resources)))
            .merge(AuthRoutes::routes(Arc::clone(resources)))
            .merge(BookingRoutes::routes(Arc::clone(resources)))
            .merge(NotificationRoutes::routes(Arc::clone(resources)))
            .merge(ProviderRoutes::routes(Arc::clone(resources)))
    }
}

/// Resolve when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
