// ABOUTME: Unauthenticated health endpoint reporting service and database status
// ABOUTME: Returns 200 with a degraded status rather than failing when the store is down
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use std::sync::Arc;

use crate::{errors::AppError, server::ServerResources};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::response::ApiResponse;

/// Health report for load balancers and uptime probes
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Report time, RFC 3339
    pub timestamp: String,
    /// `connected` or `unavailable`
    pub database: String,
}

/// Health route handlers
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health routes with shared resources
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /api/health - No auth required
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let database_ok = resources.database.health_check().await.is_ok();

        let response = HealthResponse {
            status: if database_ok { "healthy" } else { "degraded" }.to_owned(),
            service: "fieldhouse".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            timestamp: Utc::now().to_rfc3339(),
            database: if database_ok {
                "connected"
            } else {
                "unavailable"
            }
            .to_owned(),
        };

        Ok((StatusCode::OK, Json(ApiResponse::ok(response))).into_response())
    }
}
