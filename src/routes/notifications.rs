// ABOUTME: Endpoints for reading and acknowledging in-app notifications
// ABOUTME: All reads are scoped to the authenticated recipient; no cross-user access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use std::sync::Arc;

use crate::{auth::bearer_header, errors::AppError, models::User, server::ServerResources};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::response::ApiResponse;

/// Query parameters for the notification list
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Only unread notifications
    pub unread_only: Option<bool>,
    /// Page size, clamped server-side
    pub limit: Option<u32>,
}

/// Response body for mark-all-read
#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    /// Number of notifications flipped to read
    pub updated: u64,
}

/// Notification route handlers
pub struct NotificationRoutes;

impl NotificationRoutes {
    /// Create notification routes with shared resources
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/notifications", get(Self::handle_list))
            .route("/api/notifications/read-all", put(Self::handle_mark_all_read))
            .route("/api/notifications/:id/read", put(Self::handle_mark_read))
            .with_state(resources)
    }

    /// Extract and authenticate the caller from the authorization header
    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<User, AppError> {
        resources
            .auth_manager
            .authenticate_request(bearer_header(headers), &resources.database)
            .await
    }

    /// Handle GET /api/notifications - List the caller's notifications
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListNotificationsQuery>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let notifications = resources
            .database
            .notifications()
            .list(&caller.id, query.unread_only.unwrap_or(false), query.limit)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::ok(notifications))).into_response())
    }

    /// Handle PUT /api/notifications/:id/read - Acknowledge one notification
    async fn handle_mark_read(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let marked = resources
            .database
            .notifications()
            .mark_read(&id, &caller.id)
            .await?;

        if !marked {
            // Same response for absent ids and other users' rows
            return Err(AppError::not_found(format!("Notification {id}")));
        }

        Ok((
            StatusCode::OK,
            Json(ApiResponse::<()>::message_only("Notification marked read")),
        )
            .into_response())
    }

    /// Handle PUT /api/notifications/read-all - Acknowledge everything
    async fn handle_mark_all_read(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let updated = resources
            .database
            .notifications()
            .mark_all_read(&caller.id)
            .await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(MarkAllReadResponse { updated })),
        )
            .into_response())
    }
}
