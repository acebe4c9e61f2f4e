// ABOUTME: Read-only provider directory (academies and clinics open to bookings)
// ABOUTME: Exposes public summaries only; emails and account details stay internal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use std::sync::Arc;

use crate::{
    auth::bearer_header,
    errors::AppError,
    models::{BookingType, User},
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::response::ApiResponse;

/// Query parameters for the provider list
#[derive(Debug, Deserialize)]
pub struct ListProvidersQuery {
    /// Only providers of this kind (`academy` or `clinic`)
    #[serde(rename = "type")]
    pub provider_type: Option<String>,
}

/// Public summary of a provider account
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    /// Account id, used as `providerId` when booking
    pub id: String,
    /// Public display name
    pub display_name: Option<String>,
    /// `academy` or `clinic`
    pub role: String,
}

impl From<User> for ProviderSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            role: user.role.as_str().to_owned(),
        }
    }
}

/// Provider directory route handlers
pub struct ProviderRoutes;

impl ProviderRoutes {
    /// Create provider routes with shared resources
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/providers", get(Self::handle_list))
            .route("/api/providers/:id", get(Self::handle_get))
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

    /// Handle GET /api/providers - Browse bookable accounts
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListProvidersQuery>,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources).await?;

        let role = query
            .provider_type
            .as_deref()
            .map(BookingType::parse)
            .transpose()?
            .map(|t| t.required_role());

        let providers: Vec<ProviderSummary> = resources
            .database
            .users()
            .list_providers(role)
            .await?
            .into_iter()
            .map(ProviderSummary::from)
            .collect();

        Ok((StatusCode::OK, Json(ApiResponse::ok(providers))).into_response())
    }

    /// Handle GET /api/providers/:id - Fetch one provider summary
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources).await?;

        let user = resources
            .database
            .users()
            .get_by_id(&id)
            .await?
            .filter(|u| u.role.is_provider())
            .ok_or_else(|| AppError::not_found(format!("Provider {id}")))?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(ProviderSummary::from(user))),
        )
            .into_response())
    }
}
