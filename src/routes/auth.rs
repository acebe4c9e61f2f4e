// ABOUTME: Registration and login endpoints issuing bearer tokens
// ABOUTME: Passwords are bcrypt-hashed; verification runs on the blocking pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{User, UserRole, UserStatus},
    server::ServerResources,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::info;
use uuid::Uuid;

use super::response::ApiResponse;

/// Request body for registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email, must be unique
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Account role; defaults to `player`, `admin` is refused
    pub role: Option<String>,
    /// Optional public display name
    pub display_name: Option<String>,
}

/// Response body for registration
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Id of the newly created account
    pub user_id: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Response body for login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Token expiry, RFC 3339
    pub expires_at: String,
    /// Summary of the authenticated account
    pub user: UserInfo,
}

/// Public account summary
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Account id
    pub user_id: String,
    /// Login email
    pub email: String,
    /// Optional public display name
    pub display_name: Option<String>,
    /// Account role
    pub role: String,
}

/// Auth route handlers
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create auth routes with shared resources
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .with_state(resources)
    }

    /// Handle POST /api/auth/register - Create an account
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        if !is_valid_email(&body.email) {
            return Err(AppError::validation("Invalid email format"));
        }
        if body.password.len() < 8 {
            return Err(AppError::validation(
                "Password must be at least 8 characters",
            ));
        }

        let role = match body.role.as_deref() {
            None => UserRole::Player,
            Some(r) => UserRole::parse(r)?,
        };
        if role == UserRole::Admin {
            return Err(AppError::validation("Cannot register an admin account"));
        }

        let password_hash = bcrypt::hash(&body.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: body.email,
            password_hash,
            role,
            status: UserStatus::Active,
            display_name: body.display_name,
            created_at: now,
            last_active: now,
        };

        resources.database.users().create(&user).await?;

        info!(user_id = %user.id, role = role.as_str(), "User registered");

        let response = RegisterResponse { user_id: user.id };
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::with_message(
                response,
                "User registered successfully",
            )),
        )
            .into_response())
    }

    /// Handle POST /api/auth/login - Exchange credentials for a token
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .users()
            .get_by_email(&body.email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        // Verify on the blocking pool; bcrypt is deliberately slow
        let password = body.password;
        let password_hash = user.password_hash.clone();
        let is_valid = task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|_| AppError::unauthorized("Invalid email or password"))?;

        if !is_valid {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        if user.status == UserStatus::Suspended {
            return Err(AppError::forbidden("Account suspended"));
        }

        resources.database.users().update_last_active(&user.id).await?;

        let (token, expires_at) = resources.auth_manager.generate_token(&user)?;

        info!(user_id = %user.id, "User logged in");

        let response = LoginResponse {
            token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id,
                email: user.email,
                display_name: user.display_name,
                role: user.role.as_str().to_owned(),
            },
        };

        Ok((StatusCode::OK, Json(ApiResponse::ok(response))).into_response())
    }
}

/// Lightweight email shape check
fn is_valid_email(email: &str) -> bool {
    if email.len() <= 5 {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    let domain_part = &email[at_pos + 1..];
    domain_part.contains('.')
}
