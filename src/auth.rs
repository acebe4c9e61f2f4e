// ABOUTME: JWT issuance and validation plus request authentication against the user store
// ABOUTME: Tokens are HS256, carry user id/email/role, and expire after a configured lifetime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserStatus};

/// Claims embedded in issued tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Login email at issuance time
    pub email: String,
    /// Role at issuance time
    pub role: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Issues and validates bearer tokens
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: String,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a manager with the given signing secret and token lifetime
    #[must_use]
    pub const fn new(jwt_secret: String, expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            expiry_hours,
        }
    }

    /// Issue a token for `user`, returning the token and its expiry
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails
    pub fn generate_token(&self, user: &User) -> AppResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiry_hours);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role.as_str().into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Validate a raw token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error if the signature or expiry is invalid
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))
    }

    /// Authenticate a request from its `Authorization` header value
    ///
    /// Validates the bearer token, loads the account, and rejects
    /// suspended accounts.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error for missing/invalid credentials and
    /// a forbidden error for suspended accounts
    pub async fn authenticate_request(
        &self,
        auth_header: Option<&str>,
        database: &Database,
    ) -> AppResult<User> {
        let header =
            auth_header.ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Authorization header must be a bearer token"))?;

        let claims = self.validate_token(token)?;

        let user = database
            .users()
            .get_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        if user.status == UserStatus::Suspended {
            return Err(AppError::forbidden("Account suspended"));
        }

        Ok(user)
    }
}

/// Pull the `Authorization` header out of a request, if present
#[must_use]
pub fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get("authorization").and_then(|h| h.to_str().ok())
}
