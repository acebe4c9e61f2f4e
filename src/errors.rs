// ABOUTME: Application error type with stable wire codes and HTTP status mapping
// ABOUTME: Every handler failure flows through AppError into the JSON error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::config::Environment;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Stable error taxonomy surfaced to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed or missing input, or an illegal state transition
    ValidationError,
    /// Referenced booking, provider, or notification is absent
    NotFound,
    /// Another non-terminal booking already occupies the slot
    Conflict,
    /// Caller is authenticated but lacks rights over this resource
    Forbidden,
    /// Missing or invalid identity
    Unauthorized,
    /// Unexpected server-side failure
    InternalError,
}

impl ErrorCode {
    /// Wire representation, stable across releases
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the code maps to, 1:1
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error carrying a wire code, human message, and optional details
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", code.as_str())]
pub struct AppError {
    /// Stable machine-readable code
    pub code: ErrorCode,
    /// Human-readable message safe to show to clients
    pub message: String,
    /// Optional structured payload (e.g. list of field validation errors)
    pub details: Option<Value>,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed input or illegal state transition
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Referenced resource does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Slot already taken by a non-terminal booking
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Caller lacks rights over this resource
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Missing or invalid identity
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Unexpected server-side failure; detail text is logged, not leaked
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Store-level failure; logs the underlying cause at error level
    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!("database error: {message}");
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(format!("Query failed: {err}"))
    }
}

/// Error half of the response envelope
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Failure envelope: `{ "success": false, "error": { ... } }`
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();

        // Internal failures keep their specifics server-side in production
        let (message, details) = if self.code == ErrorCode::InternalError
            && Environment::from_env().is_production()
        {
            ("Internal server error".into(), None)
        } else {
            (self.message, self.details)
        };

        let envelope = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code.as_str(),
                message,
                details,
            },
        };

        (status, Json(envelope)).into_response()
    }
}
