// ABOUTME: Environment-driven server configuration (port, database, JWT, log level)
// ABOUTME: Single source of runtime settings; production requires an explicit JWT secret
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use std::env;

use tracing::warn;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default SQLite database location when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/fieldhouse.db";
/// Default JWT lifetime in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Deployment environment, controls error detail exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development and CI
    Development,
    /// Live deployment; internal error details are suppressed
    Production,
}

impl Environment {
    /// Read from the `ENVIRONMENT` variable, defaulting to development
    #[must_use]
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT").map_or(Self::Development, |v| {
            match v.to_lowercase().as_str() {
                "production" | "prod" => Self::Production,
                _ => Self::Development,
            }
        })
    }

    /// Whether this is a live deployment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Runtime configuration resolved from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP listener binds
    pub http_port: u16,
    /// SQLite connection string
    pub database_url: String,
    /// HS256 signing secret for issued tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Deployment environment
    pub environment: Environment,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ServerConfig {
    /// Resolve configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset in production
    pub fn from_env() -> AppResult<Self> {
        let environment = Environment::from_env();

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                return Err(AppError::internal(
                    "JWT_SECRET must be set in production",
                ));
            }
            _ => {
                // Ephemeral secret: issued tokens die with the process
                warn!("JWT_SECRET not set, generating an ephemeral development secret");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        let jwt_expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRY_HOURS);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            jwt_expiry_hours,
            environment,
            log_level,
        })
    }
}
