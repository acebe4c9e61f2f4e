// ABOUTME: Tests for environment-driven configuration and error detail exposure
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};
use serial_test::serial;

use fieldhouse::config::{
    Environment, ServerConfig, DEFAULT_DATABASE_URL, DEFAULT_HTTP_PORT, DEFAULT_JWT_EXPIRY_HOURS,
};
use fieldhouse::errors::{AppError, ErrorCode};

const CONFIG_VARS: &[&str] = &[
    "ENVIRONMENT",
    "HTTP_PORT",
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRY_HOURS",
    "LOG_LEVEL",
];

fn clear_config_env() {
    for var in CONFIG_VARS {
        env::remove_var(var);
    }
}

/// Decode an error response into its status and JSON envelope
async fn error_envelope(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

// ============================================================================
// Configuration resolution
// ============================================================================

#[test]
#[serial]
fn test_defaults_when_env_unset() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.jwt_expiry_hours, DEFAULT_JWT_EXPIRY_HOURS);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.environment, Environment::Development);
    // Development falls back to an ephemeral generated secret
    assert_eq!(config.jwt_secret.len(), 64);
}

#[test]
#[serial]
fn test_env_overrides_applied() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DATABASE_URL", "sqlite:/tmp/override.db");
    env::set_var("JWT_SECRET", "an-explicit-secret");
    env::set_var("JWT_EXPIRY_HOURS", "6");
    env::set_var("LOG_LEVEL", "debug");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.database_url, "sqlite:/tmp/override.db");
    assert_eq!(config.jwt_secret, "an-explicit-secret");
    assert_eq!(config.jwt_expiry_hours, 6);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.environment, Environment::Production);
    assert!(config.environment.is_production());
}

#[test]
#[serial]
fn test_production_requires_jwt_secret() {
    clear_config_env();
    env::set_var("ENVIRONMENT", "production");

    let missing = ServerConfig::from_env();

    env::set_var("JWT_SECRET", "");
    let empty = ServerConfig::from_env();
    clear_config_env();

    let err = missing.unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
    assert!(err.message.contains("JWT_SECRET"));

    assert!(empty.is_err());
}

#[test]
#[serial]
fn test_environment_parsing() {
    clear_config_env();
    assert_eq!(Environment::from_env(), Environment::Development);

    for (value, expected) in [
        ("production", Environment::Production),
        ("prod", Environment::Production),
        ("PRODUCTION", Environment::Production),
        ("development", Environment::Development),
        ("staging", Environment::Development),
    ] {
        env::set_var("ENVIRONMENT", value);
        assert_eq!(Environment::from_env(), expected, "for value {value}");
    }
    clear_config_env();
}

#[test]
#[serial]
fn test_unparseable_numbers_fall_back() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");
    env::set_var("JWT_EXPIRY_HOURS", "soon");

    let config = ServerConfig::from_env().unwrap();
    clear_config_env();

    assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
    assert_eq!(config.jwt_expiry_hours, DEFAULT_JWT_EXPIRY_HOURS);
}

// ============================================================================
// Error detail exposure
// ============================================================================

#[tokio::test]
#[serial]
async fn test_internal_details_suppressed_in_production() {
    env::set_var("ENVIRONMENT", "production");

    let error = AppError::internal("connection refused at db:5432")
        .with_details(json!({ "host": "db", "port": 5432 }));
    let (status, body) = error_envelope(error.clone()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], json!("INTERNAL_ERROR"));
    assert_eq!(body["error"]["message"], json!("Internal server error"));
    assert!(body["error"].get("details").is_none());

    // Development keeps the specifics for debugging
    env::remove_var("ENVIRONMENT");
    let (_, body) = error_envelope(error).await;
    assert_eq!(
        body["error"]["message"],
        json!("connection refused at db:5432")
    );
    assert_eq!(body["error"]["details"]["port"], json!(5432));
}

#[tokio::test]
#[serial]
async fn test_client_errors_keep_details_in_production() {
    env::set_var("ENVIRONMENT", "production");

    let error = AppError::validation("Invalid booking request")
        .with_details(json!({ "errors": ["price must be positive"] }));
    let (status, body) = error_envelope(error).await;
    env::remove_var("ENVIRONMENT");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], json!("Invalid booking request"));
    assert_eq!(
        body["error"]["details"]["errors"][0],
        json!("price must be positive")
    );
}
