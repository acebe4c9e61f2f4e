// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and user creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(dead_code, clippy::missing_errors_doc, clippy::missing_panics_doc)]
//! Shared test utilities for `fieldhouse`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use fieldhouse::auth::AuthManager;
use fieldhouse::config::{Environment, ServerConfig};
use fieldhouse::database::Database;
use fieldhouse::models::{User, UserRole, UserStatus};
use fieldhouse::server::ServerResources;

static INIT_LOGGER: Once = Once::new();

/// Signing secret shared by every test token
pub const TEST_JWT_SECRET: &str = "fieldhouse_test_jwt_secret";

/// Password used by every test account
pub const TEST_PASSWORD: &str = "password123";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG raises verbosity when debugging a failing test
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(database)
}

/// Create a test authentication manager with the shared secret
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET.to_owned(), 24)
}

/// Server configuration for tests; never reads the process environment
pub fn create_test_server_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        jwt_expiry_hours: 24,
        environment: Environment::Development,
        log_level: "warn".to_owned(),
    }
}

/// Complete server resources backed by an in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let auth_manager = create_test_auth_manager();
    let config = create_test_server_config();
    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        config,
    )))
}

/// Create an active test user with a unique email and the given role
pub async fn create_test_user(database: &Database, role: UserRole) -> Result<User> {
    let email = format!("{}@example.com", Uuid::new_v4().simple());
    create_test_user_with_email(database, role, &email).await
}

/// Create an active test user with a specific email
pub async fn create_test_user_with_email(
    database: &Database,
    role: UserRole,
    email: &str,
) -> Result<User> {
    let password_hash = bcrypt::hash(TEST_PASSWORD, bcrypt::DEFAULT_COST)?;
    let now = Utc::now();

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_owned(),
        password_hash,
        role,
        status: UserStatus::Active,
        display_name: Some("Test User".to_owned()),
        created_at: now,
        last_active: now,
    };

    database.users().create(&user).await?;
    Ok(user)
}

/// Issue a bearer header value for a user
pub fn bearer_token(resources: &ServerResources, user: &User) -> Result<String> {
    let (token, _expires_at) = resources.auth_manager.generate_token(user)?;
    Ok(format!("Bearer {token}"))
}
