// ABOUTME: SQLite connection pool, embedded migrations, and per-entity manager access
// ABOUTME: All durable state (users, bookings, notifications) lives behind this module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

pub mod bookings;
pub mod notifications;
pub mod users;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;

use crate::errors::{AppError, AppResult};

pub use bookings::BookingsManager;
pub use notifications::NotificationsManager;
pub use users::UsersManager;

/// Database connection pool shared across the server
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run pending migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - `SQLite` file creation fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let pool = if database_url.contains(":memory:") {
            // A pooled in-memory database is one database per connection;
            // pin a single long-lived connection so every query sees the
            // same data
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            let connection_options = if database_url.starts_with("sqlite:") {
                format!("{database_url}?mode=rwc")
            } else {
                database_url.to_owned()
            };
            SqlitePool::connect(&connection_options).await
        }
        .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Run all pending migrations embedded at compile time from ./migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// User store operations
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Booking store operations
    #[must_use]
    pub fn bookings(&self) -> BookingsManager {
        BookingsManager::new(self.pool.clone())
    }

    /// Notification store operations
    #[must_use]
    pub fn notifications(&self) -> NotificationsManager {
        NotificationsManager::new(self.pool.clone())
    }

    /// Cheap liveness probe used by the health endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot serve a trivial query
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Health check failed: {e}")))?;
        Ok(())
    }
}
