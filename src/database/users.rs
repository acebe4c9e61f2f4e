// ABOUTME: User store operations (registration, lookup, provider directory)
// ABOUTME: Providers are users whose role is academy or clinic; the booking core reads them here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole, UserStatus};

/// Database operations for user accounts
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new manager with the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already in use by another account
    /// - Database operation fails
    pub async fn create(&self, user: &User) -> AppResult<()> {
        let existing = self.get_by_email(&user.email).await?;
        if existing.is_some() {
            return Err(AppError::validation("Email already registered"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, email, password_hash, role, status,
                display_name, created_at, last_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(&user.display_name)
        .bind(user.created_at)
        .bind(user.last_active)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(())
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        self.get_by_field("id", user_id).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_by_field("email", email).await
    }

    async fn get_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            r"
            SELECT id, email, password_hash, role, status,
                   display_name, created_at, last_active
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by {field}: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Refresh a user's last-active timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_last_active(&self, user_id: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_active = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update last active: {e}")))?;
        Ok(())
    }

    /// List provider accounts (academies and clinics), optionally one role only
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_providers(&self, role: Option<UserRole>) -> AppResult<Vec<User>> {
        let rows = if let Some(role) = role {
            sqlx::query(
                r"
                SELECT id, email, password_hash, role, status,
                       display_name, created_at, last_active
                FROM users
                WHERE role = $1
                ORDER BY display_name
                ",
            )
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query(
                r"
                SELECT id, email, password_hash, role, status,
                       display_name, created_at, last_active
                FROM users
                WHERE role IN ('academy', 'clinic')
                ORDER BY display_name
                ",
            )
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| AppError::database(format!("Failed to list providers: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }
}

/// Convert a database row to a User
fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let role_str: String = row.get("role");
    let status_str: String = row.get("status");
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Invalid created_at: {e}")))?;
    let last_active: DateTime<Utc> = row
        .try_get("last_active")
        .map_err(|e| AppError::database(format!("Invalid last_active: {e}")))?;

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: UserRole::from_str_lossy(&role_str),
        status: UserStatus::from_str_lossy(&status_str),
        display_name: row.get("display_name"),
        created_at,
        last_active,
    })
}
