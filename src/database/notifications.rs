// ABOUTME: Notification store operations: append, list, mark read
// ABOUTME: Rows are append-only side effects of booking changes; reads are scoped to the recipient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Notification;

/// Largest page a single list call returns
const MAX_LIST_LIMIT: u32 = 200;

/// Parameters for appending a notification
pub struct NewNotification {
    /// Recipient account
    pub user_id: String,
    /// Short headline
    pub title: String,
    /// Longer description
    pub body: String,
    /// Category tag, e.g. `booking_accepted`
    pub notification_type: String,
    /// Opaque payload (booking id, status, ...)
    pub data: Option<Value>,
    /// Account whose action produced the notification
    pub created_by: Option<String>,
}

/// Database operations for notifications
pub struct NotificationsManager {
    pool: SqlitePool,
}

impl NotificationsManager {
    /// Create a new manager with the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a notification, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, new: &NewNotification) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let data_json = new
            .data
            .as_ref()
            .map(|d| {
                serde_json::to_string(d).map_err(|e| {
                    AppError::internal(format!("Failed to serialize notification data: {e}"))
                })
            })
            .transpose()?;

        sqlx::query(
            r"
            INSERT INTO notifications (
                id, user_id, title, body, notification_type,
                read, data, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $8)
            ",
        )
        .bind(&id)
        .bind(&new.user_id)
        .bind(&new.title)
        .bind(&new.body)
        .bind(&new.notification_type)
        .bind(data_json)
        .bind(&new.created_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store notification: {e}")))?;

        Ok(id)
    }

    /// List a recipient's notifications, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: Option<u32>,
    ) -> AppResult<Vec<Notification>> {
        let limit_val = i64::from(limit.unwrap_or(50).min(MAX_LIST_LIMIT));
        let unread_filter = if unread_only { "AND read = 0" } else { "" };

        let query = format!(
            r"
            SELECT id, user_id, title, body, notification_type,
                   read, data, created_by, created_at
            FROM notifications
            WHERE user_id = $1
            {unread_filter}
            ORDER BY created_at DESC
            LIMIT $2
            "
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(limit_val)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list notifications: {e}")))?;

        rows.iter().map(row_to_notification).collect()
    }

    /// Mark one notification as read; false when absent or not the recipient's
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn mark_read(&self, notification_id: &str, user_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read = 1 WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to mark notification read: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a recipient's notifications as read, returning the count
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn mark_all_read(&self, user_id: &str) -> AppResult<u64> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE user_id = $1 AND read = 0")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to mark notifications read: {e}"))
            })?;

        Ok(result.rows_affected())
    }
}

/// Convert a database row to a Notification
fn row_to_notification(row: &SqliteRow) -> AppResult<Notification> {
    let read_int: i64 = row.get("read");
    let data_str: Option<String> = row.get("data");
    let data = data_str
        .map(|d| {
            serde_json::from_str(&d).map_err(|e| {
                AppError::database(format!("Invalid notification data payload: {e}"))
            })
        })
        .transpose()?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Invalid created_at: {e}")))?;

    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        body: row.get("body"),
        notification_type: row.get("notification_type"),
        read: read_int != 0,
        data,
        created_by: row.get("created_by"),
        created_at,
    })
}
