// ABOUTME: Booking store operations: conflict-guarded creation, lookups, guarded status writes
// ABOUTME: Slot conflicts and status transitions are enforced inside single SQL statements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingStatus, BookingType};

/// Parameters for inserting a booking; status and timestamps are assigned here
pub struct NewBooking {
    /// Requesting account
    pub user_id: String,
    /// Providing account
    pub provider_id: String,
    /// Kind of provider booked
    pub booking_type: BookingType,
    /// Optional sub-offering reference
    pub service_id: Option<String>,
    /// Optional program reference
    pub program_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Optional time of day; a timed booking claims its slot
    pub time: Option<String>,
    /// Agreed amount
    pub price: f64,
    /// Optional free text
    pub notes: Option<String>,
}

/// Optional equality filters for booking lists
#[derive(Debug, Default, Clone, Copy)]
pub struct BookingFilters {
    /// Only bookings in this status
    pub status: Option<BookingStatus>,
    /// Only bookings of this type
    pub booking_type: Option<BookingType>,
}

/// Database operations for bookings
pub struct BookingsManager {
    pool: SqlitePool,
}

impl BookingsManager {
    /// Create a new manager with the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new booking in `requested` status
    ///
    /// When the booking carries a time, the insert only happens if no
    /// `requested`/`accepted` booking already occupies the same
    /// `(provider_id, date, time)` slot. The probe and the insert are a
    /// single statement, so two concurrent creators cannot both claim
    /// the slot.
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the slot is taken, or a database
    /// error if the operation fails
    pub async fn create(&self, new: &NewBooking) -> AppResult<Booking> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let result = if let Some(time) = &new.time {
            sqlx::query(
                r"
                INSERT INTO bookings (
                    id, user_id, provider_id, booking_type, service_id, program_id,
                    date, time, status, price, notes, created_at, updated_at
                )
                SELECT $1, $2, $3, $4, $5, $6, $7, $8, 'requested', $9, $10, $11, $11
                WHERE NOT EXISTS (
                    SELECT 1 FROM bookings
                    WHERE provider_id = $3 AND date = $7 AND time = $8
                      AND status IN ('requested', 'accepted')
                )
                ",
            )
            .bind(&id)
            .bind(&new.user_id)
            .bind(&new.provider_id)
            .bind(new.booking_type.as_str())
            .bind(&new.service_id)
            .bind(&new.program_id)
            .bind(&new.date)
            .bind(time)
            .bind(new.price)
            .bind(&new.notes)
            .bind(now)
            .execute(&self.pool)
            .await
        } else {
            // Untimed bookings never participate in slot conflicts
            sqlx::query(
                r"
                INSERT INTO bookings (
                    id, user_id, provider_id, booking_type, service_id, program_id,
                    date, time, status, price, notes, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, 'requested', $8, $9, $10, $10)
                ",
            )
            .bind(&id)
            .bind(&new.user_id)
            .bind(&new.provider_id)
            .bind(new.booking_type.as_str())
            .bind(&new.service_id)
            .bind(&new.program_id)
            .bind(&new.date)
            .bind(new.price)
            .bind(&new.notes)
            .bind(now)
            .execute(&self.pool)
            .await
        }
        .map_err(|e| AppError::database(format!("Failed to create booking: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "This time slot is already booked for the provider",
            ));
        }

        Ok(Booking {
            id,
            user_id: new.user_id.clone(),
            provider_id: new.provider_id.clone(),
            booking_type: new.booking_type,
            service_id: new.service_id.clone(),
            program_id: new.program_id.clone(),
            date: new.date.clone(),
            time: new.time.clone(),
            status: BookingStatus::Requested,
            price: new.price,
            notes: new.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a booking by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_id(&self, booking_id: &str) -> AppResult<Option<Booking>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, provider_id, booking_type, service_id, program_id,
                   date, time, status, price, notes, created_at, updated_at
            FROM bookings WHERE id = $1
            ",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get booking: {e}")))?;

        row.as_ref().map(row_to_booking).transpose()
    }

    /// List bookings created by a requester, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_for_requester(
        &self,
        user_id: &str,
        filters: BookingFilters,
    ) -> AppResult<Vec<Booking>> {
        self.list_by_party("user_id", user_id, filters).await
    }

    /// List bookings addressed to a provider, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_for_provider(
        &self,
        provider_id: &str,
        filters: BookingFilters,
    ) -> AppResult<Vec<Booking>> {
        self.list_by_party("provider_id", provider_id, filters).await
    }

    async fn list_by_party(
        &self,
        party_column: &str,
        party_id: &str,
        filters: BookingFilters,
    ) -> AppResult<Vec<Booking>> {
        // Filter fragments come from closed enums, never raw input
        let status_filter = filters
            .status
            .map(|s| format!("AND status = '{}'", s.as_str()))
            .unwrap_or_default();
        let type_filter = filters
            .booking_type
            .map(|t| format!("AND booking_type = '{}'", t.as_str()))
            .unwrap_or_default();

        let query = format!(
            r"
            SELECT id, user_id, provider_id, booking_type, service_id, program_id,
                   date, time, status, price, notes, created_at, updated_at
            FROM bookings
            WHERE {party_column} = $1
            {status_filter}
            {type_filter}
            ORDER BY created_at DESC
            "
        );

        let rows = sqlx::query(&query)
            .bind(party_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list bookings: {e}")))?;

        rows.iter().map(row_to_booking).collect()
    }

    /// Move a booking from `from` to `to` only if it is still in `from`
    ///
    /// Compare-and-set write: returns `false` when the row no longer
    /// holds the observed status (or does not exist), in which case the
    /// caller re-reads and re-validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_status_guarded(
        &self,
        booking_id: &str,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE bookings
            SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            ",
        )
        .bind(to.as_str())
        .bind(Utc::now())
        .bind(booking_id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update booking status: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Cancel a booking unless it already reached a terminal state
    ///
    /// The terminal guard lives inside the statement, so a concurrent
    /// completion cannot be overwritten. Returns `false` when the row
    /// is absent or terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn cancel(&self, booking_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE bookings
            SET status = 'cancelled', updated_at = $1
            WHERE id = $2 AND status NOT IN ('cancelled', 'completed')
            ",
        )
        .bind(Utc::now())
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to cancel booking: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a Booking
fn row_to_booking(row: &SqliteRow) -> AppResult<Booking> {
    let booking_type_str: String = row.get("booking_type");
    let status_str: String = row.get("status");

    let booking_type = BookingType::parse(&booking_type_str)
        .map_err(|_| AppError::database(format!("Unknown booking type: {booking_type_str}")))?;
    let status = BookingStatus::parse(&status_str)
        .map_err(|_| AppError::database(format!("Unknown booking status: {status_str}")))?;

    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Invalid created_at: {e}")))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| AppError::database(format!("Invalid updated_at: {e}")))?;

    Ok(Booking {
        id: row.get("id"),
        user_id: row.get("user_id"),
        provider_id: row.get("provider_id"),
        booking_type,
        service_id: row.get("service_id"),
        program_id: row.get("program_id"),
        date: row.get("date"),
        time: row.get("time"),
        status,
        price: row.get("price"),
        notes: row.get("notes"),
        created_at,
        updated_at,
    })
}
