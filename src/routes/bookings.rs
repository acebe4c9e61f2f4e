// ABOUTME: Route handlers for the bookings REST API (create, list, inspect, transition, cancel)
// ABOUTME: Owns request validation, party authorization, and the status state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

//! Booking routes
//!
//! All endpoints require JWT authentication. Single-booking reads and
//! mutations are restricted to the two parties; status transitions are
//! provider-only and follow the fixed table on `BookingStatus`.

use std::sync::Arc;
use std::sync::OnceLock;

use crate::{
    auth::bearer_header,
    database::bookings::{BookingFilters, NewBooking},
    errors::{AppError, AppResult},
    models::{Booking, BookingStatus, BookingType, User},
    notify::notify_booking_change,
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::ApiResponse;

/// Request body for creating a booking
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    /// Account providing the service
    pub provider_id: String,
    /// One of `academy`, `clinic`; must match the provider's role
    pub booking_type: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Agreed amount, must be positive
    pub price: f64,
    /// Optional sub-offering reference
    pub service_id: Option<String>,
    /// Optional program reference
    pub program_id: Option<String>,
    /// Optional time of day; a timed booking claims its slot
    pub time: Option<String>,
    /// Optional free text
    pub notes: Option<String>,
}

/// Query parameters for the requester's booking list
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// Only bookings in this status
    pub status: Option<String>,
    /// Only bookings of this type
    #[serde(rename = "type")]
    pub booking_type: Option<String>,
}

/// Query parameters for the provider's booking list
#[derive(Debug, Deserialize)]
pub struct ProviderBookingsQuery {
    /// Only bookings in this status
    pub status: Option<String>,
}

/// Request body for a provider status update
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    /// Target status; one of `accepted`, `rejected`, `completed`
    pub status: String,
}

/// Booking route handlers
pub struct BookingRoutes;

impl BookingRoutes {
    /// Create booking routes with shared resources
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/bookings", post(Self::handle_create))
            .route("/api/bookings", get(Self::handle_list_for_requester))
            .route(
                "/api/bookings/provider",
                get(Self::handle_list_for_provider),
            )
            .route("/api/bookings/:id", get(Self::handle_get))
            .route("/api/bookings/:id/status", put(Self::handle_update_status))
            .route("/api/bookings/:id/cancel", put(Self::handle_cancel))
            .with_state(resources)
    }

    /// Extract and authenticate the caller from the authorization header
    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<User, AppError> {
        resources
            .auth_manager
            .authenticate_request(bearer_header(headers), &resources.database)
            .await
    }

    /// Handle POST /api/bookings - Create a booking against a provider
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateBookingBody>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        Self::validate_create_body(&body)?;
        let booking_type = BookingType::parse(&body.booking_type)?;

        let provider = resources
            .database
            .users()
            .get_by_id(&body.provider_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Provider {}", body.provider_id)))?;

        if provider.role != booking_type.required_role() {
            return Err(AppError::validation(format!(
                "Provider must be of type {}",
                booking_type.as_str()
            )));
        }

        let booking = resources
            .database
            .bookings()
            .create(&NewBooking {
                user_id: caller.id.clone(),
                provider_id: body.provider_id,
                booking_type,
                service_id: body.service_id,
                program_id: body.program_id,
                date: body.date,
                time: body.time,
                price: body.price,
                notes: body.notes,
            })
            .await?;

        info!(
            booking_id = %booking.id,
            provider_id = %booking.provider_id,
            "Booking created"
        );

        notify_booking_change(&resources.database, &booking, &booking.provider_id, &caller.id);

        Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))).into_response())
    }

    /// Handle GET /api/bookings - List the caller's requested bookings
    async fn handle_list_for_requester(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListBookingsQuery>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let filters = BookingFilters {
            status: query.status.as_deref().map(BookingStatus::parse).transpose()?,
            booking_type: query
                .booking_type
                .as_deref()
                .map(BookingType::parse)
                .transpose()?,
        };

        let bookings = resources
            .database
            .bookings()
            .list_for_requester(&caller.id, filters)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::ok(bookings))).into_response())
    }

    /// Handle GET /api/bookings/provider - List bookings addressed to the caller
    async fn handle_list_for_provider(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ProviderBookingsQuery>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let filters = BookingFilters {
            status: query.status.as_deref().map(BookingStatus::parse).transpose()?,
            booking_type: None,
        };

        let bookings = resources
            .database
            .bookings()
            .list_for_provider(&caller.id, filters)
            .await?;

        Ok((StatusCode::OK, Json(ApiResponse::ok(bookings))).into_response())
    }

    /// Handle GET /api/bookings/:id - Fetch one booking, parties only
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let booking = resources
            .database
            .bookings()
            .get_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

        if !booking.involves(&caller.id) {
            return Err(AppError::forbidden(
                "Only the requester or the provider can view this booking",
            ));
        }

        Ok((StatusCode::OK, Json(ApiResponse::ok(booking))).into_response())
    }

    /// Handle PUT /api/bookings/:id/status - Provider moves the booking along
    async fn handle_update_status(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<UpdateStatusBody>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;
        let new_status = BookingStatus::parse(&body.status)?;

        let manager = resources.database.bookings();
        let booking = manager
            .get_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

        if booking.provider_id != caller.id {
            return Err(AppError::forbidden(
                "Only the provider can update the booking status",
            ));
        }

        Self::validate_transition(booking.status, new_status)?;

        let updated = manager
            .update_status_guarded(&id, booking.status, new_status)
            .await?;
        if !updated {
            // Lost a race: the status moved underneath us, re-validate
            // against the fresh row so the caller sees the real state
            let fresh = manager
                .get_by_id(&id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;
            Self::validate_transition(fresh.status, new_status)?;
            return Err(AppError::conflict("Booking was modified concurrently"));
        }

        let booking = manager
            .get_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

        info!(
            booking_id = %booking.id,
            status = booking.status.as_str(),
            "Booking status changed"
        );

        notify_booking_change(&resources.database, &booking, &booking.user_id, &caller.id);

        Ok((StatusCode::OK, Json(ApiResponse::ok(booking))).into_response())
    }

    /// Handle PUT /api/bookings/:id/cancel - Either party withdraws the booking
    async fn handle_cancel(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let caller = Self::authenticate(&headers, &resources).await?;

        let manager = resources.database.bookings();
        let booking = manager
            .get_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

        if !booking.involves(&caller.id) {
            return Err(AppError::forbidden(
                "Only the requester or the provider can cancel this booking",
            ));
        }

        if booking.status.is_terminal() {
            return Err(AppError::validation(
                "Cannot update cancelled or completed booking",
            ));
        }

        let cancelled = manager.cancel(&id).await?;
        if !cancelled {
            // The booking reached a terminal state while we looked at it
            return Err(AppError::validation(
                "Cannot update cancelled or completed booking",
            ));
        }

        let booking = manager
            .get_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

        info!(booking_id = %booking.id, cancelled_by = %caller.id, "Booking cancelled");

        // Cancellation notifies the other party
        let recipient = if booking.user_id == caller.id {
            booking.provider_id.clone()
        } else {
            booking.user_id.clone()
        };
        notify_booking_change(&resources.database, &booking, &recipient, &caller.id);

        Ok((StatusCode::OK, Json(ApiResponse::ok(booking))).into_response())
    }

    /// Collect field-level problems with a creation request
    fn validate_create_body(body: &CreateBookingBody) -> AppResult<()> {
        let mut problems = Vec::new();

        if body.provider_id.trim().is_empty() {
            problems.push("providerId must not be empty");
        }
        if BookingType::parse(&body.booking_type).is_err() {
            problems.push("bookingType must be academy or clinic");
        }
        if !is_valid_date(&body.date) {
            problems.push("date must match YYYY-MM-DD");
        }
        if body.price <= 0.0 {
            problems.push("price must be positive");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation("Invalid booking request")
                .with_details(json!({ "errors": problems })))
        }
    }

    /// Enforce the provider transition table
    fn validate_transition(current: BookingStatus, next: BookingStatus) -> AppResult<()> {
        if current.is_terminal() {
            return Err(AppError::validation(
                "Cannot update cancelled or completed booking",
            ));
        }
        if !current.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "Cannot change booking status from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }
        Ok(())
    }
}

/// Check a date string against `YYYY-MM-DD`
fn is_valid_date(date: &str) -> bool {
    fn date_pattern() -> Option<&'static Regex> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        PATTERN
            .get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok())
            .as_ref()
    }

    date_pattern().is_some_and(|p| p.is_match(date))
}
