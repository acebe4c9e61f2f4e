// ABOUTME: Route module organization for the Fieldhouse HTTP API
// ABOUTME: One module per resource; each exposes a Routes struct merged by the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

//! Route modules
//!
//! Each domain module contains its request/response DTOs and a
//! `*Routes` struct whose `routes()` builds the axum router for that
//! resource. The server merges them all behind shared resources.

/// Registration and login
pub mod auth;
/// Booking creation, lists, transitions, cancellation
pub mod bookings;
/// Health probe
pub mod health;
/// Notification reads and acknowledgements
pub mod notifications;
/// Provider directory
pub mod providers;
/// Shared success envelope
pub mod response;

pub use auth::AuthRoutes;
pub use bookings::BookingRoutes;
pub use health::HealthRoutes;
pub use notifications::NotificationRoutes;
pub use providers::ProviderRoutes;
pub use response::ApiResponse;
