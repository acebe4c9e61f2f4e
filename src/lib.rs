// ABOUTME: Main library entry point for the Fieldhouse booking API
// ABOUTME: REST backend for a sports-services marketplace connecting requesters with providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

#![deny(unsafe_code)]

//! # Fieldhouse
//!
//! Booking backend for a sports-services marketplace. Players, parents,
//! and agents request sessions from academies and clinics; providers
//! accept, reject, or complete them; either party can cancel. Every
//! state change fans out an in-app notification on a best-effort basis.
//!
//! ## Architecture
//!
//! - **Models**: Domain types and the booking status state machine
//! - **Database**: `SQLite` via `sqlx` with per-entity managers
//! - **Routes**: One axum router per resource, merged by the server
//! - **Auth**: bcrypt credentials exchanged for HS256 bearer tokens
//!
//! Slot conflicts and status transitions are enforced with
//! conditional writes, so concurrent requests cannot double-book a
//! provider or resurrect a terminal booking.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fieldhouse::config::ServerConfig;
//! use fieldhouse::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Fieldhouse configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Token issuance, validation, and request authentication
pub mod auth;

/// Configuration management from environment variables
pub mod config;

/// `SQLite` pool, migrations, and store managers
pub mod database;

/// Unified error handling with stable wire codes and HTTP responses
pub mod errors;

/// Tracing subscriber setup
pub mod logging;

/// Domain types for users, bookings, and notifications
pub mod models;

/// Fire-and-forget notification dispatch
pub mod notify;

/// `HTTP` routes organized by resource
pub mod routes;

/// Shared resources and axum server assembly
pub mod server;
