// ABOUTME: Tracing subscriber setup shared by the server binary
// ABOUTME: RUST_LOG wins over the configured default filter when both are present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

use tracing_subscriber::EnvFilter;

use crate::errors::{AppError, AppResult};

/// Install the global fmt subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_logging(default_level: &str) -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))
}
