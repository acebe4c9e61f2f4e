// ABOUTME: Main HTTP server binary for the Fieldhouse booking service
// ABOUTME: Resolves configuration, runs migrations, and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

//! # Fieldhouse Server
//!
//! Runs the booking REST API: auth, bookings, notifications, and the
//! provider directory behind a single HTTP listener.
//!
//! ## Usage
//!
//! ```bash
//! # Start with environment defaults
//! cargo run --bin fieldhouse-server
//!
//! # Override the listen port
//! cargo run --bin fieldhouse-server -- --port 9090
//!
//! # Override the database location
//! cargo run --bin fieldhouse-server -- --database-url sqlite:./data/fieldhouse.db
//!
//! # Raise log verbosity
//! cargo run --bin fieldhouse-server -- --log-level debug
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fieldhouse::auth::AuthManager;
use fieldhouse::config::ServerConfig;
use fieldhouse::database::Database;
use fieldhouse::logging::init_logging;
use fieldhouse::server::{BookingServer, ServerResources};

#[derive(Parser)]
#[command(
    name = "fieldhouse-server",
    about = "Fieldhouse booking service REST API",
    long_about = "HTTP server for the Fieldhouse sports-services marketplace: user \
                  registration and login, booking lifecycle management, in-app \
                  notifications, and the provider directory."
)]
struct ServerArgs {
    /// Port to bind the HTTP listener (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Database connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Log filter when RUST_LOG is unset (overrides LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    init_logging(&config.log_level)?;

    info!(
        "Starting fieldhouse-server v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let database = Database::new(&config.database_url).await?;
    info!("Database ready at {}", config.database_url);

    let auth_manager = AuthManager::new(config.jwt_secret.clone(), config.jwt_expiry_hours);

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, auth_manager, config));

    BookingServer::new(resources).run(port).await?;

    Ok(())
}
