// ABOUTME: Integration tests for the provider directory endpoints
// ABOUTME: Covers listing, type filtering, single lookup, and field exposure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{bearer_token, create_test_server_resources, create_test_user};
use fieldhouse::models::UserRole;
use fieldhouse::routes::providers::ProviderRoutes;
use fieldhouse::server::ServerResources;
use helpers::axum_test::AxumTestRequest;

// ============================================================================
// Test Helpers
// ============================================================================

async fn setup_test_environment() -> (axum::Router, Arc<ServerResources>, String) {
    let resources = create_test_server_resources().await.unwrap();
    let viewer = create_test_user(&resources.database, UserRole::Player)
        .await
        .unwrap();
    let auth = bearer_token(&resources, &viewer).unwrap();
    let router = ProviderRoutes::routes(Arc::clone(&resources));
    (router, resources, auth)
}

async fn rename_user(resources: &Arc<ServerResources>, user_id: &str, display_name: &str) {
    sqlx::query("UPDATE users SET display_name = $1 WHERE id = $2")
        .bind(display_name)
        .bind(user_id)
        .execute(resources.database.pool())
        .await
        .unwrap();
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_providers_returns_bookable_accounts() {
    let (router, resources, auth) = setup_test_environment().await;
    let academy = create_test_user(&resources.database, UserRole::Academy)
        .await
        .unwrap();
    let clinic = create_test_user(&resources.database, UserRole::Clinic)
        .await
        .unwrap();

    let response = AxumTestRequest::get("/api/providers")
        .header("authorization", &auth)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));

    let providers = body["data"].as_array().unwrap();
    assert_eq!(providers.len(), 2);

    let ids: Vec<&str> = providers
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&academy.id.as_str()));
    assert!(ids.contains(&clinic.id.as_str()));
    // The authenticated player is not bookable and stays out of the list
}

#[tokio::test]
async fn test_list_providers_ordered_by_display_name() {
    let (router, resources, auth) = setup_test_environment().await;
    let first = create_test_user(&resources.database, UserRole::Academy)
        .await
        .unwrap();
    let second = create_test_user(&resources.database, UserRole::Academy)
        .await
        .unwrap();
    rename_user(&resources, &first.id, "Zenith Academy").await;
    rename_user(&resources, &second.id, "Apex Academy").await;

    let response = AxumTestRequest::get("/api/providers")
        .header("authorization", &auth)
        .send(router)
        .await;

    let body: Value = response.json();
    let providers = body["data"].as_array().unwrap();
    assert_eq!(providers[0]["displayName"], json!("Apex Academy"));
    assert_eq!(providers[1]["displayName"], json!("Zenith Academy"));
}

#[tokio::test]
async fn test_list_providers_type_filter() {
    let (router, resources, auth) = setup_test_environment().await;
    let academy = create_test_user(&resources.database, UserRole::Academy)
        .await
        .unwrap();
    create_test_user(&resources.database, UserRole::Clinic)
        .await
        .unwrap();

    let response = AxumTestRequest::get("/api/providers?type=academy")
        .header("authorization", &auth)
        .send(router)
        .await;

    let body: Value = response.json();
    let providers = body["data"].as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["id"].as_str().unwrap(), academy.id);
    assert_eq!(providers[0]["role"], json!("academy"));
}

#[tokio::test]
async fn test_list_providers_unknown_type_rejected() {
    let (router, _resources, auth) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/providers?type=gym")
        .header("authorization", &auth)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["message"], json!("Invalid booking type: gym"));
}

#[tokio::test]
async fn test_list_providers_requires_authentication() {
    let (router, _resources, _auth) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/providers").send(router).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
}

// ============================================================================
// Single lookup
// ============================================================================

#[tokio::test]
async fn test_get_provider_summary() {
    let (router, resources, auth) = setup_test_environment().await;
    let clinic = create_test_user(&resources.database, UserRole::Clinic)
        .await
        .unwrap();

    let response = AxumTestRequest::get(&format!("/api/providers/{}", clinic.id))
        .header("authorization", &auth)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["data"]["id"].as_str().unwrap(), clinic.id);
    assert_eq!(body["data"]["displayName"], json!("Test User"));
    assert_eq!(body["data"]["role"], json!("clinic"));
}

#[tokio::test]
async fn test_provider_summary_hides_account_details() {
    let (router, resources, auth) = setup_test_environment().await;
    let academy = create_test_user(&resources.database, UserRole::Academy)
        .await
        .unwrap();

    let response = AxumTestRequest::get(&format!("/api/providers/{}", academy.id))
        .header("authorization", &auth)
        .send(router)
        .await;

    let body: Value = response.json();
    let summary = body["data"].as_object().unwrap();
    assert!(!summary.contains_key("email"));
    assert!(!summary.contains_key("passwordHash"));
    assert!(!summary.contains_key("status"));
}

#[tokio::test]
async fn test_get_non_provider_account_not_found() {
    let (router, resources, auth) = setup_test_environment().await;
    let player = create_test_user(&resources.database, UserRole::Player)
        .await
        .unwrap();

    // Player accounts exist but are not part of the directory
    let response = AxumTestRequest::get(&format!("/api/providers/{}", player.id))
        .header("authorization", &auth)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
    assert_eq!(
        body["error"]["message"].as_str().unwrap(),
        format!("Provider {}", player.id)
    );
}

#[tokio::test]
async fn test_get_absent_provider_not_found() {
    let (router, _resources, auth) = setup_test_environment().await;

    let response = AxumTestRequest::get("/api/providers/no-such-provider")
        .header("authorization", &auth)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
