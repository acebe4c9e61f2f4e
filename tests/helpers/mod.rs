// ABOUTME: Helper modules shared across integration tests
// ABOUTME: Currently houses the axum request/response test harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fieldhouse
#![allow(dead_code)]

pub mod axum_test;
