// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Provides protocol-agnostic bowl composition and access control services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bowlful Labs

//! Domain service layer
//!
//! This module contains protocol-agnostic business logic extracted from route
//! handlers, ensuring consistent business rules regardless of the entry point.

/// Ownership guard applied to every bowl operation
pub mod access;

/// Bowl lifecycle orchestration: composition, saving, views, and summaries
pub mod bowls;
