// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for parsing telemetry core types.

use thiserror::Error;

/// Errors that can occur when parsing telemetry values.
#[derive(Debug, Error)]
pub enum TelemetryError {
	#[error("invalid breadcrumb level: {0}")]
	InvalidBreadcrumbLevel(String),
}

/// Result type for telemetry core operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
