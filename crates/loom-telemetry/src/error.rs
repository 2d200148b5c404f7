// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the telemetry facade.
//!
//! None of these reach callers of `start`, `trace` or `crash`; the facade
//! logs them and carries on. They surface only from backend constructors,
//! `Backend::capture_crash` and configuration parsing.

use thiserror::Error;

/// Result type alias for telemetry SDK operations.
pub type Result<T> = std::result::Result<T, TelemetrySdkError>;

/// Errors that can occur in the telemetry SDK.
#[derive(Debug, Error)]
pub enum TelemetrySdkError {
	/// Base URL is missing or unparseable.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// Missing bearer token for the HTTP backend.
	#[error("auth token is required")]
	MissingAuthToken,

	/// Missing required project ID.
	#[error("project ID is required")]
	MissingProjectId,

	/// A configuration value could not be parsed.
	#[error("invalid value for {key}: {value:?}")]
	InvalidConfig {
		/// Environment variable or setting name.
		key: &'static str,
		/// The rejected value.
		value: String,
	},

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error.
	#[error("server error (status {status}): {message}")]
	ServerError {
		/// HTTP status code.
		status: u16,
		/// Error message from server.
		message: String,
	},

	/// Failed to serialize a report.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),

	/// The thread delivering a crash report could not be spawned or panicked.
	#[error("crash reporter thread failed")]
	ReporterThread,
}
