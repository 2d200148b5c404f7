// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backends the facade forwards breadcrumbs and crash reports to.
//!
//! Call sites only ever talk to the facade functions; which backend sits
//! behind them is decided once, at `start`, from [`TelemetryConfig`].
//! Applications can plug in their own by implementing [`Backend`] and
//! passing it to `start_with_backend`.

mod http;
mod log;
mod noop;

use std::sync::Arc;

use loom_telemetry_core::{Breadcrumb, CrashReport};

use crate::config::{BackendKind, TelemetryConfig};
use crate::error::Result;

pub use http::HttpBackend;
pub use log::LogBackend;
pub use noop::NoopBackend;

/// A crash-reporting backend.
///
/// Implementations must be cheap to call from any thread. `record` is on
/// the hot path of every `trace` call and runs while the breadcrumb trail
/// is locked: it must not perform network or disk I/O and must not call
/// back into the facade. `capture_crash` runs once, while the process is
/// going down, and is allowed to block briefly.
pub trait Backend: Send + Sync {
	/// Short name used in logs.
	fn name(&self) -> &'static str;

	/// Forward a breadcrumb to the backend's logging channel.
	fn record(&self, breadcrumb: &Breadcrumb);

	/// Deliver a crash report.
	fn capture_crash(&self, report: &CrashReport) -> Result<()>;
}

/// Constructs the built-in backend selected by `config`.
pub fn from_config(config: &TelemetryConfig) -> Result<Arc<dyn Backend>> {
	let backend: Arc<dyn Backend> = match config.resolved_backend() {
		BackendKind::Log => Arc::new(LogBackend::new()),
		BackendKind::Http => Arc::new(HttpBackend::from_config(config)?),
		BackendKind::Disabled => Arc::new(NoopBackend),
	};
	Ok(backend)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::TelemetrySdkError;

	#[test]
	fn test_default_config_builds_log_backend() {
		let backend = from_config(&TelemetryConfig::default()).unwrap();
		assert_eq!(backend.name(), "log");
	}

	#[test]
	fn test_disabled_builds_noop_backend() {
		let config = TelemetryConfig::default().backend(BackendKind::Disabled);
		assert_eq!(from_config(&config).unwrap().name(), "none");
	}

	#[test]
	fn test_http_without_credentials_fails() {
		let config = TelemetryConfig::default().base_url("https://loom.example.com");
		let result = from_config(&config);
		assert!(matches!(result, Err(TelemetrySdkError::MissingAuthToken)));
	}
}
