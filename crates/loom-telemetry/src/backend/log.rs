// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend that writes everything to `tracing`.

use loom_telemetry_core::{Breadcrumb, BreadcrumbLevel, CrashReport};
use tracing::{debug, error, info, warn};

use super::Backend;
use crate::error::Result;

/// Log target for forwarded breadcrumbs.
pub const BREADCRUMB_TARGET: &str = "loom_telemetry::breadcrumb";
/// Log target for crash reports.
pub const CRASH_TARGET: &str = "loom_telemetry::crash";

/// Forwards breadcrumbs as `tracing` events and logs crash reports as JSON.
///
/// Whatever subscriber the host installed decides where these end up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBackend;

impl LogBackend {
	pub fn new() -> Self {
		Self
	}
}

impl Backend for LogBackend {
	fn name(&self) -> &'static str {
		"log"
	}

	fn record(&self, breadcrumb: &Breadcrumb) {
		let category = breadcrumb.category.as_str();
		let message = breadcrumb.message_str();
		match breadcrumb.level {
			BreadcrumbLevel::Debug => debug!(target: BREADCRUMB_TARGET, category, "{message}"),
			BreadcrumbLevel::Info => info!(target: BREADCRUMB_TARGET, category, "{message}"),
			BreadcrumbLevel::Warning => warn!(target: BREADCRUMB_TARGET, category, "{message}"),
			BreadcrumbLevel::Error => error!(target: BREADCRUMB_TARGET, category, "{message}"),
		}
	}

	fn capture_crash(&self, report: &CrashReport) -> Result<()> {
		let json = serde_json::to_string(report)?;
		error!(
			target: CRASH_TARGET,
			event_id = %report.event_id,
			kind = %report.kind,
			location = report.location.as_deref().unwrap_or("unknown"),
			culprit = report
				.stacktrace
				.culprit()
				.and_then(|f| f.function.as_deref())
				.unwrap_or("unknown"),
			breadcrumbs = report.breadcrumbs.len(),
			frames = report.stacktrace.frames.len(),
			report = %json,
			"{}",
			report.message
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_telemetry_core::CrashKind;

	#[test]
	fn test_record_accepts_any_message() {
		let backend = LogBackend::new();
		backend.record(&Breadcrumb::trace(""));
		backend.record(&Breadcrumb::trace("line\nbreak\0nul"));
		backend.record(&Breadcrumb {
			level: BreadcrumbLevel::Error,
			..Breadcrumb::trace("failed")
		});
	}

	#[test]
	fn test_capture_crash_succeeds() {
		let report = CrashReport::new(CrashKind::Deliberate, "crash requested")
			.with_breadcrumbs(vec![Breadcrumb::trace("warmup")]);
		assert!(LogBackend::new().capture_crash(&report).is_ok());
	}
}
