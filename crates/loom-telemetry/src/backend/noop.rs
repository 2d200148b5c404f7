// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use loom_telemetry_core::{Breadcrumb, CrashReport};

use super::Backend;
use crate::error::Result;

/// Backend that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackend;

impl Backend for NoopBackend {
	fn name(&self) -> &'static str {
		"none"
	}

	fn record(&self, _breadcrumb: &Breadcrumb) {}

	fn capture_crash(&self, _report: &CrashReport) -> Result<()> {
		Ok(())
	}
}
