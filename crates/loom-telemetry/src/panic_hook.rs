// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic hook that turns panics into crash reports.

use std::any::Any;
use std::panic;

use loom_telemetry_core::CrashKind;
use tracing::debug;

use crate::facade::Telemetry;

/// Installs a hook that reports every panic through `telemetry`, then runs
/// whatever hook was installed before (normally the default one that prints
/// the panic message).
pub(crate) fn install(telemetry: &'static Telemetry) {
	let previous = panic::take_hook();
	panic::set_hook(Box::new(move |info| {
		let mut report = telemetry.crash_report(CrashKind::Panic, payload_message(info.payload()));
		if let Some(location) = info.location() {
			report = report.with_location(format!(
				"{}:{}:{}",
				location.file(),
				location.line(),
				location.column()
			));
		}
		telemetry.report(&report);
		previous(info);
	}));
	debug!("Panic hook installed");
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}
