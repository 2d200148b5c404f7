// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide telemetry facade for Loom applications.
//!
//! Three operations, callable from anywhere without holding a handle:
//!
//! - [`start`]: initialize once at startup (idempotent, never fails)
//! - [`trace`] / [`trace!`]: record a breadcrumb for later correlation with
//!   crash reports (safe before `start`, never blocks on I/O)
//! - [`crash`]: deliberately abort the process to verify crash capture
//!
//! Which crash-reporting backend sits behind these is decided at `start`
//! from [`TelemetryConfig`], or supplied directly through
//! [`start_with_backend`]; call sites never name it.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     loom_telemetry::start();
//!     loom_telemetry::trace!("user {} logged in", user.id);
//!     // ...
//! }
//! ```

pub mod backend;
pub mod backtrace;
pub mod config;
pub mod error;
mod facade;
mod panic_hook;
pub mod trail;

pub use backend::{Backend, HttpBackend, LogBackend, NoopBackend};
pub use config::{BackendKind, TelemetryConfig};
pub use error::{Result, TelemetrySdkError};
pub use facade::{
	add_breadcrumb, breadcrumbs, crash, global, is_started, start, start_with, start_with_backend,
	trace, trace_at, Telemetry, DELIBERATE_CRASH_MESSAGE,
};
pub use loom_telemetry_core::{Breadcrumb, BreadcrumbLevel, CallSite, CrashKind, CrashReport};

/// Records a trace message prefixed with the calling file and line.
///
/// Accepts `format!` arguments.
///
/// ```ignore
/// loom_telemetry::trace!("user_logged_in");
/// loom_telemetry::trace!("loaded {} items", items.len());
/// ```
#[macro_export]
macro_rules! trace {
	($($arg:tt)+) => {
		$crate::trace_at(
			$crate::CallSite::new(::std::file!(), ::std::module_path!(), ::std::line!()),
			&::std::format!($($arg)+),
		)
	};
}
