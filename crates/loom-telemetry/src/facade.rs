// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide telemetry state and the `start` / `trace` / `crash` facade.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, TryLockError};

use loom_telemetry_core::{Breadcrumb, CallSite, CrashKind, CrashReport};
use tracing::{error, info, warn};

use crate::backend::{self, Backend, LogBackend};
use crate::backtrace::capture_backtrace;
use crate::config::{TelemetryConfig, DEFAULT_MAX_BREADCRUMBS};
use crate::error::Result;
use crate::panic_hook;
use crate::trail::BreadcrumbTrail;

/// Message attached to reports produced by [`crash`].
pub const DELIBERATE_CRASH_MESSAGE: &str = "deliberate crash requested";

static GLOBAL: Telemetry = Telemetry::new();

/// Telemetry state: a once-initialized backend plus the breadcrumb trail.
///
/// The free functions in this crate operate on a single static instance.
/// Separate instances exist for tests; they must be `'static` because the
/// panic hook keeps a reference for the rest of the process.
pub struct Telemetry {
	installed: OnceLock<Installed>,
	trail: Mutex<BreadcrumbTrail>,
}

struct Installed {
	backend: Arc<dyn Backend>,
	release: Option<String>,
	environment: String,
}

impl Telemetry {
	pub const fn new() -> Self {
		Self {
			installed: OnceLock::new(),
			trail: Mutex::new(BreadcrumbTrail::new(DEFAULT_MAX_BREADCRUMBS)),
		}
	}

	/// Starts with the built-in backend selected by `config`.
	///
	/// Returns `true` only for the call that performed the initialization.
	pub fn start_with(&'static self, config: TelemetryConfig) -> bool {
		self.start_with_factory(config, backend::from_config)
	}

	/// Starts with the backend produced by `factory`.
	///
	/// `factory` runs at most once per instance, even when several threads
	/// race on the first call. If it fails the error is logged and the log
	/// backend is used instead. `factory` must not call back into `start`.
	pub fn start_with_factory<F>(&'static self, config: TelemetryConfig, factory: F) -> bool
	where
		F: FnOnce(&TelemetryConfig) -> Result<Arc<dyn Backend>>,
	{
		let mut initialized = false;
		// Held from the replay until `installed` is published, so a concurrent
		// `add_breadcrumb` either lands in the replay or sees the backend.
		let mut trail_guard = None;
		self.installed.get_or_init(|| {
			initialized = true;
			let backend = build_backend(&config, factory);
			let mut trail = self.lock_trail();
			let installed = self.install(&mut trail, config, backend);
			trail_guard = Some(trail);
			installed
		});
		drop(trail_guard);
		initialized
	}

	fn install(
		&'static self,
		trail: &mut BreadcrumbTrail,
		config: TelemetryConfig,
		backend: Arc<dyn Backend>,
	) -> Installed {
		// Replay whatever was traced before start
		trail.set_capacity(config.max_breadcrumbs);
		for breadcrumb in trail.iter() {
			backend.record(breadcrumb);
		}

		if config.install_panic_hook {
			panic_hook::install(self);
		}

		info!(
			backend = backend.name(),
			environment = %config.environment,
			release = config.release.as_deref().unwrap_or("unknown"),
			replayed = trail.len(),
			"Telemetry started"
		);

		Installed {
			backend,
			release: config.release,
			environment: config.environment,
		}
	}

	pub fn is_started(&self) -> bool {
		self.installed.get().is_some()
	}

	/// Name of the active backend, if started.
	pub fn backend_name(&self) -> Option<&'static str> {
		self.installed.get().map(|i| i.backend.name())
	}

	/// Records a trace breadcrumb.
	pub fn trace(&self, message: &str) {
		self.add_breadcrumb(Breadcrumb::trace(message));
	}

	/// Records a trace breadcrumb prefixed with its call site.
	pub fn trace_at(&self, site: CallSite, message: &str) {
		self.add_breadcrumb(Breadcrumb::trace_at(&site, message));
	}

	/// Adds a breadcrumb to the trail and forwards it to the backend.
	///
	/// Before `start` the breadcrumb is only buffered; `start` replays it.
	pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
		let mut trail = self.lock_trail();
		if let Some(installed) = self.installed.get() {
			installed.backend.record(&breadcrumb);
		}
		trail.push(breadcrumb);
	}

	/// Copies the current trail, oldest first.
	pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
		self.lock_trail().snapshot()
	}

	/// Assembles a crash report from the current state.
	///
	/// Never blocks on the trail: if it is locked (a panic raised while it
	/// was held) the report goes out without breadcrumbs.
	pub fn crash_report(&self, kind: CrashKind, message: impl Into<String>) -> CrashReport {
		let breadcrumbs = match self.trail.try_lock() {
			Ok(trail) => trail.snapshot(),
			Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().snapshot(),
			Err(TryLockError::WouldBlock) => Vec::new(),
		};

		let report = CrashReport::new(kind, message)
			.with_thread(std::thread::current().name().map(str::to_string))
			.with_stacktrace(capture_backtrace())
			.with_breadcrumbs(breadcrumbs);

		match self.installed.get() {
			Some(installed) => {
				report.with_release(installed.release.clone(), Some(installed.environment.clone()))
			}
			None => report,
		}
	}

	/// Hands a crash report to the backend. Failures are logged.
	pub fn report(&self, report: &CrashReport) {
		match self.installed.get() {
			Some(installed) => {
				if let Err(e) = installed.backend.capture_crash(report) {
					error!(
						error = %e,
						backend = installed.backend.name(),
						event_id = %report.event_id,
						"Failed to deliver crash report"
					);
				}
			}
			None => warn!(
				event_id = %report.event_id,
				kind = %report.kind,
				breadcrumbs = report.breadcrumbs.len(),
				"Crash captured before telemetry started: {}",
				report.message
			),
		}
	}

	/// Reports a deliberate crash and aborts the process.
	pub fn crash(&self) -> ! {
		let report = self.crash_report(CrashKind::Deliberate, DELIBERATE_CRASH_MESSAGE);
		self.report(&report);
		error!(event_id = %report.event_id, "Aborting process on request");
		std::process::abort()
	}

	fn lock_trail(&self) -> MutexGuard<'_, BreadcrumbTrail> {
		self.trail.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

fn build_backend<F>(config: &TelemetryConfig, factory: F) -> Arc<dyn Backend>
where
	F: FnOnce(&TelemetryConfig) -> Result<Arc<dyn Backend>>,
{
	match factory(config) {
		Ok(backend) => backend,
		Err(e) => {
			error!(
				error = %e,
				backend = %config.resolved_backend(),
				"Telemetry backend failed to start, falling back to log backend"
			);
			Arc::new(LogBackend::new())
		}
	}
}

impl Default for Telemetry {
	fn default() -> Self {
		Self::new()
	}
}

/// The process-wide instance behind the free functions.
pub fn global() -> &'static Telemetry {
	&GLOBAL
}

/// Initializes telemetry from `LOOM_TELEMETRY_*` environment variables.
///
/// Call once during application startup. Further calls do nothing.
/// Configuration and backend errors are logged, never returned.
pub fn start() {
	if GLOBAL.is_started() {
		return;
	}

	let config = TelemetryConfig::from_env().unwrap_or_else(|e| {
		warn!(error = %e, "Invalid telemetry configuration, using defaults");
		TelemetryConfig::default()
	});
	GLOBAL.start_with(config);
}

/// Initializes telemetry with an explicit configuration.
///
/// Returns `true` if this call performed the initialization.
pub fn start_with(config: TelemetryConfig) -> bool {
	GLOBAL.start_with(config)
}

/// Initializes telemetry with a caller-supplied backend.
///
/// Returns `true` if this call performed the initialization; otherwise
/// `backend` is dropped and the existing one stays in place.
pub fn start_with_backend(config: TelemetryConfig, backend: Arc<dyn Backend>) -> bool {
	GLOBAL.start_with_factory(config, move |_| Ok(backend))
}

/// Records a trace message for correlation with later crash reports.
///
/// Safe before [`start`] and from any thread. Prefer the [`trace!`](crate::trace!)
/// macro, which also records where the message came from.
pub fn trace(message: &str) {
	GLOBAL.trace(message);
}

/// Records a trace message tagged with its call site. Used by `trace!`.
pub fn trace_at(site: CallSite, message: &str) {
	GLOBAL.trace_at(site, message);
}

/// Adds an arbitrary breadcrumb to the process-wide trail.
pub fn add_breadcrumb(breadcrumb: Breadcrumb) {
	GLOBAL.add_breadcrumb(breadcrumb);
}

/// Deliberately crashes the process so the crash-capture path can be
/// verified. Never returns.
pub fn crash() -> ! {
	GLOBAL.crash()
}

pub fn is_started() -> bool {
	GLOBAL.is_started()
}

/// Snapshot of the process-wide trail.
pub fn breadcrumbs() -> Vec<Breadcrumb> {
	GLOBAL.breadcrumbs()
}
