// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace capture and parsing for crash reports.

use loom_telemetry_core::{Frame, Stacktrace};
use rustc_demangle::demangle;
use std::backtrace::Backtrace;

/// Capture a fresh backtrace and parse it.
pub fn capture_backtrace() -> Stacktrace {
	let backtrace = Backtrace::force_capture();
	parse_backtrace(&backtrace)
}

/// Parse a Rust backtrace into a Stacktrace.
pub fn parse_backtrace(backtrace: &Backtrace) -> Stacktrace {
	let frames = parse_backtrace_string(&backtrace.to_string());
	Stacktrace { frames }
}

/// Parse backtrace text into frames.
///
/// The expected layout is the one `std::backtrace::Backtrace` prints:
///
/// ```text
///    3: my_app::handlers::login
///              at ./src/handlers.rs:42:9
/// ```
fn parse_backtrace_string(bt_string: &str) -> Vec<Frame> {
	let mut frames: Vec<Frame> = Vec::new();

	for line in bt_string.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some(frame) = frames.last_mut() {
				apply_location(frame, location);
			}
			continue;
		}

		if let Some(frame) = parse_frame_line(line) {
			frames.push(frame);
		}
	}

	frames
}

/// Parse a single symbol line (`N: symbol` or a bare symbol) into a Frame.
fn parse_frame_line(line: &str) -> Option<Frame> {
	let line = line.trim();

	let function_part = match line.split_once(':') {
		Some((prefix, rest)) if prefix.trim().parse::<u32>().is_ok() => rest.trim(),
		_ => line,
	};

	if function_part.is_empty() {
		return None;
	}

	let demangled = demangle(function_part).to_string();

	// e.g., "my_app::handlers::login" -> "my_app::handlers"
	let module = demangled.rfind("::").map(|idx| demangled[..idx].to_string());
	let in_app = is_in_app_frame(&demangled);

	Some(Frame {
		function: Some(demangled),
		module,
		in_app,
		..Default::default()
	})
}

/// Fill file/line/column from an `at path:line:col` suffix.
fn apply_location(frame: &mut Frame, location: &str) {
	let mut parts = location.rsplitn(3, ':');
	let last = parts.next();
	let middle = parts.next();
	let rest = parts.next();

	match (rest, middle, last) {
		(Some(path), Some(line), Some(col)) if line.parse::<u32>().is_ok() => {
			frame.filename = Some(path.to_string());
			frame.lineno = line.parse().ok();
			frame.colno = col.parse().ok();
		}
		(_, Some(path), Some(line)) if line.parse::<u32>().is_ok() => {
			let path = match rest {
				Some(prefix) => format!("{prefix}:{path}"),
				None => path.to_string(),
			};
			frame.filename = Some(path);
			frame.lineno = line.parse().ok();
		}
		_ => frame.filename = Some(location.to_string()),
	}
}

/// Determine if a frame is from application code rather than std or runtime.
fn is_in_app_frame(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"tracing::",
		"<tracing::",
		"panic_unwind::",
		"<panic_unwind::",
		"loom_telemetry::",
		"<loom_telemetry::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
		"__libc_start",
		"_start",
	];

	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::rt::",
		"::sys_common::",
		"::backtrace::",
	];

	!SYSTEM_PREFIXES.iter().any(|p| function.starts_with(p))
		&& !SYSTEM_CONTAINS.iter().any(|c| function.contains(c))
}
