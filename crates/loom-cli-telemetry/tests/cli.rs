// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runs the binary as a child process; `crash` must take it down.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_loom-telemetry"))
		.args(args)
		.env("RUST_LOG", "info")
		.env("LOOM_TELEMETRY_BACKEND", "log")
		.env_remove("LOOM_TELEMETRY_BASE_URL")
		.env_remove("LOOM_TELEMETRY_MAX_BREADCRUMBS")
		.env_remove("LOOM_TELEMETRY_PANIC_HOOK")
		.output()
		.expect("failed to run loom-telemetry")
}

#[test]
fn trace_exits_successfully() {
	let output = run(&["trace", "user_logged_in", ""]);
	let stderr = String::from_utf8_lossy(&output.stderr);

	assert!(output.status.success(), "stderr: {stderr}");
	assert!(stderr.contains("(main:"));
	assert!(stderr.contains("user_logged_in"));
}

#[test]
fn crash_terminates_the_process() {
	let output = run(&["crash"]);
	let stderr = String::from_utf8_lossy(&output.stderr);

	assert!(!output.status.success());
	assert!(stderr.contains("deliberate crash requested"), "stderr: {stderr}");
	assert!(stderr.contains("crash requested from the command line"));
}

#[test]
fn crash_terminates_with_backend_disabled() {
	let output = run(&["--backend", "none", "crash"]);
	assert!(!output.status.success());
}
