// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source locations attached to trace messages.

use std::fmt;
use std::path::Path;

/// Where a trace message was emitted from.
///
/// Normally built by the `loom_telemetry::trace!` macro from `file!()`,
/// `module_path!()` and `line!()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
	pub file: &'static str,
	pub module: &'static str,
	pub line: u32,
}

impl CallSite {
	pub const fn new(file: &'static str, module: &'static str, line: u32) -> Self {
		Self { file, module, line }
	}

	/// File name without directory or extension, e.g. `login` for
	/// `src/handlers/login.rs`.
	pub fn file_stem(&self) -> &str {
		Path::new(self.file)
			.file_stem()
			.and_then(|s| s.to_str())
			.unwrap_or(self.file)
	}
}

impl fmt::Display for CallSite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}:{})", self.file_stem(), self.line)
	}
}
