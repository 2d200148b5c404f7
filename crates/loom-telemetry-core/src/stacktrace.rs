// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace types attached to crash reports.

use serde::{Deserialize, Serialize};

/// A parsed stack trace, innermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stacktrace {
	pub frames: Vec<Frame>,
}

impl Stacktrace {
	/// Returns the first frame that belongs to application code.
	pub fn culprit(&self) -> Option<&Frame> {
		self.frames.iter().find(|f| f.in_app)
	}
}

/// A single stack frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub function: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filename: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lineno: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub colno: Option<u32>,
	/// Whether this frame is application code rather than std or runtime.
	#[serde(default)]
	pub in_app: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame(function: &str, in_app: bool) -> Frame {
		Frame {
			function: Some(function.to_string()),
			in_app,
			..Default::default()
		}
	}

	#[test]
	fn test_culprit_is_first_in_app_frame() {
		let st = Stacktrace {
			frames: vec![
				frame("std::panicking::begin_panic", false),
				frame("my_app::handlers::login", true),
				frame("my_app::main", true),
			],
		};
		assert_eq!(
			st.culprit().and_then(|f| f.function.as_deref()),
			Some("my_app::handlers::login")
		);
	}

	#[test]
	fn test_culprit_none_without_in_app_frames() {
		let st = Stacktrace {
			frames: vec![frame("core::panicking::panic", false)],
		};
		assert!(st.culprit().is_none());
	}

	#[test]
	fn test_frame_skips_empty_fields() {
		let json = serde_json::to_value(frame("my_app::main", true)).unwrap();
		assert_eq!(json, serde_json::json!({ "function": "my_app::main", "in_app": true }));
	}
}
