// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumb types (messages leading up to a crash).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::callsite::CallSite;
use crate::error::TelemetryError;

/// Category assigned to breadcrumbs produced by `trace`.
pub const TRACE_CATEGORY: &str = "trace";

/// A breadcrumb representing something that happened before a crash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
	pub timestamp: DateTime<Utc>,
	/// "trace", "http", "navigation", "ui"
	pub category: String,
	pub message: Option<String>,
	pub level: BreadcrumbLevel,
	pub data: serde_json::Value,
}

impl Default for Breadcrumb {
	fn default() -> Self {
		Self {
			timestamp: Utc::now(),
			category: String::new(),
			message: None,
			level: BreadcrumbLevel::Info,
			data: serde_json::Value::Object(serde_json::Map::new()),
		}
	}
}

impl Breadcrumb {
	/// Creates an info-level breadcrumb in the trace category.
	pub fn trace(message: impl Into<String>) -> Self {
		Self {
			category: TRACE_CATEGORY.to_string(),
			message: Some(message.into()),
			..Default::default()
		}
	}

	/// Creates a trace breadcrumb tagged with the location it was emitted from.
	///
	/// The message is prefixed with the rendered call site, e.g.
	/// `(handlers:42) user_logged_in`, and the structured location is kept
	/// in `data` under `file`, `module` and `line`.
	pub fn trace_at(site: &CallSite, message: impl AsRef<str>) -> Self {
		let mut breadcrumb = Self::trace(format!("{site} {}", message.as_ref()));
		if let serde_json::Value::Object(ref mut map) = breadcrumb.data {
			map.insert("file".into(), site.file.into());
			map.insert("module".into(), site.module.into());
			map.insert("line".into(), site.line.into());
		}
		breadcrumb
	}

	/// Returns the message, or an empty string if none was set.
	pub fn message_str(&self) -> &str {
		self.message.as_deref().unwrap_or_default()
	}
}

/// Severity level of a breadcrumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbLevel {
	Debug,
	Info,
	Warning,
	Error,
}

impl fmt::Display for BreadcrumbLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warning => write!(f, "warning"),
			Self::Error => write!(f, "error"),
		}
	}
}

impl FromStr for BreadcrumbLevel {
	type Err = TelemetryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"debug" => Ok(Self::Debug),
			"info" => Ok(Self::Info),
			"warning" => Ok(Self::Warning),
			"error" => Ok(Self::Error),
			_ => Err(TelemetryError::InvalidBreadcrumbLevel(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_trace_breadcrumb_defaults() {
		let bc = Breadcrumb::trace("user_logged_in");
		assert_eq!(bc.category, TRACE_CATEGORY);
		assert_eq!(bc.level, BreadcrumbLevel::Info);
		assert_eq!(bc.message_str(), "user_logged_in");
	}

	#[test]
	fn test_trace_breadcrumb_accepts_empty_and_control_chars() {
		assert_eq!(Breadcrumb::trace("").message_str(), "");
		let bc = Breadcrumb::trace("a\0b\n\tc\u{1b}[0m");
		assert_eq!(bc.message_str(), "a\0b\n\tc\u{1b}[0m");
	}

	#[test]
	fn test_trace_at_prefixes_call_site() {
		let site = CallSite::new("src/handlers/login.rs", "my_app::handlers::login", 42);
		let bc = Breadcrumb::trace_at(&site, "user_logged_in");
		assert_eq!(bc.message_str(), "(login:42) user_logged_in");
		assert_eq!(bc.data["file"], "src/handlers/login.rs");
		assert_eq!(bc.data["module"], "my_app::handlers::login");
		assert_eq!(bc.data["line"], 42);
	}

	#[test]
	fn test_unknown_level_rejected() {
		let err = "fatal".parse::<BreadcrumbLevel>().unwrap_err();
		assert!(matches!(err, TelemetryError::InvalidBreadcrumbLevel(ref s) if s == "fatal"));
	}

	proptest! {
		#[test]
		fn breadcrumb_level_roundtrip(level in prop_oneof![
			Just(BreadcrumbLevel::Debug),
			Just(BreadcrumbLevel::Info),
			Just(BreadcrumbLevel::Warning),
			Just(BreadcrumbLevel::Error),
		]) {
			let s = level.to_string();
			let parsed: BreadcrumbLevel = s.parse().unwrap();
			prop_assert_eq!(level, parsed);
		}

		#[test]
		fn trace_keeps_arbitrary_messages(message in any::<String>()) {
			let bc = Breadcrumb::trace(message.clone());
			prop_assert_eq!(bc.message_str(), message.as_str());
		}
	}
}
