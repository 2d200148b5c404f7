// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash reports handed to a backend when the process goes down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::breadcrumb::Breadcrumb;
use crate::stacktrace::Stacktrace;

/// Crash report ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for EventId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for EventId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// What brought the process down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashKind {
	/// A panic raised by application code.
	Panic,
	/// An intentional crash requested through `crash()`.
	Deliberate,
}

impl fmt::Display for CrashKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Panic => write!(f, "panic"),
			Self::Deliberate => write!(f, "deliberate"),
		}
	}
}

/// Everything known about a crash at the moment it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashReport {
	pub event_id: EventId,
	pub timestamp: DateTime<Utc>,
	pub kind: CrashKind,
	pub message: String,
	/// `file:line:col` of the panic, when known.
	pub location: Option<String>,
	pub thread: Option<String>,
	pub stacktrace: Stacktrace,
	/// Oldest first.
	pub breadcrumbs: Vec<Breadcrumb>,
	pub release: Option<String>,
	pub environment: Option<String>,
}

impl CrashReport {
	/// Creates a report with a fresh event ID and the current time.
	pub fn new(kind: CrashKind, message: impl Into<String>) -> Self {
		Self {
			event_id: EventId::new(),
			timestamp: Utc::now(),
			kind,
			message: message.into(),
			location: None,
			thread: None,
			stacktrace: Stacktrace::default(),
			breadcrumbs: Vec::new(),
			release: None,
			environment: None,
		}
	}

	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	pub fn with_thread(mut self, thread: Option<String>) -> Self {
		self.thread = thread;
		self
	}

	pub fn with_stacktrace(mut self, stacktrace: Stacktrace) -> Self {
		self.stacktrace = stacktrace;
		self
	}

	pub fn with_breadcrumbs(mut self, breadcrumbs: Vec<Breadcrumb>) -> Self {
		self.breadcrumbs = breadcrumbs;
		self
	}

	pub fn with_release(mut self, release: Option<String>, environment: Option<String>) -> Self {
		self.release = release;
		self.environment = environment;
		self
	}
}
