// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Telemetry configuration and environment loading.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, TelemetrySdkError};

/// Maximum number of breadcrumbs to keep.
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;

/// Timeout for the single crash-time upload.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment used when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "production";

pub const ENV_BACKEND: &str = "LOOM_TELEMETRY_BACKEND";
pub const ENV_BASE_URL: &str = "LOOM_TELEMETRY_BASE_URL";
pub const ENV_AUTH_TOKEN: &str = "LOOM_TELEMETRY_AUTH_TOKEN";
pub const ENV_PROJECT_ID: &str = "LOOM_TELEMETRY_PROJECT_ID";
pub const ENV_RELEASE: &str = "LOOM_TELEMETRY_RELEASE";
pub const ENV_ENVIRONMENT: &str = "LOOM_TELEMETRY_ENVIRONMENT";
pub const ENV_MAX_BREADCRUMBS: &str = "LOOM_TELEMETRY_MAX_BREADCRUMBS";
pub const ENV_PANIC_HOOK: &str = "LOOM_TELEMETRY_PANIC_HOOK";

/// Which built-in backend the facade forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
	/// Breadcrumbs and crash reports go to `tracing`.
	Log,
	/// Crash reports are posted to a Loom crash server.
	Http,
	/// Everything is discarded.
	Disabled,
}

impl fmt::Display for BackendKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Log => write!(f, "log"),
			Self::Http => write!(f, "http"),
			Self::Disabled => write!(f, "none"),
		}
	}
}

impl FromStr for BackendKind {
	type Err = TelemetrySdkError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"log" => Ok(Self::Log),
			"http" => Ok(Self::Http),
			"none" | "disabled" | "off" => Ok(Self::Disabled),
			_ => Err(TelemetrySdkError::InvalidConfig {
				key: ENV_BACKEND,
				value: s.to_string(),
			}),
		}
	}
}

/// Configuration for the telemetry facade.
///
/// # Example
///
/// ```ignore
/// let config = TelemetryConfig::default()
///     .backend(BackendKind::Http)
///     .base_url("https://loom.example.com")
///     .auth_token("token")
///     .project_id("proj_xxx")
///     .release(env!("CARGO_PKG_VERSION"));
/// loom_telemetry::start_with(config);
/// ```
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
	/// Explicit backend; `None` picks `Http` when a base URL is set, else `Log`.
	pub backend: Option<BackendKind>,
	pub base_url: Option<String>,
	pub auth_token: Option<String>,
	pub project_id: Option<String>,
	pub release: Option<String>,
	pub environment: String,
	pub server_name: Option<String>,
	pub max_breadcrumbs: usize,
	pub install_panic_hook: bool,
	pub request_timeout: Duration,
}

impl Default for TelemetryConfig {
	fn default() -> Self {
		Self {
			backend: None,
			base_url: None,
			auth_token: None,
			project_id: None,
			release: None,
			environment: DEFAULT_ENVIRONMENT.to_string(),
			server_name: None,
			max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
			install_panic_hook: true,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl TelemetryConfig {
	/// Loads configuration from `LOOM_TELEMETRY_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads configuration through an arbitrary key lookup.
	///
	/// Empty values are treated as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
		let mut config = Self::default();

		if let Some(value) = get(ENV_BACKEND) {
			config.backend = Some(value.parse()?);
		}
		config.base_url = get(ENV_BASE_URL);
		config.auth_token = get(ENV_AUTH_TOKEN);
		config.project_id = get(ENV_PROJECT_ID);
		config.release = get(ENV_RELEASE);
		if let Some(env) = get(ENV_ENVIRONMENT) {
			config.environment = env;
		}
		if let Some(value) = get(ENV_MAX_BREADCRUMBS) {
			config.max_breadcrumbs = match value.trim().parse::<usize>() {
				Ok(n) if n > 0 => n,
				_ => {
					return Err(TelemetrySdkError::InvalidConfig {
						key: ENV_MAX_BREADCRUMBS,
						value,
					})
				}
			};
		}
		if let Some(value) = get(ENV_PANIC_HOOK) {
			config.install_panic_hook = parse_bool(&value).ok_or(TelemetrySdkError::InvalidConfig {
				key: ENV_PANIC_HOOK,
				value,
			})?;
		}

		Ok(config)
	}

	/// The backend that will actually be constructed.
	pub fn resolved_backend(&self) -> BackendKind {
		match self.backend {
			Some(kind) => kind,
			None if self.base_url.is_some() => BackendKind::Http,
			None => BackendKind::Log,
		}
	}

	pub fn backend(mut self, kind: BackendKind) -> Self {
		self.backend = Some(kind);
		self
	}

	/// Example: `https://loom.ghuntley.com`
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn auth_token(mut self, token: impl Into<String>) -> Self {
		self.auth_token = Some(token.into());
		self
	}

	pub fn project_id(mut self, id: impl Into<String>) -> Self {
		self.project_id = Some(id.into());
		self
	}

	/// Example: `1.2.3` or a git commit SHA
	pub fn release(mut self, release: impl Into<String>) -> Self {
		self.release = Some(release.into());
		self
	}

	pub fn environment(mut self, env: impl Into<String>) -> Self {
		self.environment = env.into();
		self
	}

	pub fn server_name(mut self, name: impl Into<String>) -> Self {
		self.server_name = Some(name.into());
		self
	}

	/// Clamped to at least one.
	pub fn max_breadcrumbs(mut self, max: usize) -> Self {
		self.max_breadcrumbs = max.max(1);
		self
	}

	pub fn install_panic_hook(mut self, enabled: bool) -> Self {
		self.install_panic_hook = enabled;
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::collections::HashMap;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| map.get(key).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = TelemetryConfig::from_lookup(lookup(&[])).unwrap();
		assert_eq!(config.resolved_backend(), BackendKind::Log);
		assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
		assert_eq!(config.max_breadcrumbs, DEFAULT_MAX_BREADCRUMBS);
		assert!(config.install_panic_hook);
		assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
	}

	#[test]
	fn test_base_url_selects_http() {
		let config = TelemetryConfig::from_lookup(lookup(&[
			(ENV_BASE_URL, "https://loom.example.com"),
			(ENV_AUTH_TOKEN, "token"),
			(ENV_PROJECT_ID, "proj_123"),
		]))
		.unwrap();
		assert_eq!(config.resolved_backend(), BackendKind::Http);
		assert_eq!(config.auth_token.as_deref(), Some("token"));
		assert_eq!(config.project_id.as_deref(), Some("proj_123"));
	}

	#[test]
	fn test_explicit_backend_wins() {
		let config = TelemetryConfig::from_lookup(lookup(&[
			(ENV_BACKEND, "none"),
			(ENV_BASE_URL, "https://loom.example.com"),
		]))
		.unwrap();
		assert_eq!(config.resolved_backend(), BackendKind::Disabled);
	}

	#[test]
	fn test_empty_values_are_unset() {
		let config =
			TelemetryConfig::from_lookup(lookup(&[(ENV_BASE_URL, ""), (ENV_ENVIRONMENT, "  ")])).unwrap();
		assert!(config.base_url.is_none());
		assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
	}

	#[test]
	fn test_invalid_backend_rejected() {
		let err = TelemetryConfig::from_lookup(lookup(&[(ENV_BACKEND, "crashlytics")])).unwrap_err();
		assert!(matches!(err, TelemetrySdkError::InvalidConfig { key: ENV_BACKEND, .. }));
	}

	#[test]
	fn test_zero_breadcrumbs_rejected() {
		let err = TelemetryConfig::from_lookup(lookup(&[(ENV_MAX_BREADCRUMBS, "0")])).unwrap_err();
		assert!(matches!(
			err,
			TelemetrySdkError::InvalidConfig {
				key: ENV_MAX_BREADCRUMBS,
				..
			}
		));
	}

	#[test]
	fn test_panic_hook_flag() {
		let config = TelemetryConfig::from_lookup(lookup(&[(ENV_PANIC_HOOK, "false")])).unwrap();
		assert!(!config.install_panic_hook);

		let err = TelemetryConfig::from_lookup(lookup(&[(ENV_PANIC_HOOK, "maybe")])).unwrap_err();
		assert!(matches!(err, TelemetrySdkError::InvalidConfig { key: ENV_PANIC_HOOK, .. }));
	}

	#[test]
	fn test_builder_clamps_breadcrumbs() {
		assert_eq!(TelemetryConfig::default().max_breadcrumbs(0).max_breadcrumbs, 1);
	}

	proptest! {
		#[test]
		fn backend_kind_roundtrip(kind in prop_oneof![
			Just(BackendKind::Log),
			Just(BackendKind::Http),
			Just(BackendKind::Disabled),
		]) {
			let parsed: BackendKind = kind.to_string().parse().unwrap();
			prop_assert_eq!(kind, parsed);
		}

		#[test]
		fn max_breadcrumbs_parses_positive(n in 1..10_000usize) {
			let value = n.to_string();
			let config = TelemetryConfig::from_lookup(lookup(&[(ENV_MAX_BREADCRUMBS, value.as_str())])).unwrap();
			prop_assert_eq!(config.max_breadcrumbs, n);
		}
	}
}
