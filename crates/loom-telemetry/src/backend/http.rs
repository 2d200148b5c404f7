// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend that posts crash reports to a Loom crash server.

use std::collections::HashMap;
use std::time::Duration;

use loom_telemetry_core::{Breadcrumb, CrashReport, Frame};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::Backend;
use crate::config::TelemetryConfig;
use crate::error::{Result, TelemetrySdkError};

/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
const SDK_NAME: &str = "loom-telemetry-rust";

const CAPTURE_PATH: &str = "/api/crash/capture";

/// Posts one JSON capture request per crash.
///
/// Breadcrumbs are not sent as they happen; the facade keeps them in its
/// trail and they travel inside the crash report. The upload runs on its
/// own thread with a short timeout so it works from inside an async
/// runtime and cannot hang a dying process for long. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpBackend {
	endpoint: String,
	auth_token: String,
	project_id: String,
	server_name: Option<String>,
	request_timeout: Duration,
}

impl HttpBackend {
	/// Validates the connection settings in `config`.
	pub fn from_config(config: &TelemetryConfig) -> Result<Self> {
		let auth_token = config
			.auth_token
			.clone()
			.ok_or(TelemetrySdkError::MissingAuthToken)?;
		let project_id = config
			.project_id
			.clone()
			.ok_or(TelemetrySdkError::MissingProjectId)?;
		let base_url = config
			.base_url
			.as_deref()
			.ok_or_else(|| TelemetrySdkError::InvalidBaseUrl("not set".to_string()))?;

		// Normalize base URL
		let base_url = base_url.trim_end_matches('/');
		let parsed =
			Url::parse(base_url).map_err(|e| TelemetrySdkError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(TelemetrySdkError::InvalidBaseUrl(base_url.to_string()));
		}

		Ok(Self {
			endpoint: format!("{base_url}{CAPTURE_PATH}"),
			auth_token,
			project_id,
			server_name: config.server_name.clone(),
			request_timeout: config.request_timeout,
		})
	}

	/// Full URL crash reports are posted to.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	fn build_request(&self, report: &CrashReport) -> CaptureRequest {
		let mut tags = HashMap::new();
		tags.insert("sdk.name".to_string(), SDK_NAME.to_string());
		tags.insert("sdk.version".to_string(), SDK_VERSION.to_string());

		let mut extra = serde_json::Map::new();
		if let Some(location) = &report.location {
			extra.insert("location".into(), location.clone().into());
		}
		if let Some(thread) = &report.thread {
			extra.insert("thread".into(), thread.clone().into());
		}
		if let Some(culprit) = report.stacktrace.culprit().and_then(|f| f.function.clone()) {
			extra.insert("culprit".into(), culprit.into());
		}

		CaptureRequest {
			event_id: report.event_id.to_string(),
			project_id: self.project_id.clone(),
			exception_type: report.kind.to_string(),
			exception_value: report.message.clone(),
			stacktrace: CaptureStacktrace {
				frames: report.stacktrace.frames.iter().map(CaptureFrame::from_frame).collect(),
			},
			environment: report.environment.clone(),
			platform: "rust".to_string(),
			release: report.release.clone(),
			server_name: self.server_name.clone(),
			tags,
			extra: serde_json::Value::Object(extra),
			breadcrumbs: report
				.breadcrumbs
				.iter()
				.map(CaptureBreadcrumb::from_breadcrumb)
				.collect(),
			timestamp: report.timestamp.to_rfc3339(),
		}
	}
}

impl Backend for HttpBackend {
	fn name(&self) -> &'static str {
		"http"
	}

	fn record(&self, breadcrumb: &Breadcrumb) {
		debug!(category = %breadcrumb.category, "Breadcrumb held for next crash report");
	}

	fn capture_crash(&self, report: &CrashReport) -> Result<()> {
		let request = self.build_request(report);
		let endpoint = self.endpoint.clone();
		let auth_token = self.auth_token.clone();
		let timeout = self.request_timeout;

		debug!(url = %endpoint, event_id = %request.event_id, "Sending crash report");

		std::thread::Builder::new()
			.name("loom-telemetry-reporter".to_string())
			.spawn(move || send_blocking(&endpoint, &auth_token, timeout, &request))
			.map_err(|_| TelemetrySdkError::ReporterThread)?
			.join()
			.map_err(|_| TelemetrySdkError::ReporterThread)?
	}
}

fn send_blocking(
	endpoint: &str,
	auth_token: &str,
	timeout: Duration,
	request: &CaptureRequest,
) -> Result<()> {
	let client = reqwest::blocking::Client::builder()
		.timeout(timeout)
		.user_agent(format!("{SDK_NAME}/{SDK_VERSION}"))
		.build()?;

	let response = client
		.post(endpoint)
		.bearer_auth(auth_token)
		.json(request)
		.send()?;

	if !response.status().is_success() {
		let status = response.status().as_u16();
		let message = response.text().unwrap_or_default();
		error!(status, message = %message, "Failed to report crash");
		return Err(TelemetrySdkError::ServerError { status, message });
	}

	match response.json::<CaptureResponse>() {
		Ok(captured) => info!(
			event_id = %captured.event_id,
			issue_id = %captured.issue_id,
			short_id = %captured.short_id,
			is_new_issue = captured.is_new_issue,
			"Crash report delivered"
		),
		Err(e) => debug!(error = %e, "Crash report delivered, response body not understood"),
	}

	Ok(())
}

/// Request payload for capturing a crash event.
#[derive(Debug, Serialize)]
struct CaptureRequest {
	event_id: String,
	project_id: String,
	exception_type: String,
	exception_value: String,
	stacktrace: CaptureStacktrace,
	#[serde(skip_serializing_if = "Option::is_none")]
	environment: Option<String>,
	platform: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	release: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	server_name: Option<String>,
	tags: HashMap<String, String>,
	extra: serde_json::Value,
	breadcrumbs: Vec<CaptureBreadcrumb>,
	timestamp: String,
}

#[derive(Debug, Serialize)]
struct CaptureStacktrace {
	frames: Vec<CaptureFrame>,
}

#[derive(Debug, Serialize)]
struct CaptureFrame {
	#[serde(skip_serializing_if = "Option::is_none")]
	function: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	module: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	filename: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	lineno: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	colno: Option<u32>,
	in_app: bool,
}

impl CaptureFrame {
	fn from_frame(frame: &Frame) -> Self {
		Self {
			function: frame.function.clone(),
			module: frame.module.clone(),
			filename: frame.filename.clone(),
			lineno: frame.lineno,
			colno: frame.colno,
			in_app: frame.in_app,
		}
	}
}

#[derive(Debug, Serialize)]
struct CaptureBreadcrumb {
	timestamp: String,
	category: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
	level: String,
	data: serde_json::Value,
}

impl CaptureBreadcrumb {
	fn from_breadcrumb(bc: &Breadcrumb) -> Self {
		Self {
			timestamp: bc.timestamp.to_rfc3339(),
			category: bc.category.clone(),
			message: bc.message.clone(),
			level: bc.level.to_string(),
			data: bc.data.clone(),
		}
	}
}

/// Response from the capture endpoint.
#[derive(Debug, Deserialize)]
struct CaptureResponse {
	event_id: String,
	issue_id: String,
	short_id: String,
	is_new_issue: bool,
}
