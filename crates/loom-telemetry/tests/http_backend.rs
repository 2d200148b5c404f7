// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use loom_telemetry::{Backend, Breadcrumb, CrashKind, CrashReport, HttpBackend, TelemetryConfig, TelemetrySdkError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_url: &str) -> TelemetryConfig {
	TelemetryConfig::default()
		.base_url(base_url)
		.auth_token("token_123")
		.project_id("proj_123")
		.release("1.0.0")
}

fn report() -> CrashReport {
	CrashReport::new(CrashKind::Deliberate, "deliberate crash requested")
		.with_breadcrumbs(vec![Breadcrumb::trace("user_logged_in"), Breadcrumb::trace("")])
}

#[tokio::test(flavor = "multi_thread")]
async fn posts_capture_request_with_bearer_token() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/crash/capture"))
		.and(header("authorization", "Bearer token_123"))
		.and(body_partial_json(json!({
			"project_id": "proj_123",
			"exception_type": "deliberate",
			"exception_value": "deliberate crash requested",
			"platform": "rust",
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"event_id": "evt_1",
			"issue_id": "iss_1",
			"short_id": "PROJ-1",
			"is_new_issue": true,
			"is_regression": false,
		})))
		.expect(1)
		.mount(&server)
		.await;

	let backend = HttpBackend::from_config(&config(&server.uri())).unwrap();
	let result = tokio::task::spawn_blocking(move || backend.capture_crash(&report()))
		.await
		.unwrap();

	assert!(result.is_ok(), "capture failed: {result:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_is_server_error() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/api/crash/capture"))
		.respond_with(ResponseTemplate::new(500).set_body_string("boom"))
		.mount(&server)
		.await;

	let backend = HttpBackend::from_config(&config(&server.uri())).unwrap();
	let result = tokio::task::spawn_blocking(move || backend.capture_crash(&report()))
		.await
		.unwrap();

	match result {
		Err(TelemetrySdkError::ServerError { status, message }) => {
			assert_eq!(status, 500);
			assert_eq!(message, "boom");
		}
		other => panic!("expected server error, got {other:?}"),
	}
}

#[tokio::test(flavor = "multi_thread")]
async fn unparseable_response_body_still_succeeds() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(202))
		.mount(&server)
		.await;

	let backend = HttpBackend::from_config(&config(&server.uri())).unwrap();
	let result = tokio::task::spawn_blocking(move || backend.capture_crash(&report()))
		.await
		.unwrap();

	assert!(result.is_ok());
}

#[test]
fn unreachable_server_is_request_failure() {
	let backend = HttpBackend::from_config(&config("http://127.0.0.1:1")).unwrap();
	let result = backend.capture_crash(&report());
	assert!(matches!(result, Err(TelemetrySdkError::RequestFailed(_))));
}
