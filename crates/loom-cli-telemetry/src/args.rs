// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::Context;
use clap::{Parser, Subcommand};
use loom_telemetry::config::{ENV_AUTH_TOKEN, ENV_BACKEND, ENV_BASE_URL, ENV_PROJECT_ID};
use loom_telemetry::{BackendKind, TelemetryConfig};

/// Drive the Loom telemetry facade from the command line
#[derive(Parser, Debug)]
#[command(name = "loom-telemetry", version)]
pub struct Args {
	/// Backend to forward to: log, http or none
	#[arg(long, global = true, env = ENV_BACKEND)]
	pub backend: Option<BackendKind>,

	/// Crash server base URL (selects the http backend when --backend is unset)
	#[arg(long, global = true, env = ENV_BASE_URL)]
	pub base_url: Option<String>,

	/// Bearer token for the crash server
	#[arg(long, global = true, env = ENV_AUTH_TOKEN, hide_env_values = true)]
	pub auth_token: Option<String>,

	/// Project the crash reports belong to
	#[arg(long, global = true, env = ENV_PROJECT_ID)]
	pub project_id: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Start telemetry and record each message as a breadcrumb
	Trace {
		#[arg(required = true)]
		messages: Vec<String>,
	},
	/// Start telemetry, then crash the process on purpose
	Crash,
}

impl Args {
	/// Environment settings with command-line overrides applied.
	pub fn telemetry_config(&self) -> anyhow::Result<TelemetryConfig> {
		let mut config = TelemetryConfig::from_env().context("invalid LOOM_TELEMETRY_* environment")?;
		config.backend = self.backend.or(config.backend);
		if let Some(url) = &self.base_url {
			config = config.base_url(url);
		}
		if let Some(token) = &self.auth_token {
			config = config.auth_token(token);
		}
		if let Some(project) = &self.project_id {
			config = config.project_id(project);
		}
		Ok(config)
	}
}
