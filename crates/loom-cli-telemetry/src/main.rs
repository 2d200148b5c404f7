// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod args;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Args, Command};

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let args = Args::parse();
	let config = args.telemetry_config()?;

	loom_telemetry::start_with(config);

	match args.command {
		Command::Trace { messages } => {
			for message in &messages {
				loom_telemetry::trace!("{message}");
			}
			info!(count = messages.len(), "Recorded breadcrumbs");
			Ok(())
		}
		Command::Crash => {
			loom_telemetry::trace!("crash requested from the command line");
			loom_telemetry::crash()
		}
	}
}
