// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom telemetry facade.
//!
//! This crate holds the value types shared between the `loom-telemetry`
//! facade and its backends. It performs no I/O.
//!
//! # Overview
//!
//! - [`Breadcrumb`]: a diagnostic message recorded for later correlation
//!   with a crash report
//! - [`CallSite`]: the source location a trace message was emitted from
//! - [`Stacktrace`] / [`Frame`]: a parsed backtrace
//! - [`CrashReport`]: everything handed to a backend when the process dies

pub mod breadcrumb;
pub mod callsite;
pub mod error;
pub mod report;
pub mod stacktrace;

pub use breadcrumb::{Breadcrumb, BreadcrumbLevel, TRACE_CATEGORY};
pub use callsite::CallSite;
pub use error::{Result, TelemetryError};
pub use report::{CrashKind, CrashReport, EventId};
pub use stacktrace::{Frame, Stacktrace};
