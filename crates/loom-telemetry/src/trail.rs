// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded trail of recent breadcrumbs.

use std::collections::VecDeque;

use loom_telemetry_core::Breadcrumb;

use crate::config::DEFAULT_MAX_BREADCRUMBS;

/// FIFO of the most recent breadcrumbs. Oldest entries are dropped once
/// the capacity is reached.
#[derive(Debug)]
pub struct BreadcrumbTrail {
	entries: VecDeque<Breadcrumb>,
	capacity: usize,
}

impl BreadcrumbTrail {
	pub const fn new(capacity: usize) -> Self {
		Self {
			entries: VecDeque::new(),
			capacity: if capacity == 0 { 1 } else { capacity },
		}
	}

	pub fn push(&mut self, breadcrumb: Breadcrumb) {
		self.entries.push_back(breadcrumb);
		self.trim();
	}

	/// Changes the capacity, dropping the oldest entries if it shrank.
	pub fn set_capacity(&mut self, capacity: usize) {
		self.capacity = capacity.max(1);
		self.trim();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Breadcrumb> {
		self.entries.iter()
	}

	/// Copies the trail, oldest first.
	pub fn snapshot(&self) -> Vec<Breadcrumb> {
		self.entries.iter().cloned().collect()
	}

	fn trim(&mut self) {
		while self.entries.len() > self.capacity {
			self.entries.pop_front();
		}
	}
}

impl Default for BreadcrumbTrail {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_BREADCRUMBS)
	}
}
