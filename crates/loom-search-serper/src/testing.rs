// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use loom_common_http::{HttpRequest, HttpResponse, HttpTransport, Logger, TransportError};
use tokio::time::Instant;

use crate::config::SerperConfig;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
	pub request: HttpRequest,
	pub sent_at: Instant,
	pub deadline: Instant,
}

/// Transport replaying canned outcomes in order. The last one repeats.
pub(crate) struct StubTransport {
	outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
	calls: Mutex<Vec<RecordedCall>>,
	latency: Duration,
}

impl StubTransport {
	pub fn new(
		outcomes: impl IntoIterator<Item = Result<HttpResponse, TransportError>>,
	) -> Arc<Self> {
		Self::with_latency(outcomes, Duration::ZERO)
	}

	/// Each call sleeps for `latency` before answering.
	pub fn with_latency(
		outcomes: impl IntoIterator<Item = Result<HttpResponse, TransportError>>,
		latency: Duration,
	) -> Arc<Self> {
		Arc::new(Self {
			outcomes: Mutex::new(outcomes.into_iter().collect()),
			calls: Mutex::new(Vec::new()),
			latency,
		})
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().unwrap().clone()
	}

	fn next_outcome(&self) -> Result<HttpResponse, TransportError> {
		let mut outcomes = self.outcomes.lock().unwrap();
		if outcomes.len() > 1 {
			outcomes.pop_front().unwrap()
		} else {
			outcomes.front().cloned().expect("stub transport has no outcomes")
		}
	}
}

#[async_trait]
impl HttpTransport for StubTransport {
	async fn post(
		&self,
		request: HttpRequest,
		deadline: Instant,
	) -> Result<HttpResponse, TransportError> {
		self.calls.lock().unwrap().push(RecordedCall {
			request,
			sent_at: Instant::now(),
			deadline,
		});
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
		self.next_outcome()
	}
}

pub(crate) fn config_with(transport: Arc<StubTransport>, logger: Arc<dyn Logger>) -> SerperConfig {
	SerperConfig::builder("test-api-key")
		.base_url("http://serper.test")
		.transport(transport)
		.logger(logger)
		.retry_base_delay(Duration::from_millis(10))
		.build()
		.unwrap()
}
