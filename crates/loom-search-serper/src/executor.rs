// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Single-attempt request execution.

use std::fmt;
use std::time::Duration;

use loom_common_http::{deadline_after, HttpRequest, HttpTransport, TransportError};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::config::SerperConfig;
use crate::endpoint::Endpoint;
use crate::error::SerperError;
use crate::types::{SearchRequest, MAX_QUERY_CHARS};

pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Sends one request and decodes the reply. Knows nothing about retries.
#[derive(Clone, Copy)]
pub struct RequestExecutor<'a> {
	config: &'a SerperConfig,
	transport: &'a dyn HttpTransport,
}

impl<'a> RequestExecutor<'a> {
	/// Executor sending through the configured transport.
	pub fn new(config: &'a SerperConfig) -> Self {
		Self {
			config,
			transport: config.transport().as_ref(),
		}
	}

	/// Executor sending through `transport` instead of the configured one.
	pub fn with_transport(config: &'a SerperConfig, transport: &'a dyn HttpTransport) -> Self {
		Self { config, transport }
	}

	pub fn url(&self, endpoint: Endpoint) -> String {
		format!("{}{}", self.config.base_url(), endpoint.path())
	}

	/// Serializes the request, truncating an over-long query first.
	pub fn encode(&self, request: &SearchRequest) -> Result<Vec<u8>, SerperError> {
		let normalized = request.normalized();
		if normalized.query.len() != request.query.len() {
			let len = request.query_chars();
			self.config.logger().info(
				"clamping query",
				&[("len", &len), ("max", &MAX_QUERY_CHARS)],
			);
		}
		serde_json::to_vec(normalized.as_ref()).map_err(SerperError::Serialization)
	}

	/// Deadline handed to the transport for one attempt. A zero
	/// `request_timeout` leaves the attempt bounded by `deadline` alone.
	pub fn attempt_deadline(&self, deadline: Instant) -> Instant {
		let timeout = self.config.request_timeout();
		if timeout == Duration::ZERO {
			deadline
		} else {
			deadline.min(deadline_after(timeout))
		}
	}

	/// Performs one POST to `endpoint`.
	///
	/// The transport gets `min(now + request_timeout, deadline)` so a single
	/// attempt never outlives the whole call.
	pub async fn execute<R: DeserializeOwned>(
		&self,
		request: &SearchRequest,
		endpoint: Endpoint,
		deadline: Instant,
	) -> Result<R, SerperError> {
		let logger = self.config.logger();
		let path = endpoint.path();
		logger.debug("sending request", &[("endpoint", &path)]);

		let body = self.encode(request)?;
		let http_request = HttpRequest::post_json(self.url(endpoint), body)
			.with_header(API_KEY_HEADER, self.config.api_key().expose());
		let attempt_deadline = self.attempt_deadline(deadline);

		let response = match self.transport.post(http_request, attempt_deadline).await {
			Ok(response) => response,
			Err(TransportError::Body(message)) => {
				logger.error("read response failed", &[("endpoint", &path), ("error", &message)]);
				return Err(SerperError::BodyRead(message));
			}
			Err(err) => {
				logger.error("request failed", &[("endpoint", &path), ("error", &err)]);
				return Err(SerperError::Transport(err));
			}
		};

		if response.status != 200 {
			logger.error(
				"api error",
				&[("status", &response.status), ("body", &response.body)],
			);
			return Err(SerperError::Status {
				status: response.status,
				body: response.body,
			});
		}

		let result = serde_json::from_str(&response.body).map_err(|e| {
			logger.error("unmarshal error", &[("error", &e)]);
			SerperError::Decode(e)
		})?;

		logger.debug("received response", &[("endpoint", &path)]);
		Ok(result)
	}
}

impl fmt::Debug for RequestExecutor<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RequestExecutor")
			.field("base_url", &self.config.base_url())
			.finish_non_exhaustive()
	}
}
