// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP transport seam.
//!
//! API clients talk to the network only through [`HttpTransport`], which
//! performs a single POST bounded by a deadline. [`ReqwestTransport`] is the
//! production implementation; tests substitute their own.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, trace};

/// An outgoing POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
	pub url: String,
	pub headers: Vec<(String, String)>,
	pub body: Vec<u8>,
}

impl HttpRequest {
	/// Creates a POST request carrying a JSON body.
	pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
		Self {
			url: url.into(),
			headers: vec![("Content-Type".to_string(), "application/json".to_string())],
			body,
		}
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Looks up a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub body: String,
}

impl HttpResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}
}

/// Failures below the HTTP status layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
	/// No complete response arrived before the deadline.
	#[error("timeout: no response before deadline")]
	Timeout,

	/// DNS resolution or TCP/TLS connect failed.
	#[error("connection failed: {0}")]
	Connect(String),

	/// Any other failure while the request was in flight.
	#[error("network error: {0}")]
	Network(String),

	/// Headers arrived but the body could not be read.
	#[error("failed to read response body: {0}")]
	Body(String),

	/// The request could not be built (bad URL or header value).
	#[error("invalid request: {0}")]
	InvalidRequest(String),
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			TransportError::Timeout
		} else if err.is_connect() {
			TransportError::Connect(err.to_string())
		} else if err.is_body() || err.is_decode() {
			TransportError::Body(err.to_string())
		} else if err.is_builder() {
			TransportError::InvalidRequest(err.to_string())
		} else {
			TransportError::Network(err.to_string())
		}
	}
}

/// Performs a single POST that must complete before `deadline`.
///
/// Implementations return `Ok` for every status code; interpreting the status
/// is the caller's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
	async fn post(
		&self,
		request: HttpRequest,
		deadline: Instant,
	) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: Client,
}

impl ReqwestTransport {
	/// Builds a transport with the standard Loom User-Agent.
	pub fn new() -> Result<Self, TransportError> {
		let client = crate::builder().build()?;
		Ok(Self { client })
	}

	/// Wraps an already configured client.
	pub fn with_client(client: Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn post(
		&self,
		request: HttpRequest,
		deadline: Instant,
	) -> Result<HttpResponse, TransportError> {
		let remaining = deadline.saturating_duration_since(Instant::now());
		if remaining.is_zero() {
			return Err(TransportError::Timeout);
		}

		debug!(url = %request.url, timeout_ms = remaining.as_millis() as u64, "sending POST");

		let mut builder = self.client.post(&request.url).timeout(remaining);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let response = builder.body(request.body).send().await.map_err(|e| {
			let err = TransportError::from(e);
			debug!(error = %err, "POST failed");
			err
		})?;

		let status = response.status().as_u16();
		let body = response.text().await.map_err(|e| {
			if e.is_timeout() {
				TransportError::Timeout
			} else {
				TransportError::Body(e.to_string())
			}
		})?;

		trace!(status, bytes = body.len(), "received response");

		Ok(HttpResponse { status, body })
	}
}

/// Shared handle to the most recent raw response body.
#[derive(Debug, Clone, Default)]
pub struct ResponseCapture {
	last: Arc<Mutex<Option<String>>>,
}

impl ResponseCapture {
	pub fn new() -> Self {
		Self::default()
	}

	/// Body of the most recent response, whatever its status.
	pub fn last(&self) -> Option<String> {
		self.last
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn record(&self, body: &str) {
		*self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(body.to_string());
	}
}

/// Transport wrapper that records every response body it passes through.
#[derive(Clone)]
pub struct CapturingTransport {
	inner: Arc<dyn HttpTransport>,
	capture: ResponseCapture,
}

impl CapturingTransport {
	pub fn new(inner: Arc<dyn HttpTransport>) -> Self {
		Self {
			inner,
			capture: ResponseCapture::new(),
		}
	}

	pub fn capture(&self) -> ResponseCapture {
		self.capture.clone()
	}
}

impl fmt::Debug for CapturingTransport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CapturingTransport")
			.field("last", &self.capture.last())
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl HttpTransport for CapturingTransport {
	async fn post(
		&self,
		request: HttpRequest,
		deadline: Instant,
	) -> Result<HttpResponse, TransportError> {
		let response = self.inner.post(request, deadline).await?;
		self.capture.record(&response.body);
		Ok(response)
	}
}
