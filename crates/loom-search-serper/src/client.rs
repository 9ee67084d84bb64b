// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Serper.dev API client implementation.

use std::sync::Arc;

use loom_common_http::{deadline_after, retry_until, CapturingTransport};
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::instrument;

use crate::config::SerperConfig;
use crate::endpoint::{Endpoint, SearchVertical};
use crate::error::SerperError;
use crate::executor::RequestExecutor;
use crate::types::{
	ImageResponse, NewsResponse, PlaceResponse, ScholarResponse, SearchRequest, SearchResponse,
	ShoppingResponse, VideoResponse,
};

/// Client for the Serper.dev Google Search API.
///
/// Cheap to clone; clones share configuration and the diagnostic response
/// capture. The configuration keeps the caller's transport; the capturing
/// wrapper belongs to the client.
#[derive(Debug, Clone)]
pub struct SerperClient {
	config: Arc<SerperConfig>,
	transport: Arc<CapturingTransport>,
}

impl SerperClient {
	pub fn new(config: SerperConfig) -> Self {
		let transport = CapturingTransport::new(Arc::clone(config.transport()));
		Self {
			config: Arc::new(config),
			transport: Arc::new(transport),
		}
	}

	/// Creates a client with default settings for the given API key.
	pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, SerperError> {
		Ok(Self::new(SerperConfig::builder(api_key).build()?))
	}

	/// Creates a client from `SERPER_API_KEY` / `SERPER_API_KEY_FILE`.
	pub fn from_env() -> Result<Self, SerperError> {
		Ok(Self::new(SerperConfig::from_env()?))
	}

	pub fn config(&self) -> &SerperConfig {
		&self.config
	}

	/// Raw body of the most recent response, for debugging.
	pub fn last_raw_response(&self) -> Option<String> {
		self.transport.capture().last()
	}

	pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, SerperError> {
		self.execute(request).await
	}

	pub async fn search_images(&self, request: SearchRequest) -> Result<ImageResponse, SerperError> {
		self.execute(request).await
	}

	pub async fn search_videos(&self, request: SearchRequest) -> Result<VideoResponse, SerperError> {
		self.execute(request).await
	}

	pub async fn search_places(&self, request: SearchRequest) -> Result<PlaceResponse, SerperError> {
		self.execute(request).await
	}

	pub async fn search_news(&self, request: SearchRequest) -> Result<NewsResponse, SerperError> {
		self.execute(request).await
	}

	pub async fn search_shopping(
		&self,
		request: SearchRequest,
	) -> Result<ShoppingResponse, SerperError> {
		self.execute(request).await
	}

	pub async fn search_scholar(
		&self,
		request: SearchRequest,
	) -> Result<ScholarResponse, SerperError> {
		self.execute(request).await
	}

	/// Searches the vertical that produces `R`, bounded by the configured
	/// total timeout.
	pub async fn execute<R: SearchVertical>(&self, request: SearchRequest) -> Result<R, SerperError> {
		let deadline = deadline_after(self.config.total_timeout());
		self.execute_with_retry(&request, R::ENDPOINT, deadline).await
	}

	/// Runs the request under the retry policy until it succeeds, fails
	/// terminally, runs out of retries, or `deadline` passes.
	#[instrument(skip_all, fields(endpoint = %endpoint, query_chars = request.query_chars()))]
	pub async fn execute_with_retry<R: DeserializeOwned>(
		&self,
		request: &SearchRequest,
		endpoint: Endpoint,
		deadline: Instant,
	) -> Result<R, SerperError> {
		let executor = RequestExecutor::with_transport(&self.config, self.transport.as_ref());
		retry_until(
			self.config.retry(),
			deadline,
			self.config.logger().as_ref(),
			|_attempt| executor.execute(request, endpoint, deadline),
		)
		.await
		.map_err(SerperError::from)
	}
}
