// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client configuration.
//!
//! [`SerperConfig`] is built once through [`SerperConfigBuilder`] and is
//! read-only afterwards. Every builder method overrides exactly one setting;
//! anything left unset keeps its default.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};

use loom_common_http::{HttpTransport, Logger, NoopLogger, ReqwestTransport, RetryConfig, TransportError};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DEFAULT_BASE_URL: &str = "https://google.serper.dev";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key (`SERPER_API_KEY_FILE` also works).
pub const API_KEY_ENV: &str = "SERPER_API_KEY";
/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "SERPER_BASE_URL";

/// Errors raised while assembling a [`SerperConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("API key must not be empty")]
	EmptyApiKey,

	#[error("required secret not found: set either {var} or {file_var}")]
	MissingSecret { var: String, file_var: String },

	#[error("failed to read secret file at {path}: {source}")]
	SecretFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptySecretPath { var: String },

	#[error("failed to build HTTP transport: {0}")]
	Transport(#[source] TransportError),
}

/// Serper API key. Redacted in `Debug`/`Display`, zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Explicitly access the key. Keeps secret access visible in review.
	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
	}
}

impl fmt::Display for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}

/// Immutable client configuration, shared read-only across concurrent calls.
#[derive(Clone)]
pub struct SerperConfig {
	base_url: String,
	api_key: ApiKey,
	transport: Arc<dyn HttpTransport>,
	logger: Arc<dyn Logger>,
	retry: RetryConfig,
	request_timeout: Duration,
	total_timeout: Duration,
}

impl SerperConfig {
	pub fn builder(api_key: impl Into<String>) -> SerperConfigBuilder {
		SerperConfigBuilder::new(api_key)
	}

	/// Builder seeded from `SERPER_API_KEY` / `SERPER_API_KEY_FILE` and,
	/// when set, `SERPER_BASE_URL`.
	pub fn builder_from_env() -> Result<SerperConfigBuilder, ConfigError> {
		let api_key = require_secret_env(API_KEY_ENV)?;
		let mut builder = SerperConfigBuilder::new(api_key.expose());
		if let Ok(base_url) = env::var(BASE_URL_ENV) {
			if !base_url.is_empty() {
				builder = builder.base_url(base_url);
			}
		}
		Ok(builder)
	}

	pub fn from_env() -> Result<Self, ConfigError> {
		Self::builder_from_env()?.build()
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn api_key(&self) -> &ApiKey {
		&self.api_key
	}

	pub fn transport(&self) -> &Arc<dyn HttpTransport> {
		&self.transport
	}

	pub fn logger(&self) -> &Arc<dyn Logger> {
		&self.logger
	}

	pub fn retry(&self) -> &RetryConfig {
		&self.retry
	}

	pub fn request_timeout(&self) -> Duration {
		self.request_timeout
	}

	pub fn total_timeout(&self) -> Duration {
		self.total_timeout
	}
}

impl fmt::Debug for SerperConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerperConfig")
			.field("base_url", &self.base_url)
			.field("api_key", &self.api_key)
			.field("retry", &self.retry)
			.field("request_timeout", &self.request_timeout)
			.field("total_timeout", &self.total_timeout)
			.finish_non_exhaustive()
	}
}

/// Builder for [`SerperConfig`].
pub struct SerperConfigBuilder {
	api_key: ApiKey,
	base_url: String,
	transport: Option<Arc<dyn HttpTransport>>,
	logger: Arc<dyn Logger>,
	retry: RetryConfig,
	request_timeout: Duration,
	total_timeout: Duration,
}

impl SerperConfigBuilder {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_key: ApiKey::new(api_key),
			base_url: DEFAULT_BASE_URL.to_string(),
			transport: None,
			logger: Arc::new(NoopLogger),
			retry: RetryConfig::default(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
			total_timeout: DEFAULT_TOTAL_TIMEOUT,
		}
	}

	/// Sets a custom base URL for the API (useful for testing).
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Replaces the default `reqwest` transport.
	pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
		self.logger = logger;
		self
	}

	/// Retries after the first attempt.
	pub fn retry_count(mut self, retry_count: u32) -> Self {
		self.retry.retry_count = retry_count;
		self
	}

	pub fn retry_base_delay(mut self, base_delay: Duration) -> Self {
		self.retry.base_delay = base_delay;
		self
	}

	/// Upper bound for a single attempt.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	/// Upper bound for a whole call, across attempts and backoff waits.
	pub fn total_timeout(mut self, timeout: Duration) -> Self {
		self.total_timeout = timeout;
		self
	}

	pub fn build(self) -> Result<SerperConfig, ConfigError> {
		if self.api_key.is_empty() {
			return Err(ConfigError::EmptyApiKey);
		}

		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(ReqwestTransport::new().map_err(ConfigError::Transport)?),
		};

		Ok(SerperConfig {
			base_url: self.base_url.trim_end_matches('/').to_string(),
			api_key: self.api_key,
			transport,
			logger: self.logger,
			retry: self.retry,
			request_timeout: self.request_timeout,
			total_timeout: self.total_timeout,
		})
	}
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// `{var}_FILE` wins over `{var}`. A single trailing newline is stripped from
/// file contents. Returns `Ok(None)` when neither is set.
pub fn load_secret_env(var: &str) -> Result<Option<ApiKey>, ConfigError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(ConfigError::EmptySecretPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path)
			.map_err(|source| ConfigError::SecretFile { path, source })?;

		let secret = content.strip_suffix('\n').unwrap_or(&content);
		return Ok(Some(ApiKey::new(secret)));
	}

	if let Ok(value) = env::var(var) {
		return Ok(Some(ApiKey::new(value)));
	}

	Ok(None)
}

/// Like [`load_secret_env`] but missing values are an error.
pub fn require_secret_env(var: &str) -> Result<ApiKey, ConfigError> {
	load_secret_env(var)?.ok_or_else(|| ConfigError::MissingSecret {
		var: var.to_string(),
		file_var: format!("{var}_FILE"),
	})
}
