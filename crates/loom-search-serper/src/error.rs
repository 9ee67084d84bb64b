// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for Serper.dev API client.

use loom_common_http::{CancelPoint, RetryError, RetryableError, TransportError};
use thiserror::Error;

use crate::config::ConfigError;

/// Substrings marking transient transport or server failures.
const RETRYABLE_KEYWORDS: &[&str] = &[
	"timeout",
	"connection",
	"network",
	"dial",
	"dns",
	"500",
	"502",
	"503",
	"504",
	"internal server error",
	"bad gateway",
	"service unavailable",
	"gateway timeout",
];

const RATE_LIMIT_KEYWORDS: &[&str] = &["rate limit", "429"];

/// Substrings marking failures a retry cannot fix.
const TERMINAL_KEYWORDS: &[&str] = &[
	"401",
	"403",
	"400",
	"unauthorized",
	"forbidden",
	"bad request",
	"invalid api key",
	"authentication",
	"unmarshal",
	"json",
	"parse",
];

/// Errors that can occur when interacting with the Serper API.
#[derive(Debug, Error)]
pub enum SerperError {
	/// The request could not be encoded.
	#[error("marshal request: {0}")]
	Serialization(#[source] serde_json::Error),

	/// The upstream could not be reached or did not answer in time.
	#[error("request error: {0}")]
	Transport(#[source] TransportError),

	/// The upstream answered with a status other than 200.
	#[error("api error: status {status}, body: {body}")]
	Status { status: u16, body: String },

	/// The response body could not be read.
	#[error("read response: {0}")]
	BodyRead(String),

	/// The response body is not the expected JSON shape.
	#[error("unmarshal response: {0}")]
	Decode(#[source] serde_json::Error),

	/// The total-operation deadline expired.
	#[error("request cancelled {during}: deadline exceeded")]
	Cancelled {
		attempts: u32,
		during: CancelPoint,
		#[source]
		last: Option<Box<SerperError>>,
	},

	/// No further attempt is allowed; wraps the final attempt's error.
	#[error("request failed after {attempts} attempts: {source}")]
	Exhausted {
		attempts: u32,
		#[source]
		source: Box<SerperError>,
	},

	#[error("invalid configuration: {0}")]
	Config(#[from] ConfigError),
}

/// Structured cause of a [`SerperError`], looking through exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	Serialization,
	Transport,
	Status,
	BodyRead,
	Decode,
	Cancelled,
	Config,
}

impl SerperError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			SerperError::Serialization(_) => ErrorKind::Serialization,
			SerperError::Transport(_) => ErrorKind::Transport,
			SerperError::Status { .. } => ErrorKind::Status,
			SerperError::BodyRead(_) => ErrorKind::BodyRead,
			SerperError::Decode(_) => ErrorKind::Decode,
			SerperError::Cancelled { .. } => ErrorKind::Cancelled,
			SerperError::Exhausted { source, .. } => source.kind(),
			SerperError::Config(_) => ErrorKind::Config,
		}
	}

	/// True when the total deadline ended the call.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, SerperError::Cancelled { .. })
	}

	pub fn is_exhausted(&self) -> bool {
		matches!(self, SerperError::Exhausted { .. })
	}

	/// Attempts made before giving up, for errors returned by the retry loop.
	pub fn attempts(&self) -> Option<u32> {
		match self {
			SerperError::Cancelled { attempts, .. } | SerperError::Exhausted { attempts, .. } => {
				Some(*attempts)
			}
			_ => None,
		}
	}

	/// HTTP status of the underlying upstream error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			SerperError::Status { status, .. } => Some(*status),
			SerperError::Exhausted { source, .. } => source.status(),
			_ => None,
		}
	}
}

/// Keyword classification of an error message.
///
/// Retryable keywords are checked before terminal ones, so a message matching
/// both is retryable. Messages matching nothing are retryable.
pub fn is_retryable_message(message: &str) -> bool {
	let msg = message.to_lowercase();
	let contains_any = |keywords: &[&str]| keywords.iter().any(|k| msg.contains(k));

	if contains_any(RETRYABLE_KEYWORDS) {
		return true;
	}
	if contains_any(RATE_LIMIT_KEYWORDS) {
		return true;
	}
	if contains_any(TERMINAL_KEYWORDS) {
		return false;
	}
	true
}

impl RetryableError for SerperError {
	fn is_retryable(&self) -> bool {
		match self {
			SerperError::Serialization(_)
			| SerperError::Decode(_)
			| SerperError::Cancelled { .. }
			| SerperError::Exhausted { .. }
			| SerperError::Config(_)
			| SerperError::Transport(TransportError::InvalidRequest(_)) => false,
			SerperError::Transport(_) | SerperError::Status { .. } | SerperError::BodyRead(_) => {
				is_retryable_message(&self.to_string())
			}
		}
	}
}

impl From<RetryError<SerperError>> for SerperError {
	fn from(err: RetryError<SerperError>) -> Self {
		match err {
			RetryError::Cancelled {
				attempts,
				during,
				last,
			} => SerperError::Cancelled {
				attempts,
				during,
				last: last.map(Box::new),
			},
			RetryError::Exhausted { attempts, source } => SerperError::Exhausted {
				attempts,
				source: Box::new(source),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn status(code: u16, body: &str) -> SerperError {
		SerperError::Status {
			status: code,
			body: body.to_string(),
		}
	}

	fn decode_error(input: &str) -> SerperError {
		let err = serde_json::from_str::<serde_json::Value>(input).unwrap_err();
		SerperError::Decode(err)
	}

	#[test]
	fn messages_embed_status_and_body() {
		assert_eq!(
			status(500, "fail").to_string(),
			"api error: status 500, body: fail"
		);
		assert!(decode_error("not-json")
			.to_string()
			.starts_with("unmarshal response: "));
		assert_eq!(
			SerperError::BodyRead("connection reset".into()).to_string(),
			"read response: connection reset"
		);
	}

	#[test]
	fn server_errors_are_retryable() {
		for code in [500, 502, 503, 504] {
			assert!(status(code, "").is_retryable(), "status {code}");
		}
		assert!(status(429, "").is_retryable());
		assert!(status(418, "Rate limit exceeded").is_retryable());
	}

	#[test]
	fn client_errors_are_terminal() {
		for code in [400, 401, 403] {
			assert!(!status(code, "").is_retryable(), "status {code}");
		}
		assert!(!status(422, "Invalid API key").is_retryable());
		assert!(!status(422, "authentication required").is_retryable());
	}

	#[test]
	fn transport_errors_are_retryable() {
		assert!(SerperError::Transport(TransportError::Timeout).is_retryable());
		assert!(SerperError::Transport(TransportError::Connect("refused".into())).is_retryable());
		assert!(SerperError::Transport(TransportError::Network("reset".into())).is_retryable());
	}

	#[test]
	fn unbuildable_request_is_terminal() {
		let err = SerperError::Transport(TransportError::InvalidRequest("builder error".into()));
		assert!(!err.is_retryable());
	}

	#[test]
	fn unrecognized_errors_default_to_retryable() {
		assert!(status(404, "not found").is_retryable());
		assert!(SerperError::BodyRead("truncated".into()).is_retryable());
		assert!(is_retryable_message("something odd happened"));
	}

	/// Verifies the retryable keyword set is consulted before the terminal
	/// one, so a message with both is retried.
	#[test]
	fn retryable_keywords_win_over_terminal() {
		assert!(status(500, "unauthorized").is_retryable());
		assert!(is_retryable_message("Bad Request: upstream connection dropped"));
		assert!(is_retryable_message("429 forbidden"));
		assert!(!is_retryable_message("FORBIDDEN"));
	}

	#[test]
	fn decode_and_cancellation_are_never_retried() {
		// serde's text can mention retryable keywords; the kind decides.
		let err = serde_json::from_str::<serde_json::Value>("{\"connection\": }").unwrap_err();
		assert!(!SerperError::Decode(err).is_retryable());
		assert!(!decode_error("not-json").is_retryable());

		let cancelled = SerperError::Cancelled {
			attempts: 1,
			during: CancelPoint::Backoff,
			last: Some(Box::new(status(503, ""))),
		};
		assert!(!cancelled.is_retryable());
		assert!(cancelled.is_cancelled());
	}

	#[test]
	fn kind_and_status_look_through_exhaustion() {
		let err = SerperError::from(RetryError::Exhausted {
			attempts: 4,
			source: status(500, "boom"),
		});
		assert!(err.is_exhausted());
		assert_eq!(err.attempts(), Some(4));
		assert_eq!(err.kind(), ErrorKind::Status);
		assert_eq!(err.status(), Some(500));
		assert_eq!(
			err.to_string(),
			"request failed after 4 attempts: api error: status 500, body: boom"
		);
		assert!(std::error::Error::source(&err).is_some());
	}

	#[test]
	fn cancellation_converts_with_marker() {
		let err = SerperError::from(RetryError::<SerperError>::Cancelled {
			attempts: 2,
			during: CancelPoint::Backoff,
			last: Some(status(503, "")),
		});
		assert!(err.is_cancelled());
		assert_eq!(err.kind(), ErrorKind::Cancelled);
		assert_eq!(err.attempts(), Some(2));
		assert_eq!(
			err.to_string(),
			"request cancelled during retry delay: deadline exceeded"
		);
		assert_eq!(err.status(), None);
	}
}
