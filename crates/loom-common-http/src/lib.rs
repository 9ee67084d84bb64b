// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Loom API clients.
//!
//! This crate provides:
//! - A pre-configured `reqwest` client builder with consistent User-Agent header
//! - The [`HttpTransport`] seam and its `reqwest` implementation
//! - The injectable [`Logger`] seam
//! - A deadline-bounded retry loop with odd-multiple backoff

mod client;
pub mod log;
mod retry;
mod transport;

pub use client::{builder, user_agent};
pub use log::{Field, Level, Logger, MemoryLogger, NoopLogger, TracingLogger};
pub use retry::{
	deadline_after, retry_until, should_retry, CancelPoint, RetryConfig, RetryError, RetryState,
	RetryableError,
};
pub use transport::{
	CapturingTransport, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
	ResponseCapture, TransportError,
};
