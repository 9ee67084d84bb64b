// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Injectable logging seam for API clients.
//!
//! Clients decide *what* to log and at which level; the [`Logger`]
//! implementation decides where it goes. [`NoopLogger`] discards everything,
//! [`TracingLogger`] forwards to `tracing`, and [`MemoryLogger`] records
//! events so tests can assert on them.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A structured key/value pair attached to a log event.
pub type Field<'a> = (&'a str, &'a dyn fmt::Display);

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
	Debug,
	Info,
	Warn,
	Error,
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Level::Debug => "debug",
			Level::Info => "info",
			Level::Warn => "warn",
			Level::Error => "error",
		};
		f.write_str(name)
	}
}

/// Four-level log sink injected into clients.
pub trait Logger: Send + Sync {
	fn debug(&self, message: &str, fields: &[Field<'_>]);
	fn info(&self, message: &str, fields: &[Field<'_>]);
	fn warn(&self, message: &str, fields: &[Field<'_>]);
	fn error(&self, message: &str, fields: &[Field<'_>]);
}

/// Logger that drops every event. The default for clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
	fn debug(&self, _message: &str, _fields: &[Field<'_>]) {}
	fn info(&self, _message: &str, _fields: &[Field<'_>]) {}
	fn warn(&self, _message: &str, _fields: &[Field<'_>]) {}
	fn error(&self, _message: &str, _fields: &[Field<'_>]) {}
}

/// Logger that emits `tracing` events.
///
/// Fields are rendered as a single `key=value` list in the `fields` attribute
/// since `tracing` requires field names at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
	fn debug(&self, message: &str, fields: &[Field<'_>]) {
		tracing::debug!(fields = %render_fields(fields), "{message}");
	}

	fn info(&self, message: &str, fields: &[Field<'_>]) {
		tracing::info!(fields = %render_fields(fields), "{message}");
	}

	fn warn(&self, message: &str, fields: &[Field<'_>]) {
		tracing::warn!(fields = %render_fields(fields), "{message}");
	}

	fn error(&self, message: &str, fields: &[Field<'_>]) {
		tracing::error!(fields = %render_fields(fields), "{message}");
	}
}

/// Renders fields as space separated `key=value` pairs.
pub fn render_fields(fields: &[Field<'_>]) -> String {
	fields
		.iter()
		.map(|(key, value)| format!("{key}={value}"))
		.collect::<Vec<_>>()
		.join(" ")
}

/// A log event captured by [`MemoryLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
	pub level: Level,
	pub message: String,
	pub fields: Vec<(String, String)>,
}

impl LogRecord {
	/// Returns the rendered value of the named field, if present.
	pub fn field(&self, key: &str) -> Option<&str> {
		self.fields
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}
}

/// Logger that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
	records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of all recorded events in emission order.
	pub fn records(&self) -> Vec<LogRecord> {
		self.records
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Recorded events at the given level.
	pub fn at_level(&self, level: Level) -> Vec<LogRecord> {
		self.records()
			.into_iter()
			.filter(|r| r.level == level)
			.collect()
	}

	/// Number of recorded events at the given level.
	pub fn count(&self, level: Level) -> usize {
		self.at_level(level).len()
	}

	fn push(&self, level: Level, message: &str, fields: &[Field<'_>]) {
		let record = LogRecord {
			level,
			message: message.to_string(),
			fields: fields
				.iter()
				.map(|(k, v)| ((*k).to_string(), v.to_string()))
				.collect(),
		};
		self.records
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(record);
	}
}

impl Logger for MemoryLogger {
	fn debug(&self, message: &str, fields: &[Field<'_>]) {
		self.push(Level::Debug, message, fields);
	}

	fn info(&self, message: &str, fields: &[Field<'_>]) {
		self.push(Level::Info, message, fields);
	}

	fn warn(&self, message: &str, fields: &[Field<'_>]) {
		self.push(Level::Warn, message, fields);
	}

	fn error(&self, message: &str, fields: &[Field<'_>]) {
		self.push(Level::Error, message, fields);
	}
}
