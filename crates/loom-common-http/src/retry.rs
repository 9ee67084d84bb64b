// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Deadline-bounded retry loop.
//!
//! [`retry_until`] runs an operation up to `retry_count + 1` times. Before
//! attempt `n` (n >= 1) it waits `base_delay * (2n - 1)`, i.e. 1x, 3x, 5x, 7x
//! the base delay. A single total deadline bounds every attempt and every
//! wait; when it fires the loop stops with [`RetryError::Cancelled`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, sleep_until, timeout_at, Instant};

use crate::log::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
	/// Retries after the first attempt.
	pub retry_count: u32,
	pub base_delay: Duration,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			retry_count: 3,
			base_delay: Duration::from_secs(1),
		}
	}
}

impl RetryConfig {
	pub fn new(retry_count: u32, base_delay: Duration) -> Self {
		Self {
			retry_count,
			base_delay,
		}
	}

	/// Upper bound on the number of attempts a call can make.
	pub fn max_attempts(&self) -> u32 {
		self.retry_count.saturating_add(1)
	}

	/// Wait before the 0-based `attempt`. The first attempt never waits.
	pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
		if attempt == 0 {
			return Duration::ZERO;
		}
		let multiplier = attempt.saturating_mul(2) - 1;
		self.base_delay.saturating_mul(multiplier)
	}
}

/// About 30 years; stands in for "no deadline" when a timeout overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returns `now + timeout`, saturating to a far-future instant when the sum
/// is not representable.
pub fn deadline_after(timeout: Duration) -> Instant {
	let now = Instant::now();
	now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Classifies a failed attempt as worth retrying or terminal.
pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

/// Returns whether another attempt should follow a failure of `attempt`.
///
/// The attempt limit is checked before the error is classified.
pub fn should_retry<E: RetryableError>(cfg: &RetryConfig, err: &E, attempt: u32) -> bool {
	if attempt >= cfg.retry_count {
		return false;
	}
	err.is_retryable()
}

/// Where the total deadline interrupted the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPoint {
	Attempt,
	Backoff,
}

impl fmt::Display for CancelPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CancelPoint::Attempt => f.write_str("during request"),
			CancelPoint::Backoff => f.write_str("during retry delay"),
		}
	}
}

/// Terminal outcome of a failed [`retry_until`] call.
#[derive(Debug, Error)]
pub enum RetryError<E> {
	/// The total deadline expired. `last` holds the most recent attempt error.
	#[error("request cancelled {during}: deadline exceeded")]
	Cancelled {
		attempts: u32,
		during: CancelPoint,
		last: Option<E>,
	},

	/// The last attempt failed and no further attempt is allowed.
	#[error("request failed after {attempts} attempts: {source}")]
	Exhausted {
		attempts: u32,
		#[source]
		source: E,
	},
}

impl<E> RetryError<E> {
	/// Attempts started before the loop gave up.
	pub fn attempts(&self) -> u32 {
		match self {
			RetryError::Cancelled { attempts, .. } | RetryError::Exhausted { attempts, .. } => {
				*attempts
			}
		}
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, RetryError::Cancelled { .. })
	}
}

/// Progress of one [`retry_until`] call.
#[derive(Debug)]
pub struct RetryState<E> {
	/// 0-based index of the current attempt.
	pub attempt: u32,
	pub last_error: Option<E>,
	/// Wait applied before the current attempt.
	pub delay: Duration,
}

impl<E> RetryState<E> {
	fn new() -> Self {
		Self {
			attempt: 0,
			last_error: None,
			delay: Duration::ZERO,
		}
	}

	fn attempts_made(&self) -> u32 {
		self.attempt + 1
	}
}

/// Runs `op` until it succeeds, fails terminally, runs out of retries, or
/// `deadline` passes.
///
/// `op` receives the 0-based attempt index. An attempt still running when the
/// deadline fires is dropped.
pub async fn retry_until<F, Fut, T, E>(
	cfg: &RetryConfig,
	deadline: Instant,
	logger: &dyn Logger,
	mut op: F,
) -> Result<T, RetryError<E>>
where
	F: FnMut(u32) -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: RetryableError,
{
	let mut state = RetryState::new();

	loop {
		if state.attempt > 0 {
			state.delay = cfg.delay_for_attempt(state.attempt);
			logger.warn(
				"retrying request",
				&[
					("attempt", &state.attempt),
					("delay_ms", &state.delay.as_millis()),
				],
			);

			tokio::select! {
				biased;
				_ = sleep_until(deadline) => {
					return Err(RetryError::Cancelled {
						attempts: state.attempt,
						during: CancelPoint::Backoff,
						last: state.last_error.take(),
					});
				}
				_ = sleep(state.delay) => {}
			}
		}

		let err = match timeout_at(deadline, op(state.attempt)).await {
			Ok(Ok(value)) => {
				if state.attempt > 0 {
					logger.info("request succeeded after retry", &[("attempt", &state.attempt)]);
				}
				return Ok(value);
			}
			Ok(Err(err)) => err,
			Err(_elapsed) => {
				return Err(RetryError::Cancelled {
					attempts: state.attempts_made(),
					during: CancelPoint::Attempt,
					last: state.last_error.take(),
				});
			}
		};

		if Instant::now() >= deadline {
			return Err(RetryError::Cancelled {
				attempts: state.attempts_made(),
				during: CancelPoint::Attempt,
				last: Some(err),
			});
		}

		if !should_retry(cfg, &err, state.attempt) {
			return Err(RetryError::Exhausted {
				attempts: state.attempts_made(),
				source: err,
			});
		}

		state.last_error = Some(err);
		state.attempt += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::log::{Level, MemoryLogger, NoopLogger};
	use proptest::prelude::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::{Arc, Mutex};

	#[derive(Debug, Error)]
	#[error("mock error (retryable: {retryable})")]
	struct MockError {
		retryable: bool,
	}

	impl RetryableError for MockError {
		fn is_retryable(&self) -> bool {
			self.retryable
		}
	}

	fn cfg(retry_count: u32, base_ms: u64) -> RetryConfig {
		RetryConfig::new(retry_count, Duration::from_millis(base_ms))
	}

	fn far_deadline() -> Instant {
		Instant::now() + Duration::from_secs(3600)
	}

	#[test]
	fn default_config() {
		let cfg = RetryConfig::default();
		assert_eq!(cfg.retry_count, 3);
		assert_eq!(cfg.base_delay, Duration::from_secs(1));
		assert_eq!(cfg.max_attempts(), 4);
	}

	#[test]
	fn delay_schedule_is_odd_multiples() {
		let cfg = cfg(10, 100);
		let delays: Vec<u128> = (0..5)
			.map(|n| cfg.delay_for_attempt(n).as_millis())
			.collect();
		assert_eq!(delays, vec![0, 100, 300, 500, 700]);
	}

	#[test]
	fn should_retry_checks_limit_before_error() {
		let cfg = cfg(2, 1);
		let retryable = MockError { retryable: true };
		assert!(should_retry(&cfg, &retryable, 0));
		assert!(should_retry(&cfg, &retryable, 1));
		assert!(!should_retry(&cfg, &retryable, 2));
		assert!(!should_retry(&cfg, &MockError { retryable: false }, 0));
	}

	#[tokio::test(start_paused = true)]
	async fn deadline_after_adds_timeout() {
		let now = Instant::now();
		assert_eq!(deadline_after(Duration::from_secs(5)), now + Duration::from_secs(5));
	}

	#[tokio::test(start_paused = true)]
	async fn deadline_after_saturates_on_overflow() {
		let now = Instant::now();
		let deadline = deadline_after(Duration::MAX);
		assert!(deadline > now + Duration::from_secs(86_400 * 365));
	}

	proptest! {
		/// Property: the wait before attempt n is exactly base * (2n - 1).
		#[test]
		fn delay_matches_formula(n in 1u32..64, base_ms in 0u64..10_000) {
			let cfg = cfg(64, base_ms);
			let expected = Duration::from_millis(base_ms * u64::from(2 * n - 1));
			prop_assert_eq!(cfg.delay_for_attempt(n), expected);
		}
	}

	/// Purpose: Verifies that a first-attempt success neither waits nor logs a
	/// retry warning.
	#[tokio::test(start_paused = true)]
	async fn first_attempt_success_does_not_wait() {
		let logger = MemoryLogger::new();
		let start = Instant::now();

		let result: Result<&str, RetryError<MockError>> =
			retry_until(&cfg(3, 1000), far_deadline(), &logger, |_| async { Ok("done") })
				.await;

		assert_eq!(result.unwrap(), "done");
		assert_eq!(start.elapsed(), Duration::ZERO);
		assert_eq!(logger.count(Level::Warn), 0);
		assert_eq!(logger.count(Level::Info), 0);
	}

	/// Purpose: Verifies that a non-retryable error stops the loop after one
	/// attempt even though retries remain.
	#[tokio::test(start_paused = true)]
	async fn non_retryable_error_fails_immediately() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let counter = Arc::clone(&attempt_count);

		let result: Result<(), RetryError<MockError>> =
			retry_until(&cfg(5, 10), far_deadline(), &NoopLogger, |_| {
				let count = Arc::clone(&counter);
				async move {
					count.fetch_add(1, Ordering::SeqCst);
					Err(MockError { retryable: false })
				}
			})
			.await;

		let err = result.unwrap_err();
		assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
		assert!(matches!(
			err,
			RetryError::Exhausted {
				attempts: 1,
				source: MockError { retryable: false }
			}
		));
	}

	/// Purpose: Verifies that a persistently retryable error is attempted
	/// exactly retry_count + 1 times and then reported as exhausted.
	#[tokio::test(start_paused = true)]
	async fn retryable_error_exhausts_all_attempts() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let counter = Arc::clone(&attempt_count);
		let logger = MemoryLogger::new();

		let result: Result<(), RetryError<MockError>> =
			retry_until(&cfg(3, 10), far_deadline(), &logger, |_| {
				let count = Arc::clone(&counter);
				async move {
					count.fetch_add(1, Ordering::SeqCst);
					Err(MockError { retryable: true })
				}
			})
			.await;

		let err = result.unwrap_err();
		assert_eq!(attempt_count.load(Ordering::SeqCst), 4);
		assert_eq!(err.attempts(), 4);
		assert!(!err.is_cancelled());
		assert_eq!(
			err.to_string(),
			"request failed after 4 attempts: mock error (retryable: true)"
		);
		assert_eq!(logger.count(Level::Warn), 3);
	}

	/// Purpose: Verifies recovery after transient failures, and that the waits
	/// before attempts 2 and 3 are 1x and 3x the base delay.
	#[tokio::test(start_paused = true)]
	async fn succeeds_after_retries_with_odd_multiple_waits() {
		let started: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
		let log = Arc::clone(&started);
		let logger = MemoryLogger::new();

		let result: Result<u32, RetryError<MockError>> =
			retry_until(&cfg(3, 200), far_deadline(), &logger, |attempt| {
				let log = Arc::clone(&log);
				async move {
					log.lock().unwrap().push(Instant::now());
					if attempt < 2 {
						Err(MockError { retryable: true })
					} else {
						Ok(attempt)
					}
				}
			})
			.await;

		assert_eq!(result.unwrap(), 2);
		let started = started.lock().unwrap();
		assert_eq!(started.len(), 3);
		assert_eq!(started[1] - started[0], Duration::from_millis(200));
		assert_eq!(started[2] - started[1], Duration::from_millis(600));

		let warnings = logger.at_level(Level::Warn);
		assert_eq!(warnings.len(), 2);
		assert_eq!(warnings[0].field("attempt"), Some("1"));
		assert_eq!(warnings[1].field("delay_ms"), Some("600"));
		let infos = logger.at_level(Level::Info);
		assert_eq!(infos.len(), 1);
		assert_eq!(infos[0].message, "request succeeded after retry");
		assert_eq!(infos[0].field("attempt"), Some("2"));
	}

	#[tokio::test(start_paused = true)]
	async fn zero_retry_count_makes_single_attempt() {
		let attempt_count = Arc::new(AtomicU32::new(0));
		let counter = Arc::clone(&attempt_count);

		let result: Result<(), RetryError<MockError>> =
			retry_until(&cfg(0, 10), far_deadline(), &NoopLogger, |_| {
				let count = Arc::clone(&counter);
				async move {
					count.fetch_add(1, Ordering::SeqCst);
					Err(MockError { retryable: true })
				}
			})
			.await;

		assert_eq!(result.unwrap_err().attempts(), 1);
		assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
	}

	/// Purpose: Verifies that the total deadline firing during a backoff wait
	/// aborts at the deadline instead of finishing the wait.
	#[tokio::test(start_paused = true)]
	async fn deadline_during_backoff_cancels() {
		let start = Instant::now();
		let deadline = start + Duration::from_secs(5);

		let result: Result<(), RetryError<MockError>> =
			retry_until(&cfg(3, 10_000), deadline, &NoopLogger, |_| async {
				Err(MockError { retryable: true })
			})
			.await;

		let err = result.unwrap_err();
		assert_eq!(start.elapsed(), Duration::from_secs(5));
		match err {
			RetryError::Cancelled {
				attempts,
				during,
				last,
			} => {
				assert_eq!(attempts, 1);
				assert_eq!(during, CancelPoint::Backoff);
				assert!(last.is_some());
			}
			other => panic!("expected cancellation, got {other:?}"),
		}
	}

	/// Purpose: Verifies that an attempt outliving the total deadline is
	/// dropped and reported as a cancellation, not awaited to completion.
	#[tokio::test(start_paused = true)]
	async fn deadline_during_attempt_cancels() {
		let start = Instant::now();
		let deadline = start + Duration::from_secs(1);

		let result: Result<(), RetryError<MockError>> =
			retry_until(&cfg(3, 10), deadline, &NoopLogger, |_| async {
				sleep(Duration::from_secs(60)).await;
				Ok(())
			})
			.await;

		let err = result.unwrap_err();
		assert_eq!(start.elapsed(), Duration::from_secs(1));
		assert!(err.is_cancelled());
		assert_eq!(
			err.to_string(),
			"request cancelled during request: deadline exceeded"
		);
		assert!(matches!(
			err,
			RetryError::Cancelled {
				attempts: 1,
				during: CancelPoint::Attempt,
				last: None
			}
		));
	}

	/// Purpose: Verifies that an attempt failing after the deadline has passed
	/// is reported as a cancellation carrying that failure.
	#[tokio::test(start_paused = true)]
	async fn failure_after_deadline_is_cancellation() {
		let deadline = Instant::now();

		let result: Result<(), RetryError<MockError>> =
			retry_until(&cfg(3, 10), deadline, &NoopLogger, |_| async {
				Err(MockError { retryable: true })
			})
			.await;

		match result.unwrap_err() {
			RetryError::Cancelled { last, during, .. } => {
				assert_eq!(during, CancelPoint::Attempt);
				assert!(last.unwrap().retryable);
			}
			other => panic!("expected cancellation, got {other:?}"),
		}
	}
}
