//! Poll observation and logging
//!
//! This module provides the `PollObserver` trait for monitoring attempts
//! and a `TracingObserver` implementation that logs using the `tracing` crate.

use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::error::StopReason;

/// Observer trait for poll events
///
/// Implement this trait to receive callbacks during a poll.
/// This is useful for logging, metrics collection, or debugging.
///
/// # Example
///
/// ```rust
/// use repoll::poll::{PollObserver, StopReason};
/// use std::fmt::Display;
/// use std::time::Duration;
///
/// struct MetricsObserver;
///
/// impl PollObserver for MetricsObserver {
///     fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {}
///
///     fn on_attempt_failed(&self, attempt: u32, error: &dyn Display) {}
///
///     fn on_accepted(&self, attempt: u32, elapsed: Duration) {
///         // Record time-to-ready
///     }
///
///     fn on_stopped(&self, reason: StopReason, attempts: u32, elapsed: Duration) {
///         // Record give-up metric
///     }
/// }
/// ```
pub trait PollObserver: Send + Sync {
    /// Called right before the operation is invoked
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `max_attempts` - The configured attempt budget, if any
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>);

    /// Called when the operation itself returned an error
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display);

    /// Called when the operation produced a value the predicate rejected
    fn on_value_rejected(&self, attempt: u32) {
        let _ = attempt;
    }

    /// Called before waiting `delay` ahead of the next attempt
    fn on_waiting(&self, attempt: u32, delay: Duration) {
        let _ = (attempt, delay);
    }

    /// Called when the predicate accepted a value
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt that produced the accepted value
    /// * `elapsed` - Time since the poll started
    fn on_accepted(&self, attempt: u32, elapsed: Duration);

    /// Called when a bound stopped the poll without an accepted value
    fn on_stopped(&self, reason: StopReason, attempts: u32, elapsed: Duration);
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PollObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: Option<u32>) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Display) {}

    fn on_accepted(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_stopped(&self, _reason: StopReason, _attempts: u32, _elapsed: Duration) {}
}

/// An observer that logs poll events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`, `on_value_rejected`, `on_waiting`: DEBUG
/// - `on_attempt_failed`: WARN
/// - `on_accepted`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_stopped`: ERROR
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the polled operation (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    ///
    /// # Arguments
    ///
    /// * `operation` - A descriptive name for what is being polled
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("poll")
    }
}

impl PollObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = ?max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "attempt failed"
        );
    }

    fn on_value_rejected(&self, attempt: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            "condition not met yet"
        );
    }

    fn on_waiting(&self, attempt: u32, delay: Duration) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            delay_ms = delay.as_millis() as u64,
            "waiting before next attempt"
        );
    }

    fn on_accepted(&self, attempt: u32, elapsed: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition met after polling"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                elapsed_ms = elapsed.as_millis() as u64,
                "condition met on first attempt"
            );
        }
    }

    fn on_stopped(&self, reason: StopReason, attempts: u32, elapsed: Duration) {
        tracing::error!(
            operation = %self.operation,
            reason = %reason,
            attempts = attempts,
            elapsed_ms = elapsed.as_millis() as u64,
            "polling gave up"
        );
    }
}

/// An observer that counts poll events
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Attempt start events
    pub attempt_starts: AtomicU32,
    /// Operation failure events
    pub failures: AtomicU32,
    /// Predicate rejection events
    pub rejections: AtomicU32,
    /// Wait events
    pub waits: AtomicU32,
    /// Acceptance events
    pub acceptances: AtomicU32,
    /// Stop events
    pub stops: AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attempt starts
    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    /// Get the number of operation failures
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Get the number of predicate rejections
    pub fn rejections(&self) -> u32 {
        self.rejections.load(Ordering::SeqCst)
    }

    /// Get the number of waits
    pub fn waits(&self) -> u32 {
        self.waits.load(Ordering::SeqCst)
    }

    /// Get the number of acceptances
    pub fn acceptances(&self) -> u32 {
        self.acceptances.load(Ordering::SeqCst)
    }

    /// Get the number of stops
    pub fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

impl PollObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: Option<u32>) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Display) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_value_rejected(&self, _attempt: u32) {
        self.rejections.fetch_add(1, Ordering::SeqCst);
    }

    fn on_waiting(&self, _attempt: u32, _delay: Duration) {
        self.waits.fetch_add(1, Ordering::SeqCst);
    }

    fn on_accepted(&self, _attempt: u32, _elapsed: Duration) {
        self.acceptances.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stopped(&self, _reason: StopReason, _attempts: u32, _elapsed: Duration) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Implement PollObserver for Arc<T> where T: PollObserver
impl<T: PollObserver + ?Sized> PollObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display) {
        (**self).on_attempt_failed(attempt, error)
    }

    fn on_value_rejected(&self, attempt: u32) {
        (**self).on_value_rejected(attempt)
    }

    fn on_waiting(&self, attempt: u32, delay: Duration) {
        (**self).on_waiting(attempt, delay)
    }

    fn on_accepted(&self, attempt: u32, elapsed: Duration) {
        (**self).on_accepted(attempt, elapsed)
    }

    fn on_stopped(&self, reason: StopReason, attempts: u32, elapsed: Duration) {
        (**self).on_stopped(reason, attempts, elapsed)
    }
}

/// Implement PollObserver for Box<T> where T: PollObserver
impl<T: PollObserver + ?Sized> PollObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display) {
        (**self).on_attempt_failed(attempt, error)
    }

    fn on_value_rejected(&self, attempt: u32) {
        (**self).on_value_rejected(attempt)
    }

    fn on_waiting(&self, attempt: u32, delay: Duration) {
        (**self).on_waiting(attempt, delay)
    }

    fn on_accepted(&self, attempt: u32, elapsed: Duration) {
        (**self).on_accepted(attempt, elapsed)
    }

    fn on_stopped(&self, reason: StopReason, attempts: u32, elapsed: Duration) {
        (**self).on_stopped(reason, attempts, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;

        // These should all be no-ops
        observer.on_attempt_start(1, Some(3));
        observer.on_attempt_failed(1, &"refused");
        observer.on_value_rejected(2);
        observer.on_waiting(2, Duration::from_millis(100));
        observer.on_accepted(3, Duration::from_millis(500));
        observer.on_stopped(StopReason::TimedOut, 3, Duration::from_secs(1));
    }

    #[test]
    fn test_stats_observer() {
        let observer = StatsObserver::new();

        observer.on_attempt_start(1, None);
        observer.on_attempt_failed(1, &"refused");
        observer.on_waiting(1, Duration::from_millis(100));
        observer.on_attempt_start(2, None);
        observer.on_value_rejected(2);
        observer.on_waiting(2, Duration::from_millis(100));
        observer.on_attempt_start(3, None);
        observer.on_accepted(3, Duration::from_millis(200));

        assert_eq!(observer.attempt_starts(), 3);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.rejections(), 1);
        assert_eq!(observer.waits(), 2);
        assert_eq!(observer.acceptances(), 1);
        assert_eq!(observer.stops(), 0);
    }

    #[test]
    fn test_tracing_observer_creation() {
        let observer = TracingObserver::new("wait_for_database");
        assert_eq!(observer.operation(), "wait_for_database");

        let default_observer = TracingObserver::default();
        assert_eq!(default_observer.operation(), "poll");
    }

    #[test]
    fn test_tracing_observer_without_subscriber() {
        let observer = TracingObserver::default();

        observer.on_attempt_start(1, Some(2));
        observer.on_attempt_failed(1, &"refused");
        observer.on_waiting(1, Duration::from_millis(10));
        observer.on_stopped(StopReason::AttemptsExhausted, 2, Duration::from_millis(10));
    }

    #[test]
    fn test_arc_and_box_observers() {
        let stats = Arc::new(StatsObserver::new());
        let boxed: Box<dyn PollObserver> = Box::new(stats.clone());

        boxed.on_attempt_start(1, None);
        boxed.on_stopped(StopReason::TimedOut, 1, Duration::ZERO);

        assert_eq!(stats.attempt_starts(), 1);
        assert_eq!(stats.stops(), 1);
    }
}
