//! Polling engine
//!
//! This module provides the `Poller`, which re-invokes an async operation
//! until a predicate accepts the value it produced or a bound is reached.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::{duration_to_ms, BackoffConfig, PollerConfig};

use super::error::PollError;
use super::observer::{PollObserver, TracingObserver};
use super::schedule::calculate_interval;
use super::timer::{Timer, TokioTimer};

/// Poll an operation with a given configuration
///
/// This is a convenience function for one-off polls. For custom observers
/// or timers, build a `Poller`.
///
/// # Example
///
/// ```rust,no_run
/// use repoll::{poll_until, PollerConfig};
///
/// async fn example() {
///     let config = PollerConfig {
///         timeout_ms: 10_000,
///         interval_ms: 500,
///         ..Default::default()
///     };
///
///     let status = poll_until(&config, || async {
///         // Query something that eventually becomes ready
///         Ok::<_, std::io::Error>("ready")
///     }, |status| *status == "ready").await;
/// }
/// ```
pub async fn poll_until<F, Fut, T, E, P>(
    config: &PollerConfig,
    operation: F,
    predicate: P,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: FnMut(&T) -> bool,
{
    Poller::with_config(operation, config.clone())
        .run(predicate)
        .await
}

/// Re-invokes an operation until a predicate accepts its value
///
/// The operation is supplied once at construction. Setters take `&mut self`
/// and return `&mut Self`, so configuration chains in any order before
/// `run` is awaited.
///
/// # Example
///
/// ```rust,no_run
/// use repoll::Poller;
/// use std::time::Duration;
///
/// async fn example() {
///     let mut poller = Poller::new(|| async { Ok::<u32, std::io::Error>(3) });
///     poller
///         .set_timeout(Duration::from_secs(5))
///         .set_interval(Duration::from_millis(100))
///         .set_backoff(2.0, Some(Duration::from_secs(1)));
///
///     let value = poller.run(|n| *n >= 3).await;
/// }
/// ```
pub struct Poller<F, O = TracingObserver, C = TokioTimer> {
    operation: F,
    config: PollerConfig,
    observer: O,
    timer: C,
}

impl<F> Poller<F> {
    /// Create a poller with default configuration
    pub fn new(operation: F) -> Self {
        Self::with_config(operation, PollerConfig::default())
    }

    /// Create a poller from an existing configuration
    pub fn with_config(operation: F, config: PollerConfig) -> Self {
        Self {
            operation,
            config,
            observer: TracingObserver::default(),
            timer: TokioTimer,
        }
    }
}

impl<F, O, C> Poller<F, O, C> {
    /// Replace the overall time budget
    ///
    /// A zero timeout allows exactly one attempt.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.timeout_ms = duration_to_ms(timeout);
        self
    }

    /// Replace the base delay between attempts
    pub fn set_interval(&mut self, interval: Duration) -> &mut Self {
        self.config.interval_ms = duration_to_ms(interval);
        self
    }

    /// Replace the failure message used instead of the generated diagnostic
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.config.message = Some(message.into());
        self
    }

    /// Replace the attempt budget
    ///
    /// Must be at least 1; a zero budget is reported as
    /// `PollError::InvalidConfig` when the poll starts.
    pub fn set_max_attempts(&mut self, max_attempts: u32) -> &mut Self {
        self.config.max_attempts = Some(max_attempts);
        self
    }

    /// Enable exponential backoff
    ///
    /// The wait after retry `k` becomes `interval * multiplier^k`, capped at
    /// `max_interval` when given. `multiplier` must be positive; values below 1
    /// hold the wait at the base interval.
    pub fn set_backoff(&mut self, multiplier: f64, max_interval: Option<Duration>) -> &mut Self {
        self.config.backoff = Some(BackoffConfig {
            multiplier,
            max_interval_ms: max_interval.map(duration_to_ms),
        });
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Get mutable access to the configuration
    pub fn config_mut(&mut self) -> &mut PollerConfig {
        &mut self.config
    }

    /// Set the observer
    ///
    /// The observer receives callbacks during polling.
    pub fn with_observer<O2>(self, observer: O2) -> Poller<F, O2, C> {
        Poller {
            operation: self.operation,
            config: self.config,
            observer,
            timer: self.timer,
        }
    }

    /// Set the timer used to measure elapsed time and to wait
    pub fn with_timer<C2>(self, timer: C2) -> Poller<F, O, C2> {
        Poller {
            operation: self.operation,
            config: self.config,
            observer: self.observer,
            timer,
        }
    }
}

impl<F, O, C> Poller<F, O, C>
where
    O: PollObserver,
    C: Timer,
{
    /// Poll until `predicate` accepts a value produced by the operation
    ///
    /// The first attempt runs immediately. Operation errors are recorded and
    /// polling continues; the predicate only ever sees successfully produced
    /// values. The configuration is snapshotted when the poll starts.
    ///
    /// # Returns
    ///
    /// The accepted value, or a `PollError` describing why polling stopped.
    pub async fn run<Fut, T, E, P>(&mut self, mut predicate: P) -> Result<T, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: FnMut(&T) -> bool,
    {
        let config = self.config.clone();
        config.validate().map_err(PollError::InvalidConfig)?;

        let start = self.timer.now();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            self.observer.on_attempt_start(attempts, config.max_attempts);

            // Only the latest attempt's error is kept; a success clears it
            let last_error = match (self.operation)().await {
                Ok(value) => {
                    if predicate(&value) {
                        let elapsed = self.timer.now().saturating_duration_since(start);
                        self.observer.on_accepted(attempts, elapsed);
                        return Ok(value);
                    }

                    self.observer.on_value_rejected(attempts);
                    None
                }
                Err(err) => {
                    self.observer.on_attempt_failed(attempts, &err);
                    Some(err)
                }
            };

            let elapsed = self.timer.now().saturating_duration_since(start);
            if let Some(reason) = config.stop_reason(elapsed, attempts) {
                self.observer.on_stopped(reason, attempts, elapsed);
                return Err(PollError::stopped(
                    reason,
                    attempts,
                    elapsed,
                    config.timeout(),
                    config.max_attempts,
                    last_error,
                    config.message,
                ));
            }

            let delay = calculate_interval(&config, attempts - 1);
            self.observer.on_waiting(attempts, delay);
            self.timer.sleep(delay).await;
        }
    }
}
