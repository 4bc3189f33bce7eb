//! Wait schedule between attempts

use std::time::Duration;

use crate::config::PollerConfig;

/// Calculate the wait before the next attempt
///
/// # Arguments
///
/// * `config` - The poller configuration containing interval and backoff
/// * `retry` - How many waits have already happened (0 for the first wait)
///
/// # Returns
///
/// The base interval when backoff is disabled. With backoff enabled,
/// `interval * multiplier^retry`, capped at the configured maximum interval.
/// A multiplier below 1 never shrinks the wait below the base interval.
/// Results too large for `u64` milliseconds saturate instead of overflowing.
///
/// # Example
///
/// ```rust
/// use repoll::poll::calculate_interval;
/// use repoll::{BackoffConfig, PollerConfig};
///
/// let config = PollerConfig {
///     interval_ms: 100,
///     backoff: Some(BackoffConfig {
///         multiplier: 2.0,
///         max_interval_ms: Some(300),
///     }),
///     ..Default::default()
/// };
///
/// assert_eq!(calculate_interval(&config, 0).as_millis(), 100);
/// assert_eq!(calculate_interval(&config, 1).as_millis(), 200);
/// assert_eq!(calculate_interval(&config, 2).as_millis(), 300);
/// ```
pub fn calculate_interval(config: &PollerConfig, retry: u32) -> Duration {
    let Some(backoff) = &config.backoff else {
        return config.interval();
    };

    let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
    let factor = backoff.multiplier.powi(exponent).max(1.0);

    // Float-to-int casts saturate, so runaway growth pins at u64::MAX
    let grown_ms = (config.interval_ms as f64 * factor) as u64;

    let interval_ms = match backoff.max_interval_ms {
        Some(max_ms) => grown_ms.min(max_ms),
        None => grown_ms,
    };

    Duration::from_millis(interval_ms)
}
