//! Poller configuration types
//!
//! Durations are stored as whole milliseconds so configuration files stay
//! readable (`timeout-ms: 30000`). Use the `Duration` accessors in code.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::poll::StopReason;

/// Configuration for a single poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollerConfig {
    /// Overall time budget in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Base delay between attempts in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of operation invocations (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    /// Exponential backoff settings (fixed interval when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<BackoffConfig>,

    /// Failure message used verbatim instead of the generated diagnostic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            interval_ms: default_interval_ms(),
            max_attempts: None,
            backoff: None,
            message: None,
        }
    }
}

/// Exponential backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackoffConfig {
    /// Factor applied to the interval after every retry
    #[serde(default = "default_backoff_multiplier")]
    pub multiplier: f64,

    /// Upper bound for the interval in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interval_ms: Option<u64>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            multiplier: default_backoff_multiplier(),
            max_interval_ms: None,
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}

/// Convert a duration to whole milliseconds, saturating at `u64::MAX`
pub(crate) fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl PollerConfig {
    /// Overall time budget
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base delay between attempts
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Check the invariants that serde and the setters cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == Some(0) {
            return Err(Error::invalid_config("max-attempts must be at least 1"));
        }

        if let Some(backoff) = &self.backoff {
            if !backoff.multiplier.is_finite() || backoff.multiplier <= 0.0 {
                return Err(Error::invalid_config(format!(
                    "backoff multiplier must be a positive number, got {}",
                    backoff.multiplier
                )));
            }
        }

        Ok(())
    }

    /// Decide whether polling must stop after `attempts` invocations
    ///
    /// The timeout is checked before the attempt budget, so a check where
    /// both bounds are reached reports `StopReason::TimedOut`.
    pub fn stop_reason(&self, elapsed: Duration, attempts: u32) -> Option<StopReason> {
        if elapsed >= self.timeout() {
            return Some(StopReason::TimedOut);
        }

        match self.max_attempts {
            Some(max) if attempts >= max => Some(StopReason::AttemptsExhausted),
            _ => None,
        }
    }
}
