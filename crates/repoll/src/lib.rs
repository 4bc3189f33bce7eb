//! # repoll
//!
//! Async polling engine providing:
//! - A `Poller` that re-invokes an operation until a predicate accepts its value
//! - Timeout and attempt-count bounds with optional exponential backoff
//! - Serde-backed configuration with YAML/JSON loading and env overrides
//! - Observable attempts via the `PollObserver` trait

pub mod config;
pub mod error;
pub mod poll;

pub use config::{BackoffConfig, PollerConfig};
pub use error::{Error, Result};
pub use poll::{poll_until, PollError, Poller, StopReason};
