//! Polling engine with timeout, attempt and backoff bounds
//!
//! This module provides a `Poller` that repeatedly invokes an async
//! operation until a caller-supplied predicate accepts the value it produced.
//!
//! # Features
//!
//! - Immediate first attempt, fixed interval or exponential backoff afterwards
//! - Timeout and optional attempt budget, whichever is reached first wins
//! - Operation errors are recorded, never propagated mid-poll
//! - Observable attempts via the `PollObserver` trait
//! - Built-in `TracingObserver` for logging
//! - Pluggable `Timer` so tests can run on virtual time
//!
//! # Example
//!
//! ```rust,no_run
//! use repoll::{PollError, Poller};
//! use std::time::Duration;
//!
//! async fn example() -> Result<u16, PollError<std::io::Error>> {
//!     let mut poller = Poller::new(|| async {
//!         // Your fallible status check here
//!         Ok(200)
//!     });
//!
//!     poller
//!         .set_timeout(Duration::from_secs(30))
//!         .set_interval(Duration::from_millis(500))
//!         .set_max_attempts(20);
//!
//!     poller.run(|status| *status == 200).await
//! }
//! ```

mod error;
mod observer;
mod poller;
mod schedule;
mod timer;

pub use error::{PollError, StopReason};
pub use observer::{NoOpObserver, PollObserver, StatsObserver, TracingObserver};
pub use poller::{poll_until, Poller};
pub use schedule::calculate_interval;
pub use timer::{ManualTimer, Timer, TokioTimer};
