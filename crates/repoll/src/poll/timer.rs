//! Clock and sleep abstraction for the poll loop
//!
//! `TokioTimer` is the production implementation. `ManualTimer` is a
//! virtual clock for tests: sleeping advances it instantly and every
//! requested wait is recorded.

use std::future::{self, Future};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::duration_to_ms;

/// Source of time for a poll
pub trait Timer: Send + Sync {
    /// Current instant, used to measure elapsed time against the timeout
    fn now(&self) -> Instant;

    /// Suspend for `duration` without blocking the thread
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Timer backed by the tokio runtime
///
/// Honours tokio's paused clock, so tests using
/// `#[tokio::test(start_paused = true)]` run without real delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Virtual clock that only moves when slept on or advanced
#[derive(Debug)]
pub struct ManualTimer {
    origin: Instant,
    elapsed_ms: AtomicU64,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimer {
    /// Create a timer whose clock starts at zero elapsed time
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_ms: AtomicU64::new(0),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move the clock forward without recording a sleep
    ///
    /// Useful for simulating time spent inside the polled operation.
    pub fn advance(&self, duration: Duration) {
        let ms = duration_to_ms(duration);
        let _ = self
            .elapsed_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(ms))
            });
    }

    /// Total virtual time that has passed
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }

    /// Every duration passed to `sleep`, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Timer for ManualTimer {
    /// Stays at the origin if the virtual clock ran past what `Instant` can hold.
    fn now(&self) -> Instant {
        self.origin
            .checked_add(self.elapsed())
            .unwrap_or(self.origin)
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
        self.advance(duration);
        Box::pin(future::ready(()))
    }
}

impl<T: Timer + ?Sized> Timer for std::sync::Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        (**self).sleep(duration)
    }
}
