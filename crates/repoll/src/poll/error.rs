//! Error types for the polling engine
//!
//! A poll ends without a value either because a bound was reached
//! (`TimedOut`, `AttemptsExhausted`) or because its configuration was
//! rejected before the first attempt (`InvalidConfig`).

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Why a poll stopped without accepting a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Elapsed time reached the configured timeout
    TimedOut,
    /// The attempt count reached the configured maximum
    AttemptsExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TimedOut => write!(f, "timed out"),
            StopReason::AttemptsExhausted => write!(f, "attempts exhausted"),
        }
    }
}

/// Errors returned by `Poller::run`
///
/// The error type is generic over `E`, the error type of the polled
/// operation. Only the most recent operation error is kept, and only if no
/// later attempt succeeded.
#[derive(Debug)]
pub enum PollError<E> {
    /// The timeout elapsed before the predicate accepted a value
    TimedOut {
        /// Number of operation invocations performed
        attempts: u32,
        /// Time spent polling
        elapsed: Duration,
        /// The configured timeout
        timeout: Duration,
        /// The configured attempt budget, if any
        max_attempts: Option<u32>,
        /// The most recent operation error, if any
        last_error: Option<E>,
        /// Custom failure message, replaces the generated diagnostic
        message: Option<String>,
    },

    /// The attempt budget ran out before the predicate accepted a value
    AttemptsExhausted {
        /// Number of operation invocations performed
        attempts: u32,
        /// Time spent polling
        elapsed: Duration,
        /// The configured timeout
        timeout: Duration,
        /// The configured attempt budget, if any
        max_attempts: Option<u32>,
        /// The most recent operation error, if any
        last_error: Option<E>,
        /// Custom failure message, replaces the generated diagnostic
        message: Option<String>,
    },

    /// The configuration failed validation; the operation was never invoked
    InvalidConfig(crate::Error),
}

impl<E: fmt::Display> fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (reason, attempts, elapsed, timeout, max_attempts, last_error, message) = match self {
            PollError::InvalidConfig(err) => return write!(f, "invalid poller configuration: {}", err),
            PollError::TimedOut {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            } => (
                StopReason::TimedOut,
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            ),
            PollError::AttemptsExhausted {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            } => (
                StopReason::AttemptsExhausted,
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            ),
        };

        if let Some(message) = message {
            return f.write_str(message);
        }

        match reason {
            StopReason::TimedOut => write!(
                f,
                "condition not met: timed out after {}ms ({} attempts",
                timeout.as_millis(),
                attempts
            )?,
            StopReason::AttemptsExhausted => write!(
                f,
                "condition not met: {} attempts exhausted in {}ms (timeout {}ms",
                attempts,
                elapsed.as_millis(),
                timeout.as_millis()
            )?,
        }

        if let Some(max) = max_attempts {
            write!(f, ", max attempts {}", max)?;
        }
        f.write_str(")")?;

        if let Some(err) = last_error {
            write!(f, "; last error: {}", err)?;
        }
        Ok(())
    }
}

impl<E: Error + 'static> Error for PollError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PollError::InvalidConfig(err) => Some(err),
            _ => self.last_error().map(|err| err as &(dyn Error + 'static)),
        }
    }
}

impl<E> PollError<E> {
    /// Create the error for a poll stopped by `reason`
    pub fn stopped(
        reason: StopReason,
        attempts: u32,
        elapsed: Duration,
        timeout: Duration,
        max_attempts: Option<u32>,
        last_error: Option<E>,
        message: Option<String>,
    ) -> Self {
        match reason {
            StopReason::TimedOut => PollError::TimedOut {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            },
            StopReason::AttemptsExhausted => PollError::AttemptsExhausted {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            },
        }
    }

    /// Why the poll stopped, `None` for configuration errors
    pub fn reason(&self) -> Option<StopReason> {
        match self {
            PollError::TimedOut { .. } => Some(StopReason::TimedOut),
            PollError::AttemptsExhausted { .. } => Some(StopReason::AttemptsExhausted),
            PollError::InvalidConfig(_) => None,
        }
    }

    /// Get the number of attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            PollError::TimedOut { attempts, .. } => *attempts,
            PollError::AttemptsExhausted { attempts, .. } => *attempts,
            PollError::InvalidConfig(_) => 0,
        }
    }

    /// Check if the timeout stopped the poll
    pub fn is_timed_out(&self) -> bool {
        matches!(self, PollError::TimedOut { .. })
    }

    /// Check if the attempt budget stopped the poll
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollError::AttemptsExhausted { .. })
    }

    /// Check if the configuration was rejected
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, PollError::InvalidConfig(_))
    }

    /// Get a reference to the most recent operation error
    pub fn last_error(&self) -> Option<&E> {
        match self {
            PollError::TimedOut { last_error, .. } => last_error.as_ref(),
            PollError::AttemptsExhausted { last_error, .. } => last_error.as_ref(),
            PollError::InvalidConfig(_) => None,
        }
    }

    /// Get the most recent operation error, consuming this error
    pub fn into_last_error(self) -> Option<E> {
        match self {
            PollError::TimedOut { last_error, .. } => last_error,
            PollError::AttemptsExhausted { last_error, .. } => last_error,
            PollError::InvalidConfig(_) => None,
        }
    }

    /// Get the custom failure message, if one was configured
    pub fn message(&self) -> Option<&str> {
        match self {
            PollError::TimedOut { message, .. } => message.as_deref(),
            PollError::AttemptsExhausted { message, .. } => message.as_deref(),
            PollError::InvalidConfig(_) => None,
        }
    }

    /// Map the operation error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> PollError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            PollError::TimedOut {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            } => PollError::TimedOut {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error: last_error.map(f),
                message,
            },
            PollError::AttemptsExhausted {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error,
                message,
            } => PollError::AttemptsExhausted {
                attempts,
                elapsed,
                timeout,
                max_attempts,
                last_error: last_error.map(f),
                message,
            },
            PollError::InvalidConfig(err) => PollError::InvalidConfig(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn timed_out(last_error: Option<io::Error>, message: Option<&str>) -> PollError<io::Error> {
        PollError::stopped(
            StopReason::TimedOut,
            4,
            Duration::from_millis(300),
            Duration::from_millis(300),
            None,
            last_error,
            message.map(str::to_string),
        )
    }

    #[test]
    fn test_timed_out_error() {
        let err = timed_out(None, None);

        assert!(err.is_timed_out());
        assert!(!err.is_exhausted());
        assert!(!err.is_invalid_config());
        assert_eq!(err.reason(), Some(StopReason::TimedOut));
        assert_eq!(err.attempts(), 4);
        assert!(err.last_error().is_none());
    }

    #[test]
    fn test_exhausted_error() {
        let err: PollError<io::Error> = PollError::stopped(
            StopReason::AttemptsExhausted,
            5,
            Duration::from_millis(40),
            Duration::from_secs(60),
            Some(5),
            Some(io::Error::other("refused")),
            None,
        );

        assert!(err.is_exhausted());
        assert_eq!(err.reason(), Some(StopReason::AttemptsExhausted));
        assert_eq!(err.attempts(), 5);
        assert_eq!(err.last_error().unwrap().to_string(), "refused");
    }

    #[test]
    fn test_invalid_config_error() {
        let err: PollError<io::Error> =
            PollError::InvalidConfig(crate::Error::invalid_config("max-attempts must be at least 1"));

        assert!(err.is_invalid_config());
        assert_eq!(err.reason(), None);
        assert_eq!(err.attempts(), 0);
        assert!(err.to_string().contains("max-attempts must be at least 1"));
    }

    #[test]
    fn test_display_timed_out() {
        let display = timed_out(Some(io::Error::other("connection refused")), None).to_string();

        assert!(display.contains("timed out after 300ms"));
        assert!(display.contains("4 attempts"));
        assert!(!display.contains("max attempts"));
        assert!(display.contains("last error: connection refused"));
    }

    #[test]
    fn test_display_exhausted_with_max_attempts() {
        let err: PollError<io::Error> = PollError::stopped(
            StopReason::AttemptsExhausted,
            5,
            Duration::from_millis(40),
            Duration::from_secs(60),
            Some(5),
            None,
            None,
        );

        assert_eq!(
            err.to_string(),
            "condition not met: 5 attempts exhausted in 40ms (timeout 60000ms, max attempts 5)"
        );
    }

    #[test]
    fn test_display_custom_message_replaces_diagnostic() {
        let err = timed_out(
            Some(io::Error::other("connection refused")),
            Some("database never became ready"),
        );

        assert_eq!(err.to_string(), "database never became ready");
        assert_eq!(err.message(), Some("database never became ready"));
    }

    #[test]
    fn test_source_is_last_error() {
        let err = timed_out(Some(io::Error::other("boom")), None);
        assert_eq!(err.source().unwrap().to_string(), "boom");

        let err = timed_out(None, None);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_into_last_error() {
        let err = timed_out(Some(io::Error::other("boom")), None);
        assert_eq!(err.into_last_error().unwrap().to_string(), "boom");
    }

    #[test]
    fn test_map_err() {
        let err: PollError<i32> = PollError::stopped(
            StopReason::AttemptsExhausted,
            3,
            Duration::ZERO,
            Duration::from_secs(1),
            Some(3),
            Some(42),
            None,
        );

        let mapped = err.map_err(|code| format!("error code: {}", code));
        assert!(matches!(
            mapped,
            PollError::AttemptsExhausted { last_error: Some(ref e), .. } if e == "error code: 42"
        ));
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::TimedOut.to_string(), "timed out");
        assert_eq!(StopReason::AttemptsExhausted.to_string(), "attempts exhausted");
    }
}
