//! Typed error types for the MLLP transport.

use std::io;
use std::time::Duration;

/// MLLP transport error conditions, categorized by type.
///
/// Each variant carries enough context to produce a helpful error message.
/// Use [`NetError::is_retryable()`] to classify transient vs permanent
/// failures.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    // -- Connection --
    /// The remote host actively refused the connection (e.g. port not open).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the remote host responded.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The peer closed the connection unexpectedly.
    #[error("connection closed by peer")]
    ConnectionClosed,

    // -- Address --
    /// DNS resolution found no addresses for the given input.
    #[error("no address found for: {0}")]
    NoAddressFound(String),

    // -- I/O --
    /// Writing data to the peer failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// Reading data from the peer failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] io::Error),

    /// The peer did not respond within the read timeout.
    #[error("read timed out waiting for a framed message")]
    ReadTimeout,

    // -- Framing --
    /// An incoming message exceeded the maximum allowed size.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge {
        /// Bytes accumulated when the guard tripped.
        size: usize,
        /// Configured maximum message size in bytes.
        max: usize,
    },

    // -- Retry --
    /// All retry attempts have been exhausted.
    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        /// Total number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last_error: Box<NetError>,
    },

    // -- Configuration --
    /// An invalid configuration was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NetError {
    /// Returns `true` if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NetError::ConnectionTimeout { .. }
                | NetError::ConnectionClosed
                | NetError::WriteFailed(_)
                | NetError::ReadFailed(_)
                | NetError::ReadTimeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(
            NetError::ConnectionTimeout {
                addr: "x".into(),
                timeout: Duration::from_secs(1),
                source: io::Error::new(io::ErrorKind::TimedOut, "test"),
            }
            .is_retryable()
        );
        assert!(NetError::ConnectionClosed.is_retryable());
        assert!(
            NetError::WriteFailed(io::Error::new(io::ErrorKind::BrokenPipe, "test"))
                .is_retryable()
        );
        assert!(NetError::ReadFailed(io::Error::other("test")).is_retryable());
        assert!(NetError::ReadTimeout.is_retryable());
    }

    #[test]
    fn non_retryable_errors() {
        assert!(
            !NetError::ConnectionRefused {
                addr: "x".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "test"),
            }
            .is_retryable()
        );
        assert!(!NetError::NoAddressFound("x".into()).is_retryable());
        assert!(
            !NetError::MessageTooLarge {
                size: 2_000_000,
                max: 1_048_576
            }
            .is_retryable()
        );
        assert!(!NetError::InvalidConfig("test".into()).is_retryable());
        assert!(
            !NetError::RetriesExhausted {
                attempts: 3,
                last_error: Box::new(NetError::ReadTimeout),
            }
            .is_retryable()
        );
    }
}
