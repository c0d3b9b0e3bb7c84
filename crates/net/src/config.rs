//! Configuration types for the MLLP transport.

use std::time::Duration;

/// Complete transport configuration: timeouts + retry settings.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct NetConfig {
    /// Network timeout settings.
    pub timeouts: NetTimeouts,
    /// Retry settings for transient failures.
    pub retry: RetryConfig,
    /// Maximum accepted size of one framed message, in bytes.
    pub max_message_size: MaxMessageSize,
}

/// Newtype for the message size cap so `NetConfig` can derive `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxMessageSize(pub usize);

impl Default for MaxMessageSize {
    fn default() -> Self {
        Self(crate::frame::DEFAULT_MAX_MESSAGE_SIZE)
    }
}

/// Timeout settings for MLLP connections.
///
/// Defaults are tuned for LAN-connected HL7 interfaces:
/// - `connect`: 5s (generous for LAN, might be tight for VPN)
/// - `write`: 30s (large result batches can run to hundreds of KB)
/// - `read`: 10s (interface engines may queue before acknowledging)
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct NetTimeouts {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect: Duration,
    /// Maximum time to wait for a write to complete.
    pub write: Duration,
    /// Maximum time to wait for a framed reply after sending a message.
    pub read: Duration,
}

impl Default for NetTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(30),
            read: Duration::from_secs(10),
        }
    }
}

/// Retry settings for transient failures.
///
/// Uses exponential backoff with optional jitter. Only errors where
/// [`crate::NetError::is_retryable()`] returns `true` are retried.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Whether to add random jitter to retry delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}
