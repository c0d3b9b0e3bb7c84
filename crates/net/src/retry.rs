//! Retry wrapper that adds exponential-backoff retry logic to any
//! [`Transport`].

use std::time::{Duration, SystemTime};

use crate::config::RetryConfig;
use crate::{Exchange, NetError, Reconnectable, Transport};

/// A wrapper that adds retry-with-backoff to any [`Transport`]
/// implementation.
///
/// # Reconnection caveat
///
/// `RetryClient` retries operations on the **same underlying connection**.
/// If the connection breaks (e.g., TCP disconnect), the retried writes will
/// fail immediately on the dead stream. Use [`ReconnectRetryClient`] for
/// transports that support reconnection.
///
/// `RetryClient` is most useful for **transient** errors (brief network
/// hiccups, a busy interface engine) where the underlying stream remains
/// valid.
pub struct RetryClient<T> {
    inner: T,
    retry_config: RetryConfig,
}

impl<T> RetryClient<T> {
    /// Create a new `RetryClient` wrapping `inner` with the given retry
    /// configuration.
    pub fn new(inner: T, retry_config: RetryConfig) -> Self {
        Self {
            inner,
            retry_config,
        }
    }

    /// Unwrap the `RetryClient`, returning the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Get a shared reference to the inner transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Get a mutable reference to the inner transport.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Transport> Transport for RetryClient<T> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), NetError> {
        retry_op(&self.retry_config, || self.inner.send_raw(data))
    }
}

impl<T: Exchange> Exchange for RetryClient<T> {
    fn exchange_raw(&mut self, data: &[u8]) -> Result<Vec<u8>, NetError> {
        retry_op(&self.retry_config, || self.inner.exchange_raw(data))
    }
}

/// A retry wrapper that **reconnects** between attempts.
///
/// Unlike [`RetryClient`], which retries on the same (possibly broken)
/// connection, `ReconnectRetryClient` calls [`Reconnectable::reconnect()`]
/// before each retry attempt, which makes it effective for recovering from
/// full connection drops.
pub struct ReconnectRetryClient<T> {
    inner: T,
    retry_config: RetryConfig,
}

impl<T> ReconnectRetryClient<T> {
    /// Create a new retry-with-reconnect wrapper.
    pub fn new(inner: T, retry_config: RetryConfig) -> Self {
        Self {
            inner,
            retry_config,
        }
    }

    /// Unwrap the wrapper, returning the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport + Reconnectable> Transport for ReconnectRetryClient<T> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), NetError> {
        retry_op_with_reconnect(&self.retry_config, &mut self.inner, |t| t.send_raw(data))
    }
}

impl<T: Exchange + Reconnectable> Exchange for ReconnectRetryClient<T> {
    fn exchange_raw(&mut self, data: &[u8]) -> Result<Vec<u8>, NetError> {
        retry_op_with_reconnect(&self.retry_config, &mut self.inner, |t| {
            t.exchange_raw(data)
        })
    }
}

// ── Retry helpers ──────────────────────────────────────────────────────

/// Execute `op`, retrying on retryable errors with exponential backoff.
///
/// Non-retryable errors are returned immediately. On exhausting all
/// attempts the last retryable error is wrapped in
/// [`NetError::RetriesExhausted`].
fn retry_op<V, F>(config: &RetryConfig, mut op: F) -> Result<V, NetError>
where
    F: FnMut() -> Result<V, NetError>,
{
    if config.max_attempts == 0 {
        return Err(NetError::InvalidConfig("max_attempts must be >= 1".into()));
    }

    let mut last_error: Option<NetError> = None;

    for attempt in 0..config.max_attempts {
        match op() {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !e.is_retryable() {
                    return Err(e);
                }
                last_error = Some(e);

                // Don't sleep after the last attempt.
                if attempt + 1 < config.max_attempts {
                    std::thread::sleep(compute_delay(config, attempt));
                }
            }
        }
    }

    // We only reach here when every attempt failed with a retryable error.
    Err(NetError::RetriesExhausted {
        attempts: config.max_attempts,
        last_error: Box::new(last_error.unwrap_or_else(|| {
            unreachable!("at least one attempt was made (max_attempts >= 1)")
        })),
    })
}

/// Execute `op`, retrying with reconnection between attempts. Reconnection
/// errors are ignored — the next operation attempt may still succeed or
/// produce a more specific error.
fn retry_op_with_reconnect<V, T, F>(
    config: &RetryConfig,
    inner: &mut T,
    mut op: F,
) -> Result<V, NetError>
where
    T: Reconnectable,
    F: FnMut(&mut T) -> Result<V, NetError>,
{
    if config.max_attempts == 0 {
        return Err(NetError::InvalidConfig("max_attempts must be >= 1".into()));
    }

    let mut last_error: Option<NetError> = None;

    for attempt in 0..config.max_attempts {
        match op(inner) {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !e.is_retryable() {
                    return Err(e);
                }
                last_error = Some(e);

                if attempt + 1 < config.max_attempts {
                    std::thread::sleep(compute_delay(config, attempt));
                    // Best-effort reconnection before the next retry.
                    let _ = inner.reconnect();
                }
            }
        }
    }

    Err(NetError::RetriesExhausted {
        attempts: config.max_attempts,
        last_error: Box::new(last_error.unwrap_or_else(|| {
            unreachable!("at least one attempt was made (max_attempts >= 1)")
        })),
    })
}

/// Compute the backoff delay for the given `attempt` (0-indexed).
///
/// delay = min(initial_delay * 2^attempt, max_delay), optionally with
/// jitter.
fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config
        .initial_delay
        .saturating_mul(2u32.saturating_pow(attempt));
    let capped = base.min(config.max_delay);

    if config.jitter {
        // Simple jitter: pick a duration in [capped/2, capped] using system
        // time nanoseconds as a cheap entropy source (no external rand
        // crate).
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos();
        let half = capped / 2;
        let jitter_range_nanos = capped.as_nanos().saturating_sub(half.as_nanos());
        if jitter_range_nanos == 0 {
            return capped;
        }
        let offset_nanos = (nanos as u128) % jitter_range_nanos;
        half + Duration::from_nanos(offset_nanos as u64)
    } else {
        capped
    }
}
