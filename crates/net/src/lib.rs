//! HL7 MLLP transport — send and receive HL7 v2.x messages over TCP.
//!
//! Implements the Minimal Lower Layer Protocol: each message travels framed
//! between a VT (0x0B) start byte and an FS (0x1C) CR (0x0D) end pair. The
//! core API is synchronous (`std::net`), with no async runtime required.
//!
//! Framing is this crate's whole concern: what goes inside the frame (and
//! whether a received message deserves an ACK) is decided by the caller —
//! the listener hands each fully-framed message to a handler and writes
//! back whatever reply the handler produces.

#![warn(missing_docs)]

mod addr;
mod config;
mod error;
/// MLLP frame reading and writing.
pub mod frame;
mod retry;
#[cfg(feature = "tcp")]
mod tcp;

#[cfg(feature = "tcp")]
pub use addr::{DEFAULT_PORT, resolve_hl7_addr};
pub use config::{MaxMessageSize, NetConfig, NetTimeouts, RetryConfig};
pub use error::NetError;
pub use frame::{frame_message, read_message};
pub use retry::{ReconnectRetryClient, RetryClient};
#[cfg(feature = "tcp")]
pub use tcp::{MllpClient, MllpListener};

use std::ops::ControlFlow;

// ── Traits ──────────────────────────────────────────────────────────────

/// Send framed data to a peer. All transports implement this.
pub trait Transport: Send {
    /// Send raw bytes to the peer.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), NetError>;

    /// Frame an HL7 message and send it (convenience wrapper over
    /// `send_raw`).
    fn send_message(&mut self, message: &str) -> Result<(), NetError> {
        self.send_raw(&frame::frame_message(message))
    }
}

/// Send a message and read the framed reply. Only bidirectional transports
/// implement this.
pub trait Exchange: Transport {
    /// Send raw bytes and read one framed reply.
    fn exchange_raw(&mut self, data: &[u8]) -> Result<Vec<u8>, NetError>;

    /// Frame and send a message, then read the reply (typically an ACK) as
    /// text.
    fn exchange_message(&mut self, message: &str) -> Result<String, NetError> {
        let reply = self.exchange_raw(&frame::frame_message(message))?;
        Ok(String::from_utf8_lossy(&reply).into_owned())
    }
}

/// A transport that can re-establish its connection after a failure.
///
/// Implementing this trait enables [`ReconnectRetryClient`] to
/// automatically reconnect between retry attempts, making retries
/// effective even after a full connection drop.
pub trait Reconnectable {
    /// Re-establish the connection.
    ///
    /// Implementations should close the old connection (if any) and open a
    /// fresh one. Errors during reconnection are non-fatal for the retry
    /// loop — the next operation attempt may still succeed or produce a
    /// more specific error.
    fn reconnect(&mut self) -> Result<(), NetError>;
}

// ── Batch helpers ───────────────────────────────────────────────────────

/// Progress report for batch sending.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchProgress {
    /// How many messages have been sent so far.
    pub sent: usize,
    /// Total messages in the batch.
    pub total: usize,
    /// The reply (typically an ACK) for the message just sent, when the
    /// transport is bidirectional.
    pub reply: Option<String>,
}

/// Result of a batch send operation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchResult {
    /// Number of messages successfully sent.
    pub sent: usize,
    /// Total messages in the batch.
    pub total: usize,
}

/// Send a batch of messages without awaiting replies.
///
/// The `on_progress` callback receives a [`BatchProgress`] after each send
/// and can return `ControlFlow::Break(())` to abort the batch early.
pub fn send_batch<T, F>(
    transport: &mut T,
    messages: &[impl AsRef<str>],
    mut on_progress: F,
) -> Result<BatchResult, NetError>
where
    T: Transport,
    F: FnMut(BatchProgress) -> ControlFlow<(), ()>,
{
    let total = messages.len();
    for (i, message) in messages.iter().enumerate() {
        transport.send_message(message.as_ref())?;
        let progress = BatchProgress {
            sent: i + 1,
            total,
            reply: None,
        };
        if let ControlFlow::Break(()) = on_progress(progress) {
            return Ok(BatchResult { sent: i + 1, total });
        }
    }
    Ok(BatchResult { sent: total, total })
}

/// Send a batch of messages, awaiting one framed reply per message
/// (requires a bidirectional transport).
pub fn send_batch_with_replies<T, F>(
    transport: &mut T,
    messages: &[impl AsRef<str>],
    mut on_progress: F,
) -> Result<BatchResult, NetError>
where
    T: Exchange,
    F: FnMut(BatchProgress) -> ControlFlow<(), ()>,
{
    let total = messages.len();
    for (i, message) in messages.iter().enumerate() {
        let reply = transport.exchange_message(message.as_ref())?;
        let progress = BatchProgress {
            sent: i + 1,
            total,
            reply: Some(reply),
        };
        if let ControlFlow::Break(()) = on_progress(progress) {
            return Ok(BatchResult { sent: i + 1, total });
        }
    }
    Ok(BatchResult { sent: total, total })
}
