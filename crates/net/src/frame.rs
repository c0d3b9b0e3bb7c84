//! MLLP frame parser -- byte-level state machine for HL7 message framing.
//!
//! MLLP (Minimal Lower Layer Protocol) wraps each HL7 message between a
//! start byte VT (0x0B) and the end pair FS (0x1C) CR (0x0D).
//!
//! Messages can split across TCP segments, so this parser operates
//! byte-by-byte and handles partial reads correctly. Bytes between frames
//! (stray CR/LF, keepalive garbage) are skipped while waiting for a start
//! byte.

use std::io::BufRead;
use std::time::{Duration, Instant};

use crate::NetError;

/// MLLP start-of-message byte (ASCII Vertical Tab).
pub const VT: u8 = 0x0B;
/// First byte of the MLLP end-of-message pair (ASCII File Separator).
pub const FS: u8 = 0x1C;
/// Second byte of the MLLP end-of-message pair (ASCII Carriage Return).
pub const CR: u8 = 0x0D;

/// Default maximum message size (1 MiB). Typical HL7 messages are a few KB;
/// this guard prevents runaway reads from a misbehaving peer.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Internal state of the frame parser.
enum FrameState {
    /// Waiting for a VT byte; skip any garbage between frames.
    WaitingForStart,
    /// Inside a message -- collecting bytes until FS.
    ReadingMessage,
    /// Saw FS -- the next byte decides whether the frame really ended.
    AwaitingCr,
}

/// Read one MLLP-framed message from a buffered stream.
///
/// # Arguments
///
/// * `stream` -- Any `BufRead` source (a `BufReader<TcpStream>`, a test
///   cursor, etc.). Buffering matters: only the bytes of this frame are
///   consumed, so a pipelined second message in the same TCP segment stays
///   in the buffer for the next call.
/// * `timeout` -- Maximum wall-clock time to wait for the complete frame
/// * `max_size` -- Maximum message bytes (guard against runaway reads)
///
/// # Returns
///
/// The message payload (bytes between VT and FS CR, exclusive). A stray FS
/// not followed by CR is treated as message data, per the protocol's
/// tolerance for non-conformant senders.
pub fn read_message(
    stream: &mut impl BufRead,
    timeout: Duration,
    max_size: usize,
) -> Result<Vec<u8>, NetError> {
    let now = Instant::now();
    let deadline = now
        .checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86400));
    let mut message: Vec<u8> = Vec::with_capacity(1024);
    let mut state = FrameState::WaitingForStart;

    loop {
        // Check timeout before each read
        if Instant::now() >= deadline {
            return Err(NetError::ReadTimeout);
        }

        let buf = match stream.fill_buf() {
            Ok([]) => return Err(NetError::ConnectionClosed),
            Ok(buf) => buf,
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                if Instant::now() >= deadline {
                    return Err(NetError::ReadTimeout);
                }
                std::thread::sleep(Duration::from_millis(1));
                continue;
            }
            Err(e) => return Err(NetError::ReadFailed(e)),
        };

        let mut used = 0;
        let mut complete = false;
        for &byte in buf {
            used += 1;
            match (&state, byte) {
                (FrameState::WaitingForStart, VT) => {
                    message.clear();
                    state = FrameState::ReadingMessage;
                }
                (FrameState::WaitingForStart, _) => {
                    // Skip CR, LF, and any garbage between frames
                }
                (FrameState::ReadingMessage, FS) => {
                    state = FrameState::AwaitingCr;
                }
                (FrameState::ReadingMessage, _) => {
                    if message.len() >= max_size {
                        return Err(NetError::MessageTooLarge {
                            size: message.len() + 1,
                            max: max_size,
                        });
                    }
                    message.push(byte);
                }
                (FrameState::AwaitingCr, CR) => {
                    complete = true;
                    break;
                }
                (FrameState::AwaitingCr, other) => {
                    // FS without CR: not a frame end after all. Keep the FS
                    // as data and reprocess the byte in message mode.
                    message.push(FS);
                    if other == FS {
                        // Another FS: stay in AwaitingCr for this one.
                    } else {
                        message.push(other);
                        state = FrameState::ReadingMessage;
                    }
                }
            }
        }
        stream.consume(used);
        if complete {
            return Ok(message);
        }
    }
}

/// Wrap a message in MLLP framing (VT ... FS CR).
pub fn frame_message(message: &str) -> Vec<u8> {
    let mut framed = Vec::with_capacity(message.len() + 3);
    framed.push(VT);
    framed.extend_from_slice(message.as_bytes());
    framed.push(FS);
    framed.push(CR);
    framed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(data: &[u8]) -> Result<Vec<u8>, NetError> {
        let mut cursor = Cursor::new(data.to_vec());
        read_message(&mut cursor, Duration::from_secs(1), DEFAULT_MAX_MESSAGE_SIZE)
    }

    #[test]
    fn test_single_message() {
        let mut data = vec![VT];
        data.extend_from_slice(b"MSH|^~\\&|APP");
        data.extend_from_slice(&[FS, CR]);
        assert_eq!(read(&data).unwrap(), b"MSH|^~\\&|APP");
    }

    #[test]
    fn test_round_trip_with_frame_message() {
        let framed = frame_message("MSH|^~\\&|APP\rPID|1");
        assert_eq!(read(&framed).unwrap(), b"MSH|^~\\&|APP\rPID|1");
    }

    #[test]
    fn test_garbage_before_start_is_skipped() {
        let mut data = b"\r\n\r\n".to_vec();
        data.push(VT);
        data.extend_from_slice(b"data");
        data.extend_from_slice(&[FS, CR]);
        assert_eq!(read(&data).unwrap(), b"data");
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(read(&[VT, FS, CR]).unwrap(), b"");
    }

    #[test]
    fn test_empty_input_is_connection_closed() {
        assert!(matches!(read(&[]), Err(NetError::ConnectionClosed)));
    }

    #[test]
    fn test_connection_closed_mid_message() {
        let mut data = vec![VT];
        data.extend_from_slice(b"partial");
        assert!(matches!(read(&data), Err(NetError::ConnectionClosed)));
    }

    #[test]
    fn test_fs_without_cr_is_data() {
        let mut data = vec![VT];
        data.extend_from_slice(b"ab");
        data.push(FS);
        data.extend_from_slice(b"cd");
        data.extend_from_slice(&[FS, CR]);
        let message = read(&data).unwrap();
        assert_eq!(message, [b'a', b'b', FS, b'c', b'd']);
    }

    #[test]
    fn test_message_too_large() {
        let mut data = vec![VT];
        data.extend(vec![b'X'; 2000]);
        data.extend_from_slice(&[FS, CR]);
        let mut cursor = Cursor::new(data);
        let result = read_message(&mut cursor, Duration::from_secs(1), 1024);
        match result.unwrap_err() {
            NetError::MessageTooLarge { max, .. } => assert_eq!(max, 1024),
            other => panic!("expected MessageTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_message_at_exact_max_size() {
        let mut data = vec![VT];
        data.extend(vec![b'X'; 1024]);
        data.extend_from_slice(&[FS, CR]);
        let mut cursor = Cursor::new(data);
        let message = read_message(&mut cursor, Duration::from_secs(1), 1024).unwrap();
        assert_eq!(message.len(), 1024);
    }

    #[test]
    fn test_back_to_back_messages_read_one_at_a_time() {
        let mut data = Vec::new();
        data.extend_from_slice(&[VT, b'A', FS, CR]);
        data.extend_from_slice(&[VT, b'B', FS, CR]);
        let mut cursor = Cursor::new(data);
        let first =
            read_message(&mut cursor, Duration::from_secs(1), DEFAULT_MAX_MESSAGE_SIZE).unwrap();
        assert_eq!(first, b"A");
        let second =
            read_message(&mut cursor, Duration::from_secs(1), DEFAULT_MAX_MESSAGE_SIZE).unwrap();
        assert_eq!(second, b"B");
    }

    #[test]
    fn test_garbage_only_no_start() {
        assert!(matches!(
            read(&[0x0D, 0x0A, b'x', b'y']),
            Err(NetError::ConnectionClosed)
        ));
    }
}
