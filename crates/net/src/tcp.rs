//! TCP transport for MLLP-framed HL7 messages.
//!
//! Provides [`MllpClient`], a synchronous TCP sender that implements both
//! [`Transport`] (send messages) and [`Exchange`] (send and await the ACK
//! reply), and [`MllpListener`], a serial accept loop that reads framed
//! messages and replies with whatever the handler returns.

use std::io::{self, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};

use socket2::{SockRef, TcpKeepalive};

use crate::addr::resolve_hl7_addr;
use crate::frame::{frame_message, read_message};
use crate::{Exchange, NetConfig, NetError, Transport};

/// A synchronous TCP connection to an HL7 interface.
///
/// Connects to the interface's MLLP port (typically 2575) and sends framed
/// messages. Supports bidirectional exchange for awaiting ACK replies.
///
/// Reads go through a `BufReader` so that a reply pipelined behind another
/// in one TCP segment is not lost between exchanges; writes use the
/// underlying stream directly.
pub struct MllpClient {
    reader: BufReader<TcpStream>,
    config: NetConfig,
    addr: SocketAddr,
}

impl MllpClient {
    /// Connect to an interface at the given address.
    ///
    /// The address can be any format accepted by [`resolve_hl7_addr`]:
    /// `IP`, `IP:PORT`, `hostname`, `hostname:PORT`. Port defaults to 2575.
    ///
    /// Configures the socket with TCP_NODELAY, TCP keepalive (60s interval),
    /// and the write/read timeouts from [`NetConfig`].
    pub fn connect(addr: &str, config: NetConfig) -> Result<Self, NetError> {
        let socket_addr = resolve_hl7_addr(addr)?;
        let stream = open_stream(&socket_addr, &config)?;
        Ok(Self {
            reader: BufReader::new(stream),
            config,
            addr: socket_addr,
        })
    }

    /// Re-establish the TCP connection after a drop or error.
    ///
    /// Shuts down the old stream (ignoring errors) and opens a fresh
    /// connection to the same address with the same configuration. Any
    /// unread buffered bytes from the old connection are discarded.
    pub fn reconnect(&mut self) -> Result<(), NetError> {
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
        self.reader = BufReader::new(open_stream(&self.addr, &self.config)?);
        Ok(())
    }

    /// Return the resolved socket address this client is connected to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Transport for MllpClient {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), NetError> {
        let stream = self.reader.get_mut();
        stream.write_all(data).map_err(NetError::WriteFailed)?;
        stream.flush().map_err(NetError::WriteFailed)?;
        Ok(())
    }
}

impl Exchange for MllpClient {
    fn exchange_raw(&mut self, data: &[u8]) -> Result<Vec<u8>, NetError> {
        self.send_raw(data)?;
        read_message(
            &mut self.reader,
            self.config.timeouts.read,
            self.config.max_message_size.0,
        )
    }
}

impl Drop for MllpClient {
    fn drop(&mut self) {
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
    }
}

impl crate::Reconnectable for MllpClient {
    fn reconnect(&mut self) -> Result<(), NetError> {
        MllpClient::reconnect(self)
    }
}

// ── Listener ────────────────────────────────────────────────────────────

/// A synchronous MLLP listener serving one connection at a time.
///
/// Each framed message read from a connection is handed to the handler; a
/// `Some` return is framed and written back as the reply, `None` sends
/// nothing (the caller decided the message deserves no ACK).
pub struct MllpListener {
    listener: TcpListener,
    config: NetConfig,
}

impl MllpListener {
    /// Bind a listener at the given address (same formats as
    /// [`MllpClient::connect`]).
    pub fn bind(addr: &str, config: NetConfig) -> Result<Self, NetError> {
        let socket_addr = resolve_hl7_addr(addr)?;
        let listener = TcpListener::bind(socket_addr).map_err(|e| NetError::ConnectionFailed {
            addr: socket_addr.to_string(),
            source: e,
        })?;
        Ok(Self { listener, config })
    }

    /// The locally bound address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
        self.listener.local_addr().map_err(NetError::ReadFailed)
    }

    /// Accept a single connection and serve it until the peer disconnects.
    pub fn serve_next<F>(&self, mut handler: F) -> Result<(), NetError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let (stream, peer) = self
            .listener
            .accept()
            .map_err(NetError::ReadFailed)?;
        log::info!("connection from {peer}");
        let result = self.serve_connection(stream, &mut handler);
        log::info!("connection from {peer} closed");
        result
    }

    /// Serve connections forever, one at a time. Per-connection errors are
    /// logged and the loop continues; only accept failures are returned.
    pub fn run<F>(&self, mut handler: F) -> Result<(), NetError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .map_err(NetError::ReadFailed)?;
            log::info!("connection from {peer}");
            match self.serve_connection(stream, &mut handler) {
                Ok(()) => log::info!("connection from {peer} closed"),
                Err(e) => log::warn!("connection from {peer} failed: {e}"),
            }
        }
    }

    fn serve_connection<F>(&self, stream: TcpStream, handler: &mut F) -> Result<(), NetError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        configure_stream(&stream, &self.config).map_err(NetError::ReadFailed)?;
        let mut reader = BufReader::new(stream);
        loop {
            let message = match read_message(
                &mut reader,
                self.config.timeouts.read,
                self.config.max_message_size.0,
            ) {
                Ok(bytes) => bytes,
                // Peer done sending: a clean end of the session.
                Err(NetError::ConnectionClosed) => return Ok(()),
                // Idle connection: keep waiting for the next frame.
                Err(NetError::ReadTimeout) => continue,
                Err(e) => return Err(e),
            };
            let text = String::from_utf8_lossy(&message).into_owned();
            log::debug!("received {} bytes", message.len());
            if let Some(reply) = handler(&text) {
                let stream = reader.get_mut();
                stream
                    .write_all(&frame_message(&reply))
                    .map_err(NetError::WriteFailed)?;
                stream.flush().map_err(NetError::WriteFailed)?;
            }
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Open a TCP connection and configure the stream (nodelay, keepalive,
/// timeouts).
fn open_stream(addr: &SocketAddr, config: &NetConfig) -> Result<TcpStream, NetError> {
    let stream = TcpStream::connect_timeout(addr, config.timeouts.connect).map_err(|e| {
        match e.kind() {
            io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused {
                addr: addr.to_string(),
                source: e,
            },
            io::ErrorKind::TimedOut => NetError::ConnectionTimeout {
                addr: addr.to_string(),
                timeout: config.timeouts.connect,
                source: e,
            },
            _ => NetError::ConnectionFailed {
                addr: addr.to_string(),
                source: e,
            },
        }
    })?;

    configure_stream(&stream, config).map_err(|e| NetError::ConnectionFailed {
        addr: addr.to_string(),
        source: e,
    })?;
    Ok(stream)
}

/// Configure TCP_NODELAY, keepalive, and read/write timeouts on a stream.
fn configure_stream(stream: &TcpStream, config: &NetConfig) -> Result<(), io::Error> {
    // TCP_NODELAY -- disable Nagle's algorithm for low-latency sends
    stream.set_nodelay(true)?;

    // TCP keepalive via socket2 (60 second interval)
    let keepalive = TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;

    // Read timeout drives the 1ms-sleep polling loop in the frame reader;
    // the wall-clock deadline there is what actually bounds a read.
    stream.set_read_timeout(Some(std::time::Duration::from_millis(50)))?;
    stream.set_write_timeout(Some(config.timeouts.write))?;
    Ok(())
}
