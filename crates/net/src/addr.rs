//! HL7 interface address resolution.
//!
//! Handles the various formats users pass as interface addresses:
//! `IP`, `IP:PORT`, `hostname`, `hostname:PORT`. Defaults to port 2575,
//! the IANA-registered HL7 MLLP port.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::NetError;

/// Default HL7 MLLP port (IANA `hl7` registration).
pub const DEFAULT_PORT: u16 = 2575;

/// Resolve a user-provided interface address string to a `SocketAddr`.
///
/// Accepts these formats:
/// - `192.168.1.55:2575` -- IP with explicit port
/// - `192.168.1.55` -- IP without port (defaults to 2575)
/// - `interface01.local:2575` -- hostname with port
/// - `interface01.local` -- hostname without port (defaults to 2575)
///
/// Returns the first resolved address. For hostnames that resolve to
/// multiple addresses (dual-stack), the first result is used.
pub fn resolve_hl7_addr(input: &str) -> Result<SocketAddr, NetError> {
    // 1. Try as SocketAddr (e.g., "192.168.1.55:2575" or "[::1]:2575")
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // 2. Try as bare IP without port (e.g., "192.168.1.55")
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    // 3. Try as host:port (e.g., "interface01.local:2575")
    if let Ok(mut addrs) = input.to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    // 4. Try as hostname without port (e.g., "interface01.local")
    if let Ok(mut addrs) = (input, DEFAULT_PORT).to_socket_addrs()
        && let Some(addr) = addrs.next()
    {
        return Ok(addr);
    }

    // At this point the input is not a valid IP (steps 1-2 failed) and DNS
    // resolution found no addresses (steps 3-4 failed).
    Err(NetError::NoAddressFound(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_with_port() {
        let addr = resolve_hl7_addr("192.168.1.55:2575").unwrap();
        assert_eq!(addr.ip().to_string(), "192.168.1.55");
        assert_eq!(addr.port(), 2575);
    }

    #[test]
    fn ip_with_custom_port() {
        let addr = resolve_hl7_addr("10.0.0.1:6661").unwrap();
        assert_eq!(addr.port(), 6661);
    }

    #[test]
    fn ip_without_port_defaults_to_hl7() {
        let addr = resolve_hl7_addr("192.168.1.55").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn ipv6_with_and_without_port() {
        assert_eq!(resolve_hl7_addr("[::1]:2575").unwrap().port(), 2575);
        assert_eq!(resolve_hl7_addr("::1").unwrap().port(), DEFAULT_PORT);
    }

    #[test]
    fn localhost_resolves() {
        assert!(resolve_hl7_addr("localhost:2575").unwrap().ip().is_loopback());
        assert_eq!(resolve_hl7_addr("localhost").unwrap().port(), DEFAULT_PORT);
    }

    #[test]
    fn unresolvable_hostname() {
        match resolve_hl7_addr("no-such-host.invalid") {
            Err(NetError::NoAddressFound(s)) => assert_eq!(s, "no-such-host.invalid"),
            other => panic!("expected NoAddressFound, got {:?}", other),
        }
    }
}
