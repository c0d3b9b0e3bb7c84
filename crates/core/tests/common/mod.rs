//! Shared test helpers for `hl7_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::LazyLock;

use hl7_toolchain_schema::{SchemaTables, SchemaVersion};

/// Builtin tables loaded once per test binary via LazyLock.
#[allow(dead_code)]
pub static TABLES: LazyLock<SchemaTables> =
    LazyLock::new(|| SchemaTables::builtin(SchemaVersion::V2_5));

/// A small, well-formed ADT^A01 message with `\r` segment breaks.
#[allow(dead_code)]
pub const SAMPLE_ADT: &str = "MSH|^~\\&|SENDAPP|SENDFAC|RECVAPP|RECVFAC|20240102030405||ADT^A01|MSG00001|P|2.5\r\
EVN|A01|20240102030405\r\
PID|1||123456~789012^^^MRN||DOE^JOHN^A||19800101|M\r\
PV1|1|I|ICU^2^1";
