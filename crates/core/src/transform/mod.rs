//! Structural transforms over whole messages.
//!
//! Each transform is a pure function over message text plus the resolved
//! delimiter set and schema tables; none of them hold state across calls,
//! and none of them error on malformed HL7 content — failure modes resolve
//! to sentinels or empty results.

/// Required-field checking against schema optionality.
pub mod check;
/// Field search and extraction by location or description.
pub mod find;
/// Identifier masking for PID/NK1/IN1/IN2/GT1 segments.
pub mod mask;
/// Batch splitting and linebreak normalization.
pub mod split;
/// Indented tree rendering of decomposed segments.
pub mod tree;
