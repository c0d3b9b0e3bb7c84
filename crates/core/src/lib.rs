//! HL7 toolchain core library.
//!
//! Provides delimiter-aware parsing of HL7 v2.x pipe-delimited messages into
//! a segment/field/component model, schema-driven field naming, and the
//! structural transforms built on top: identifier masking, tree display,
//! required-field checking, batch splitting, linebreak normalization, field
//! search, and acknowledgment (ACK) generation.
//!
//! The main entry points are [`Delimiters::from_message`] for delimiter
//! resolution, [`Segment::parse`] for tokenization, and the functions in
//! [`transform`] and [`ack`] for the individual operations.

#![warn(missing_docs)]

/// ACK (acknowledgment) message construction.
pub mod ack;
/// HL7 delimiter set resolution from message headers.
pub mod delim;
/// Line enumeration over `\r`/`\n`/`\r\n`-separated message text.
pub mod document;
/// JSON serialization helpers for the segment model.
pub mod dump;
/// Field location grammar (`SEG-N`) and description search.
pub mod location;
/// Segment/field/component model and tokenizer.
pub mod segment;
/// Structural transforms over whole messages.
pub mod transform;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Delimiters
pub use delim::Delimiters;

// Model
pub use segment::{Component, Field, FieldItem, Segment};

// Locations
pub use location::{FieldQuery, Location, find_locations, is_item_location_valid};

// Transforms
pub use transform::check::{CheckResult, MissingField, check_required_fields};
pub use transform::find::{FieldOccurrence, FindResult, find_fields};
pub use transform::mask::{MaskOptions, mask_component, mask_field, mask_message};
pub use transform::split::{add_segment_linebreaks, normalize_line_endings, split_batch};
pub use transform::tree::{render_message, render_segment};

// ACK
pub use ack::{AckCode, AckOptions, build_ack, generate_ack};

// Diagnostics (re-exported from the diagnostics crate)
pub use hl7_toolchain_diagnostics::{Diagnostic, LineIndex, Severity, Span, codes};

// Serialization helpers
pub use dump::to_pretty_json;
