//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. IDs are grouped by family: `HL711xx` message
//! structure, `HL713xx` field locations, `HL720xx` required-field checks,
//! `HL721xx` schema coverage.

/// Input contains no segment-shaped lines (3-char name + field delimiter).
pub const NO_SEGMENTS: &str = "HL71101";
/// No MSH/BHS/FHS header found; default delimiters were applied.
pub const MISSING_HEADER: &str = "HL71102";
/// MSH header present but too short to carry delimiters or addressing fields.
pub const MALFORMED_HEADER: &str = "HL71103";

/// A field location string does not match the `SEG-N` grammar.
pub const INVALID_LOCATION: &str = "HL71301";
/// A valid field location matched nothing in the message.
pub const LOCATION_NOT_FOUND: &str = "HL71302";

/// A field the schema marks required is absent (segment line too short).
pub const REQUIRED_FIELD_MISSING: &str = "HL72001";
/// A field the schema marks required is present but empty.
pub const REQUIRED_FIELD_EMPTY: &str = "HL72002";

/// A segment name is not in the schema (Z-segment); checks skipped it.
pub const UNKNOWN_SEGMENT: &str = "HL72101";

/// Human-readable explanations, keyed by diagnostic ID.
pub(crate) const EXPLANATIONS: &[(&str, &str)] = &[
    (
        NO_SEGMENTS,
        "The input did not contain any line starting with a three-character \
         segment name followed by the field delimiter. HL7 v2 messages are \
         made of such segment lines (e.g. `MSH|...`, `PID|...`).",
    ),
    (
        MISSING_HEADER,
        "No MSH, BHS, or FHS header segment was found, so the standard \
         delimiter set `|^~\\&` was assumed. Messages that use custom \
         delimiters cannot be decoded without their header.",
    ),
    (
        MALFORMED_HEADER,
        "An MSH header was found but it is too short: delimiter extraction \
         needs at least 8 characters, and acknowledgment generation needs at \
         least 12 delimited fields (through MSH-12, the version ID). No ACK \
         is produced for such a message.",
    ),
    (
        INVALID_LOCATION,
        "Field locations take the form `SEG-N` or `SEG-N.M`: a \
         three-character segment name, a dash, and a 1-based field number \
         (optionally a component number). Field number 0 is not valid.",
    ),
    (
        LOCATION_NOT_FOUND,
        "The location is syntactically valid but no segment in the current \
         message carries a value at that position.",
    ),
    (
        REQUIRED_FIELD_MISSING,
        "The schema marks this field as required (optionality code 2), but \
         the segment line ends before the field's position.",
    ),
    (
        REQUIRED_FIELD_EMPTY,
        "The schema marks this field as required (optionality code 2), but \
         its value in the message is the empty string.",
    ),
    (
        UNKNOWN_SEGMENT,
        "The segment name is not defined in the active schema version. \
         Custom (Z) segments are parsed structurally but carry no field \
         definitions, so required-field checks skip them.",
    ),
];
