//! HL7 v2.x schema tables.
//!
//! Defines the data structures for HL7 segment and data type metadata:
//! per-segment ordered field definitions (description, data type,
//! optionality) and per-data-type ordered subfield descriptions. Tables are
//! deserialized from version-keyed JSON schema files and consumed by the
//! tokenizer, the required-field checker, and the field search.
//!
//! Lookups never fail: a segment, field, or data type that is absent from
//! the tables is reported as `None` so that custom ("Z") segments degrade
//! gracefully instead of aborting a transform.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded compact schema covering the common segments and data types.
/// The definitions in it are stable across HL7 versions 2.1–2.9.
const BUILTIN_JSON: &str = include_str!("../data/base.json");

// ─── Version ────────────────────────────────────────────────────────────────

/// A supported HL7 v2.x schema version.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// HL7 v2.1
    #[serde(rename = "2.1")]
    V2_1,
    /// HL7 v2.2
    #[serde(rename = "2.2")]
    V2_2,
    /// HL7 v2.3
    #[serde(rename = "2.3")]
    V2_3,
    /// HL7 v2.4
    #[serde(rename = "2.4")]
    V2_4,
    /// HL7 v2.5 (the most widely deployed revision; the default).
    #[default]
    #[serde(rename = "2.5")]
    V2_5,
    /// HL7 v2.6
    #[serde(rename = "2.6")]
    V2_6,
    /// HL7 v2.7
    #[serde(rename = "2.7")]
    V2_7,
    /// HL7 v2.8
    #[serde(rename = "2.8")]
    V2_8,
    /// HL7 v2.9
    #[serde(rename = "2.9")]
    V2_9,
}

impl SchemaVersion {
    /// All supported versions, oldest first.
    ///
    /// This is the **single source of truth** for the supported version set;
    /// `FromStr` and `Display` are defined against it.
    pub const ALL: &[Self] = &[
        Self::V2_1,
        Self::V2_2,
        Self::V2_3,
        Self::V2_4,
        Self::V2_5,
        Self::V2_6,
        Self::V2_7,
        Self::V2_8,
        Self::V2_9,
    ];

    /// The dotted version string (e.g., `"2.5"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V2_1 => "2.1",
            SchemaVersion::V2_2 => "2.2",
            SchemaVersion::V2_3 => "2.3",
            SchemaVersion::V2_4 => "2.4",
            SchemaVersion::V2_5 => "2.5",
            SchemaVersion::V2_6 => "2.6",
            SchemaVersion::V2_7 => "2.7",
            SchemaVersion::V2_8 => "2.8",
            SchemaVersion::V2_9 => "2.9",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVersion(s.to_string()))
    }
}

/// Error returned when a version string is not one of the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVersion(pub String);

impl std::fmt::Display for UnknownVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported HL7 version: {:?} (supported: 2.1–2.9)", self.0)
    }
}

impl std::error::Error for UnknownVersion {}

// ─── Optionality ────────────────────────────────────────────────────────────

/// Field optionality, from the numeric `opt` code in the schema files.
///
/// Code `2` marks a required field; that is the only code the
/// required-field checker acts on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "u8", into = "u8")]
pub enum Optionality {
    /// Optional (code 1).
    Optional,
    /// Required (code 2).
    Required,
    /// Conditional on other content (code 3).
    Conditional,
    /// Retained for backward compatibility only (code 4).
    BackwardCompatible,
    /// Any other code found in a schema file, passed through untouched.
    Other(u8),
}

impl From<u8> for Optionality {
    fn from(code: u8) -> Self {
        match code {
            1 => Optionality::Optional,
            2 => Optionality::Required,
            3 => Optionality::Conditional,
            4 => Optionality::BackwardCompatible,
            n => Optionality::Other(n),
        }
    }
}

impl From<Optionality> for u8 {
    fn from(opt: Optionality) -> u8 {
        match opt {
            Optionality::Optional => 1,
            Optionality::Required => 2,
            Optionality::Conditional => 3,
            Optionality::BackwardCompatible => 4,
            Optionality::Other(n) => n,
        }
    }
}

impl Default for Optionality {
    fn default() -> Self {
        Optionality::Optional
    }
}

// ─── Definitions ────────────────────────────────────────────────────────────

/// Definition of a single field within a segment.
///
/// Field definitions are ordered: index 0 of [`SegmentDef::fields`]
/// describes field 1 of the segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDef {
    /// Human-readable field description (e.g., `"Patient Name"`).
    pub desc: String,
    /// Data type code (e.g., `"XPN"`), keying into the data type tables.
    #[serde(default)]
    pub datatype: String,
    /// Optionality code. `Required` fields are flagged by the checker.
    #[serde(default)]
    pub opt: Optionality,
}

/// Definition of a segment: description plus ordered field definitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentDef {
    /// Human-readable segment description (e.g., `"Patient Identification"`).
    pub desc: String,
    /// Ordered field definitions; index 0 is field 1.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Description of one component (subfield) of a composite data type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubfieldDef {
    /// Human-readable component description (e.g., `"Family Name"`).
    pub desc: String,
}

/// Definition of a composite data type: ordered component descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataTypeDef {
    /// Optional human-readable data type description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Ordered component descriptions; index 0 is component 1.
    #[serde(default)]
    pub subfields: Vec<SubfieldDef>,
}

// ─── Tables ─────────────────────────────────────────────────────────────────

/// The full schema table set for one HL7 version.
///
/// Deserialized from a JSON schema file with the wire shape
/// `{ "version": "2.x", "segments": { NAME: {...} }, "fields": { TYPE: {...} } }`
/// (`"fields"` is the conventional key for the data type tables in HL7
/// schema files; it maps to [`SchemaTables::data_types`] here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaTables {
    /// Which HL7 version these tables describe.
    #[serde(default)]
    pub version: SchemaVersion,
    /// Segment definitions keyed by upper-case segment name.
    pub segments: HashMap<String, SegmentDef>,
    /// Data type definitions keyed by upper-case data type code.
    #[serde(rename = "fields", default)]
    pub data_types: HashMap<String, DataTypeDef>,
}

impl SchemaTables {
    /// Deserialize tables from a JSON schema file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The embedded compact tables, tagged with the given version.
    ///
    /// Covers the segments and data types common to every revision from 2.1
    /// through 2.9; full per-version schema files can be supplied externally
    /// via [`SchemaTables::from_json`].
    pub fn builtin(version: SchemaVersion) -> Self {
        use std::sync::OnceLock;
        static BASE: OnceLock<SchemaTables> = OnceLock::new();
        let base = BASE.get_or_init(|| {
            SchemaTables::from_json(BUILTIN_JSON).expect("embedded schema JSON is well-formed")
        });
        let mut tables = base.clone();
        tables.version = version;
        tables
    }

    /// Look up a segment definition by name (case-insensitive).
    pub fn segment(&self, name: &str) -> Option<&SegmentDef> {
        self.segments.get(&name.to_ascii_uppercase())
    }

    /// Look up a field definition by segment name and 0-based field index.
    pub fn field(&self, segment: &str, index: usize) -> Option<&FieldDef> {
        self.segment(segment).and_then(|s| s.fields.get(index))
    }

    /// The description of a field, by segment name and 0-based field index.
    pub fn field_description(&self, segment: &str, index: usize) -> Option<&str> {
        self.field(segment, index).map(|f| f.desc.as_str())
    }

    /// Look up a data type definition by code (case-insensitive).
    pub fn data_type(&self, code: &str) -> Option<&DataTypeDef> {
        self.data_types.get(&code.to_ascii_uppercase())
    }

    /// The description of a component, by data type code and 0-based
    /// component index.
    pub fn subfield_description(&self, datatype: &str, index: usize) -> Option<&str> {
        self.data_type(datatype)
            .and_then(|d| d.subfields.get(index))
            .map(|s| s.desc.as_str())
    }

    /// Iterate over a segment's required fields as `(field_number, def)`
    /// pairs. Field numbers are 1-based. Empty for unknown segments.
    pub fn required_fields<'a>(
        &'a self,
        segment: &str,
    ) -> impl Iterator<Item = (u32, &'a FieldDef)> + 'a {
        self.segment(segment)
            .map(|s| s.fields.as_slice())
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter(|(_, f)| f.opt == Optionality::Required)
            .map(|(i, f)| (i as u32 + 1, f))
    }
}
