//! Segment/field/component model and tokenizer.
//!
//! One [`Segment`] is the in-memory decomposition of a single message line:
//! ordered fields, each an ordered list of repeat instances ([`FieldItem`]s),
//! each either a scalar value or an ordered list of [`Component`]s. Names are
//! resolved against the schema tables; anything the schema does not know is
//! represented (`"undefined"`, `"Custom Segment"`), never reported as an
//! error, so vendor Z-segments decompose like any other line.
//!
//! Models are built fresh from a line on each request and never persisted.

use serde::{Deserialize, Serialize};

use hl7_toolchain_schema::SchemaTables;

use crate::delim::{Delimiters, is_header_segment};

/// Name used for fields and components with no schema definition.
pub const UNDEFINED_NAME: &str = "undefined";

/// Description used for segments absent from the schema (Z-segments).
pub const CUSTOM_SEGMENT_DESC: &str = "Custom Segment";

// Display-width padding: a field label is its name plus up to 12 characters
// of `SEG-N[k] ` prefix and `:` suffix; a component label carries 5 more for
// the deeper indent and branch glyph. These two constants drive the column
// alignment of the tree renderer and are part of the output contract.
const FIELD_LABEL_PAD: usize = 12;
const COMPONENT_LABEL_PAD: usize = 17;

/// The in-memory decomposition of one message line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    /// The three-character segment name (as written in the message).
    pub name: String,
    /// Schema description, or [`CUSTOM_SEGMENT_DESC`] for unknown segments.
    pub description: String,
    /// Ordered fields. Index 0 is field 1; for MSH/BHS/FHS field 1 is the
    /// field delimiter itself, re-inserted so indices align with the schema.
    pub fields: Vec<Field>,
    /// Largest label width across contained fields, for aligned display.
    pub max_width: usize,
}

/// One field of a segment: an ordered list of repeat instances.
/// A non-repeating field has exactly one item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    /// The repeat instances of this field.
    pub items: Vec<FieldItem>,
    /// Largest label width across contained items.
    pub max_width: usize,
}

/// One repeat instance of a field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldItem {
    /// Schema field description, or [`UNDEFINED_NAME`].
    pub name: String,
    /// Scalar value. Used only when the item has no components.
    pub value: String,
    /// Component decomposition; empty when the repeat had no component
    /// delimiter.
    pub components: Vec<Component>,
    /// Label width of this item: `name length + 12`, or the largest
    /// `component name length + 17`, whichever is greater.
    pub max_width: usize,
}

/// A component of a field repeat: a resolved name and a scalar value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Component {
    /// Schema subfield description, or [`UNDEFINED_NAME`].
    pub name: String,
    /// The component's text value.
    pub value: String,
}

impl FieldItem {
    /// Build an item and compute its label width.
    pub fn new(name: String, value: String, components: Vec<Component>) -> Self {
        let mut max_width = name.chars().count() + FIELD_LABEL_PAD;
        for component in &components {
            max_width = max_width.max(component.name.chars().count() + COMPONENT_LABEL_PAD);
        }
        Self {
            name,
            value,
            components,
            max_width,
        }
    }
}

impl Field {
    /// Build a field from its repeat instances.
    pub fn new(items: Vec<FieldItem>) -> Self {
        let max_width = items.iter().map(|i| i.max_width).max().unwrap_or(0);
        Self { items, max_width }
    }

    /// Reassemble this field's delimited text.
    pub fn to_value(&self, delims: &Delimiters) -> String {
        let repeat = delims.repeat.to_string();
        self.items
            .iter()
            .map(|item| item.to_value(delims))
            .collect::<Vec<_>>()
            .join(&repeat)
    }
}

impl FieldItem {
    /// Reassemble this repeat's delimited text.
    pub fn to_value(&self, delims: &Delimiters) -> String {
        if self.components.is_empty() {
            self.value.clone()
        } else {
            let component = delims.component.to_string();
            self.components
                .iter()
                .map(|c| c.value.as_str())
                .collect::<Vec<_>>()
                .join(&component)
        }
    }
}

impl Segment {
    /// Decompose one message line into the field/component model.
    ///
    /// The line is split on the field delimiter (empty trailing fields are
    /// retained, so field counts stay correct). The first token is the
    /// segment name; for MSH/BHS/FHS the field delimiter itself is
    /// re-inserted as field 1 — it was consumed as the split character — so
    /// field numbers align 1:1 with the schema. Header field 2 (the encoding
    /// characters) is never split into repeats or components: its structure
    /// characters are data there, not structure.
    ///
    /// Total over its input: unknown segments, fields, and data types
    /// resolve to sentinels, never to an error.
    pub fn parse(line: &str, delims: &Delimiters, schema: &SchemaTables) -> Segment {
        let delimiter_field = delims.field.to_string();
        let mut tokens: Vec<&str> = line.split(delims.field).collect();
        let name = if tokens.is_empty() {
            String::new()
        } else {
            tokens.remove(0).to_string()
        };
        let is_header = is_header_segment(&name);
        if is_header {
            tokens.insert(0, delimiter_field.as_str());
        }

        let description = schema
            .segment(&name)
            .map(|def| def.desc.clone())
            .unwrap_or_else(|| CUSTOM_SEGMENT_DESC.to_string());

        let fields: Vec<Field> = tokens
            .iter()
            .enumerate()
            .map(|(i, &token)| build_field(&name, i, token, is_header, delims, schema))
            .collect();

        let max_width = fields.iter().map(|f| f.max_width).max().unwrap_or(0);
        Segment {
            name,
            description,
            fields,
            max_width,
        }
    }

    /// Reassemble the delimited line this model was built from.
    ///
    /// Inverse of [`Segment::parse`]: with an unmodified model and the same
    /// delimiter set, this reproduces the original line byte for byte.
    pub fn to_line(&self, delims: &Delimiters) -> String {
        let is_header = is_header_segment(&self.name);
        let mut parts: Vec<String> = Vec::with_capacity(self.fields.len() + 1);
        parts.push(self.name.clone());
        for (i, field) in self.fields.iter().enumerate() {
            // The re-inserted header field 1 is implied by the join.
            if is_header && i == 0 {
                continue;
            }
            parts.push(field.to_value(delims));
        }
        parts.join(&delims.field.to_string())
    }

    /// The field with the given 1-based field number, if present.
    pub fn field(&self, number: u32) -> Option<&Field> {
        (number >= 1)
            .then(|| self.fields.get(number as usize - 1))
            .flatten()
    }
}

/// Build one field from its token. `index` is 0-based after the header
/// correction, so field number `index + 1` for every segment kind.
fn build_field(
    segment_name: &str,
    index: usize,
    token: &str,
    is_header: bool,
    delims: &Delimiters,
    schema: &SchemaTables,
) -> Field {
    let field_name = schema
        .field_description(segment_name, index)
        .unwrap_or(UNDEFINED_NAME)
        .to_string();

    if token.is_empty() {
        return Field::new(vec![FieldItem::new(field_name, String::new(), Vec::new())]);
    }

    let datatype = schema
        .field(segment_name, index)
        .map(|f| f.datatype.as_str())
        .unwrap_or("");

    // Header field 2 carries the encoding characters; the repeat and
    // component characters inside it are data, not structure.
    let atomic = is_header && index == 1;
    let repeats: Vec<&str> = if atomic {
        vec![token]
    } else {
        token.split(delims.repeat).collect()
    };

    let items = repeats
        .into_iter()
        .map(|repeat| {
            let parts: Vec<&str> = if atomic {
                vec![repeat]
            } else {
                repeat.split(delims.component).collect()
            };
            if parts.len() > 1 {
                let components = parts
                    .iter()
                    .enumerate()
                    .map(|(ci, part)| Component {
                        name: schema
                            .subfield_description(datatype, ci)
                            .unwrap_or(UNDEFINED_NAME)
                            .to_string(),
                        value: (*part).to_string(),
                    })
                    .collect();
                FieldItem::new(field_name.clone(), String::new(), components)
            } else {
                FieldItem::new(field_name.clone(), repeat.to_string(), Vec::new())
            }
        })
        .collect();

    Field::new(items)
}
