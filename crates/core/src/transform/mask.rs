//! Identifier masking.
//!
//! Replaces patient-identifying content with a mask character while keeping
//! message structure intact: delimiters survive untouched, only word
//! characters inside values are replaced. Which fields are masked is fixed
//! per segment kind (below); everything else passes through unmodified, and
//! out-of-range indices are skipped or returned unchanged — data
//! preservation wins over strict validation.

use crate::delim::Delimiters;
use crate::document;

/// PID fields masked in full (field 3 is handled separately: every repeat
/// after the first is masked, the first patient ID is preserved).
const PID_MASKED_FIELDS: &[usize] = &[
    4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 19, 20, 21, 22, 23, 26, 27, 28,
];

/// NK1 fields masked in full.
const NK1_MASKED_FIELDS: &[usize] = &[
    2, 4, 5, 6, 7, 10, 11, 12, 13, 14, 15, 16, 19, 20, 25, 26, 27, 28, 29, 30, 31, 32, 33, 35, 37,
    38,
];

/// Options for the masking transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    /// The character every masked word character is replaced with.
    pub mask_char: char,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self { mask_char: '*' }
    }
}

/// Replace every word character (alphanumeric or `_`) with the mask char.
fn mask_word_chars(value: &str, mask: char) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { mask } else { c })
        .collect()
}

/// Mask the components of a single field value.
///
/// With no component index, every component is masked. With a 1-based index
/// in range, only that component is masked. An out-of-range index returns
/// the value unmodified.
pub fn mask_component(
    value: &str,
    delims: &Delimiters,
    component: Option<usize>,
    opts: &MaskOptions,
) -> String {
    let separator = delims.component.to_string();
    let parts: Vec<&str> = value.split(delims.component).collect();
    match component {
        None => parts
            .iter()
            .map(|p| mask_word_chars(p, opts.mask_char))
            .collect::<Vec<_>>()
            .join(&separator),
        Some(n) if n >= 1 && n <= parts.len() => {
            let mut out: Vec<String> = parts.iter().map(|p| (*p).to_string()).collect();
            out[n - 1] = mask_word_chars(parts[n - 1], opts.mask_char);
            out.join(&separator)
        }
        Some(_) => value.to_string(),
    }
}

/// Mask a field value, applying [`mask_component`] to every repeat
/// instance independently.
pub fn mask_field(
    value: &str,
    delims: &Delimiters,
    component: Option<usize>,
    opts: &MaskOptions,
) -> String {
    let separator = delims.repeat.to_string();
    value
        .split(delims.repeat)
        .map(|repeat| mask_component(repeat, delims, component, opts))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Mask identifying fields across a whole message.
///
/// `PID`: all repeats of the patient-ID field (3) except the first, then
/// the fixed field list above. `NK1`: its fixed field list. `IN1`, `IN2`,
/// `GT1`: every field from 2 onward. Other segments pass through. Field
/// indices beyond a line's actual field count are skipped. The output is
/// reassembled with `\r` line terminators regardless of the input's
/// line-ending style.
pub fn mask_message(text: &str, delims: &Delimiters, opts: &MaskOptions) -> String {
    let field_separator = delims.field.to_string();
    let mut lines: Vec<String> = Vec::new();

    for (_, line) in document::lines(text) {
        let Some(name) = document::segment_name(line, delims) else {
            lines.push(line.to_string());
            continue;
        };
        let mut tokens: Vec<String> = line.split(delims.field).map(str::to_string).collect();
        match name.to_ascii_uppercase().as_str() {
            "PID" => {
                if let Some(patient_ids) = tokens.get_mut(3) {
                    *patient_ids = mask_repeats_after_first(patient_ids, delims, opts);
                }
                mask_indices(&mut tokens, PID_MASKED_FIELDS, delims, opts);
            }
            "NK1" => mask_indices(&mut tokens, NK1_MASKED_FIELDS, delims, opts),
            "IN1" | "IN2" | "GT1" => {
                for token in tokens.iter_mut().skip(2) {
                    *token = mask_field(token, delims, None, opts);
                }
            }
            _ => {}
        }
        lines.push(tokens.join(&field_separator));
    }

    lines.join("\r")
}

/// Mask every repeat of a field value except the first.
fn mask_repeats_after_first(value: &str, delims: &Delimiters, opts: &MaskOptions) -> String {
    let separator = delims.repeat.to_string();
    value
        .split(delims.repeat)
        .enumerate()
        .map(|(i, repeat)| {
            if i == 0 {
                repeat.to_string()
            } else {
                mask_component(repeat, delims, None, opts)
            }
        })
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Mask the listed field indices of a split line, skipping any beyond the
/// line's actual field count.
fn mask_indices(
    tokens: &mut [String],
    indices: &[usize],
    delims: &Delimiters,
    opts: &MaskOptions,
) {
    for &index in indices {
        if let Some(token) = tokens.get_mut(index) {
            *token = mask_field(token, delims, None, opts);
        }
    }
}
