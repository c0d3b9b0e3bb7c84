//! HL7 delimiter set resolution.
//!
//! The five structural characters of an HL7 v2 message are declared by the
//! message itself: characters 4–8 of its MSH (or BHS/FHS batch) header carry
//! the field, component, repeat, escape, and subcomponent delimiters. A
//! message without a recognizable header falls back to the standard set
//! `|^~\&` — silently, since that is the designed behavior, not an error.

use serde::{Deserialize, Serialize};

use crate::document;

/// The five delimiter characters of one HL7 message.
///
/// Resolved once per message and treated as immutable for the remainder of
/// the operation. The resolver passes through whatever characters the header
/// declares; it does not verify that the five are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    /// Field separator (standard `|`).
    pub field: char,
    /// Component separator (standard `^`).
    pub component: char,
    /// Repetition separator (standard `~`).
    pub repeat: char,
    /// Escape character (standard `\`).
    pub escape: char,
    /// Subcomponent separator (standard `&`).
    pub subcomponent: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repeat: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl Delimiters {
    /// Resolve the delimiter set declared by a message header.
    ///
    /// Scans line by line for the first MSH, BHS, or FHS segment
    /// (case-insensitive) that is long enough to carry delimiters, and reads
    /// the five characters at offsets 3..8. Returns the standard set when no
    /// header matches.
    pub fn from_message(text: &str) -> Self {
        for (_, line) in document::lines(text) {
            let mut chars = line.chars();
            let head: String = chars.by_ref().take(3).collect();
            if !is_header_segment(&head) {
                continue;
            }
            let declared: Vec<char> = chars.take(5).collect();
            if let [field, component, repeat, escape, subcomponent] = declared[..] {
                return Self {
                    field,
                    component,
                    repeat,
                    escape,
                    subcomponent,
                };
            }
        }
        Self::default()
    }

    /// The encoding-characters string as it appears in MSH-2
    /// (component, repeat, escape, subcomponent).
    pub fn encoding_characters(&self) -> String {
        [self.component, self.repeat, self.escape, self.subcomponent]
            .iter()
            .collect()
    }
}

/// Whether a segment name is one of the header segments (MSH, BHS, FHS)
/// whose first field is the field delimiter itself.
///
/// Field-index arithmetic for these three is offset by one relative to
/// other segments, and their second field (the encoding characters) is
/// never split into repeats or components.
pub fn is_header_segment(name: &str) -> bool {
    name.eq_ignore_ascii_case("MSH")
        || name.eq_ignore_ascii_case("BHS")
        || name.eq_ignore_ascii_case("FHS")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set() {
        let d = Delimiters::default();
        assert_eq!(
            (d.field, d.component, d.repeat, d.escape, d.subcomponent),
            ('|', '^', '~', '\\', '&')
        );
    }

    #[test]
    fn encoding_characters_standard() {
        assert_eq!(Delimiters::default().encoding_characters(), "^~\\&");
    }

    #[test]
    fn header_names() {
        assert!(is_header_segment("MSH"));
        assert!(is_header_segment("bhs"));
        assert!(is_header_segment("Fhs"));
        assert!(!is_header_segment("PID"));
        assert!(!is_header_segment("MS"));
    }
}
