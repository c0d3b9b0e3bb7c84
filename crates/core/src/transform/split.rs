//! Batch splitting and linebreak normalization.
//!
//! HL7 batch files wrap multiple messages in FHS/BHS headers and BTS/FTS
//! trailers; [`split_batch`] unwraps them into standalone messages.
//! [`normalize_line_endings`] and [`add_segment_linebreaks`] repair the two
//! common transport mishaps: foreign line endings, and messages collapsed
//! onto a single line with their segment breaks lost. Repairs are
//! best-effort — a field value that happens to look like a segment start
//! will be split too, which matches the conformance posture of the rest of
//! the crate (well-formed input round-trips exactly).

use crate::delim::Delimiters;
use crate::document;

/// Convert every `\r\n` and `\n` line ending to the HL7-conventional `\r`.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\r');
            }
            '\n' => out.push('\r'),
            other => out.push(other),
        }
    }
    out
}

/// Insert a `\r` before every interior position where a segment appears to
/// start: an uppercase letter, two uppercase-or-digit characters, then the
/// field delimiter. Positions already at the start of a line are left
/// alone.
pub fn add_segment_linebreaks(text: &str, delims: &Delimiters) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let starts_segment = i + 3 < chars.len()
            && c.is_ascii_uppercase()
            && (chars[i + 1].is_ascii_uppercase() || chars[i + 1].is_ascii_digit())
            && (chars[i + 2].is_ascii_uppercase() || chars[i + 2].is_ascii_digit())
            && chars[i + 3] == delims.field;
        if starts_segment && i > 0 && chars[i - 1] != '\r' && chars[i - 1] != '\n' {
            out.push('\r');
        }
        out.push(c);
    }
    out
}

/// Split a batch file into its individual messages.
///
/// FHS/BHS headers and BTS/FTS trailers are dropped; a new message starts
/// at every MSH line. Lines before the first MSH that are not batch
/// wrappers are stray content and are dropped too. Each message's segments
/// are rejoined with `\r`.
pub fn split_batch(text: &str, delims: &Delimiters) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (_, line) in document::lines(text) {
        let name = document::segment_name(line, delims)
            .map(str::to_ascii_uppercase)
            .unwrap_or_default();
        match name.as_str() {
            "FHS" | "BHS" | "BTS" | "FTS" => continue,
            "MSH" => {
                if !current.is_empty() {
                    messages.push(current.join("\r"));
                    current.clear();
                }
                current.push(line);
            }
            _ => {
                if !current.is_empty() {
                    current.push(line);
                }
            }
        }
    }
    if !current.is_empty() {
        messages.push(current.join("\r"));
    }
    messages
}
