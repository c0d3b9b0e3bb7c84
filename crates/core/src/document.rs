//! Line enumeration over HL7 message text.
//!
//! HL7 conventionally separates segments with `\r`, but message files in the
//! wild carry `\n` or `\r\n` just as often. [`lines`] treats all three as a
//! single break, so every transform sees the same segment sequence
//! regardless of how the text reached us. This is the seam an external
//! document store plugs into: anything that can produce the full text can be
//! enumerated by line here.

use crate::delim::Delimiters;

/// Iterator over the lines of message text, yielding `(line_number, line)`
/// pairs. Line numbers are 0-based.
#[derive(Debug)]
pub struct Lines<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let bytes = self.text.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && bytes[end] != b'\r' && bytes[end] != b'\n' {
            end += 1;
        }
        let line = &self.text[start..end];
        // Consume the break; CRLF counts as one.
        self.pos = if end < bytes.len() {
            if bytes[end] == b'\r' && end + 1 < bytes.len() && bytes[end + 1] == b'\n' {
                end + 2
            } else {
                end + 1
            }
        } else {
            end
        };
        let number = self.line;
        self.line += 1;
        Some((number, line))
    }
}

/// Enumerate the lines of `text`, treating `\r`, `\n`, and `\r\n` each as a
/// single line break. A trailing break does not produce a final empty line.
pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        text,
        pos: 0,
        line: 0,
    }
}

/// If `line` is shaped like a segment — a three-character name (letter
/// first, alphanumeric after) immediately followed by the field delimiter —
/// return the name. Custom (Z) segment names qualify like any other.
pub fn segment_name<'a>(line: &'a str, delims: &Delimiters) -> Option<&'a str> {
    let mut chars = line.char_indices();
    let (_, c0) = chars.next()?;
    let (_, c1) = chars.next()?;
    let (_, c2) = chars.next()?;
    let (rest, c3) = chars.next()?;
    if c0.is_ascii_alphabetic()
        && c1.is_ascii_alphanumeric()
        && c2.is_ascii_alphanumeric()
        && c3 == delims.field
    {
        Some(&line[..rest])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<(usize, &str)> {
        lines(text).collect()
    }

    #[test]
    fn cr_separated() {
        assert_eq!(collect("MSH|a\rPID|b"), vec![(0, "MSH|a"), (1, "PID|b")]);
    }

    #[test]
    fn lf_and_crlf_separated() {
        assert_eq!(collect("a\nb\r\nc"), vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn trailing_break_yields_no_empty_line() {
        assert_eq!(collect("a\r"), vec![(0, "a")]);
    }

    #[test]
    fn interior_blank_lines_are_kept() {
        assert_eq!(collect("a\r\rb"), vec![(0, "a"), (1, ""), (2, "b")]);
    }

    #[test]
    fn empty_input() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn segment_name_matches() {
        let d = Delimiters::default();
        assert_eq!(segment_name("PID|1|x", &d), Some("PID"));
        assert_eq!(segment_name("ZA1|custom", &d), Some("ZA1"));
        assert_eq!(segment_name("PID^1", &d), None, "wrong delimiter");
        assert_eq!(segment_name("PI|x", &d), None, "name too short");
        assert_eq!(segment_name("", &d), None);
    }
}
