//! Line reading and classification.
//!
//! The reader yields `(line_number, raw_text)` pairs, numbered from 1,
//! blank and comment lines included. The classifier then sorts each raw
//! line into one of four buckets and extracts the substring fed to the
//! tokenizer.

use std::io::{self, BufRead};

/// Lazily yields `(line_number, raw_text)` pairs from any `BufRead` source.
pub struct LineReader<R> {
    lines: io::Lines<R>,
    next_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            next_no: 1,
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let no = self.next_no;
        self.next_no += 1;
        Some(line.map(|text| (no, text)))
    }
}

/// The lexical bucket a line falls into, before tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    FullComment,
    CodeWithComment,
    CodeWithoutComment,
}

impl LineKind {
    pub fn is_code(self) -> bool {
        matches!(self, LineKind::CodeWithComment | LineKind::CodeWithoutComment)
    }
}

/// Result of classifying one raw line: its kind, and (for code lines) the
/// substring up to the first comment delimiter, ready for tokenization.
pub struct ClassifiedLine<'a> {
    pub kind: LineKind,
    pub pre_comment: &'a str,
}

/// Index of the first `@` or `/`, whichever occurs first, if either is present.
fn comment_start(line: &str) -> Option<usize> {
    let at = line.find('@');
    let slash = line.find('/');
    match (at, slash) {
        (Some(a), Some(s)) => Some(a.min(s)),
        (Some(a), None) => Some(a),
        (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}

/// Classify a raw line and compute its pre-comment substring.
pub fn classify_line(raw: &str) -> ClassifiedLine<'_> {
    if raw.trim().is_empty() {
        return ClassifiedLine {
            kind: LineKind::Blank,
            pre_comment: "",
        };
    }

    let first_token = raw.split_whitespace().next().unwrap_or("");
    if first_token.starts_with('@') || first_token.starts_with('/') {
        return ClassifiedLine {
            kind: LineKind::FullComment,
            pre_comment: "",
        };
    }

    let has_comment = raw.contains('@') || raw.contains('/');
    let pre_comment = match comment_start(raw) {
        Some(idx) => &raw[..idx],
        None => raw,
    };

    ClassifiedLine {
        kind: if has_comment {
            LineKind::CodeWithComment
        } else {
            LineKind::CodeWithoutComment
        },
        pre_comment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_whitespace_only() {
        assert_eq!(classify_line("   \t  ").kind, LineKind::Blank);
        assert_eq!(classify_line("").kind, LineKind::Blank);
    }

    #[test]
    fn full_comment_starts_with_at_or_slash() {
        assert_eq!(classify_line("@ a comment").kind, LineKind::FullComment);
        assert_eq!(classify_line("  // a comment").kind, LineKind::FullComment);
    }

    #[test]
    fn code_without_comment() {
        let c = classify_line("    mov r0, #1");
        assert_eq!(c.kind, LineKind::CodeWithoutComment);
        assert_eq!(c.pre_comment, "    mov r0, #1");
    }

    #[test]
    fn code_with_comment_truncates_at_first_delimiter() {
        let c = classify_line("    mov r0, #1 @ set flag");
        assert_eq!(c.kind, LineKind::CodeWithComment);
        assert_eq!(c.pre_comment, "    mov r0, #1 ");
    }

    #[test]
    fn earliest_delimiter_wins() {
        let c = classify_line("ldr r0, =x / divide marker @ trailing");
        assert_eq!(c.pre_comment, "ldr r0, =x ");
    }

    #[test]
    fn line_reader_numbers_from_one() {
        let data = b"a\nb\nc\n" as &[u8];
        let reader = LineReader::new(data);
        let lines: Vec<_> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(
            lines,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, "c".to_string())
            ]
        );
    }
}
