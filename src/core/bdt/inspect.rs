//! BDT file inspection
//!
//! Reads an encoded document back into lines, labels each tag and checks
//! the declared length prefix against the actual line length. Used by the
//! `inspect` command and by post-write verification.

use super::encoding::decode;
use super::field::LINE_OVERHEAD;
use super::tags;
use serde::Serialize;
use std::fmt;

/// Problem found on a single line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineIssue {
    /// Shorter than the length prefix plus tag, or prefix/tag not numeric
    Malformed,
    /// The length prefix does not match the line
    LengthMismatch { declared: usize, actual: usize },
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::Malformed => f.write_str("malformed line"),
            LineIssue::LengthMismatch { declared, actual } => {
                write!(f, "length {declared} but actual {actual}")
            }
        }
    }
}

/// One line as read back from a document
#[derive(Debug, Clone, Serialize)]
pub struct InspectedLine {
    /// 1-based line number
    pub number: usize,
    pub tag: Option<String>,
    pub label: Option<&'static str>,
    pub content: String,
    /// Byte length without terminator
    pub length: usize,
    pub issue: Option<LineIssue>,
}

/// Result of inspecting a whole document
#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectionReport {
    pub lines: Vec<InspectedLine>,
    /// Lines terminated by a bare LF instead of CRLF
    pub bare_line_feeds: usize,
    /// Whether the final line carries a terminator
    pub trailing_terminator: bool,
}

impl InspectionReport {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn issues(&self) -> impl Iterator<Item = (&InspectedLine, &LineIssue)> {
        self.lines
            .iter()
            .filter_map(|line| line.issue.as_ref().map(|issue| (line, issue)))
    }

    pub fn issue_count(&self) -> usize {
        self.issues().count()
    }

    /// True when every line is well formed and CRLF terminated
    pub fn is_valid(&self) -> bool {
        self.issue_count() == 0
            && self.bare_line_feeds == 0
            && (self.lines.is_empty() || self.trailing_terminator)
    }

    /// Text listing in the `NNN | tag | label | content` layout
    pub fn format_listing(&self) -> String {
        let mut listing = String::new();
        for line in &self.lines {
            let number = format!("{:03}", line.number);
            match (&line.tag, &line.issue) {
                (None, _) | (_, Some(LineIssue::Malformed)) => {
                    listing.push_str(&format!("{number} | MALFORMED | {}\n", line.content));
                }
                (Some(tag), issue) => {
                    let label = line.label.unwrap_or("Unknown");
                    let note = issue
                        .as_ref()
                        .map(|issue| format!(" ({issue})"))
                        .unwrap_or_default();
                    listing.push_str(&format!(
                        "{number} | {tag} | {label} | {}{note}\n",
                        line.content
                    ));
                }
            }
        }
        listing
    }
}

/// Inspects CP1252 bytes
///
/// Lines are split on LF with an optional preceding CR; empty lines are
/// skipped.
///
/// # Examples
///
/// ```
/// use bdt_export::core::bdt::inspect::inspect_bytes;
///
/// let report = inspect_bytes(b"0113101Jane\r\n0123100Doe\r\n");
/// assert_eq!(report.line_count(), 2);
/// assert_eq!(report.issue_count(), 1);
/// ```
pub fn inspect_bytes(bytes: &[u8]) -> InspectionReport {
    let text = decode(bytes);
    let mut report = InspectionReport {
        trailing_terminator: text.ends_with('\n'),
        ..InspectionReport::default()
    };

    let segments: Vec<&str> = text.split('\n').collect();
    let last_index = segments.len().saturating_sub(1);
    for (index, segment) in segments.into_iter().enumerate() {
        let line = match segment.strip_suffix('\r') {
            Some(line) => line,
            None => {
                if index < last_index {
                    report.bare_line_feeds += 1;
                }
                segment
            }
        };
        if line.is_empty() {
            continue;
        }
        let number = report.lines.len() + 1;
        report.lines.push(inspect_line(number, line));
    }

    report
}

fn inspect_line(number: usize, line: &str) -> InspectedLine {
    let length = line.chars().count();
    let is_numeric = |part: &&str| part.bytes().all(|b| b.is_ascii_digit());

    let declared = line
        .get(..3)
        .filter(is_numeric)
        .and_then(|prefix| prefix.parse::<usize>().ok());
    let tag = line.get(3..LINE_OVERHEAD).filter(is_numeric);
    let (Some(declared), Some(tag)) = (declared, tag) else {
        return malformed(number, line, length);
    };

    let issue = (declared != length).then_some(LineIssue::LengthMismatch {
        declared,
        actual: length,
    });

    InspectedLine {
        number,
        tag: Some(tag.to_string()),
        label: tags::label(tag),
        content: line[LINE_OVERHEAD..].to_string(),
        length,
        issue,
    }
}

fn malformed(number: usize, line: &str, length: usize) -> InspectedLine {
    InspectedLine {
        number,
        tag: None,
        label: None,
        content: line.to_string(),
        length,
        issue: Some(LineIssue::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bdt::encoding::encode;

    #[test]
    fn test_valid_document() {
        let bytes = encode("0113101Jane\r\n0133100Müller\r\n");
        let report = inspect_bytes(&bytes);
        assert!(report.is_valid());
        assert_eq!(report.lines[1].content, "Müller");
        assert_eq!(report.lines[1].label, Some("Last Name"));
        assert_eq!(report.lines[1].length, 13);
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let report = inspect_bytes(b"0123100Doe\r\n");
        assert_eq!(
            report.lines[0].issue,
            Some(LineIssue::LengthMismatch {
                declared: 12,
                actual: 10
            })
        );
        assert!(!report.is_valid());
        assert!(report
            .format_listing()
            .contains("001 | 3100 | Last Name | Doe (length 12 but actual 10)"));
    }

    #[test]
    fn test_malformed_lines() {
        let report = inspect_bytes(b"01\r\nabc3100Doe\r\n0103100Doe\r\n");
        assert_eq!(report.line_count(), 3);
        assert_eq!(report.lines[0].issue, Some(LineIssue::Malformed));
        assert_eq!(report.lines[1].issue, Some(LineIssue::Malformed));
        assert_eq!(report.lines[2].issue, None);
        assert!(report.format_listing().starts_with("001 | MALFORMED | 01\n"));
    }

    #[test]
    fn test_empty_content_line() {
        let report = inspect_bytes(b"0076333\r\n");
        assert!(report.is_valid());
        assert_eq!(report.lines[0].content, "");
        assert_eq!(report.lines[0].label, Some("Procedure Name"));
    }

    #[test]
    fn test_terminator_checks() {
        let bare = inspect_bytes(b"0103100Doe\n0113101Jane\r\n");
        assert_eq!(bare.bare_line_feeds, 1);
        assert!(!bare.is_valid());

        let unterminated = inspect_bytes(b"0103100Doe");
        assert!(!unterminated.trailing_terminator);
        assert!(!unterminated.is_valid());

        assert!(inspect_bytes(b"").is_valid());
    }

    #[test]
    fn test_unknown_tag_label() {
        let report = inspect_bytes(b"0099999ab\r\n");
        assert!(report.format_listing().contains("| 9999 | Unknown | ab"));
    }
}
