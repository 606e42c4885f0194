//! Field encoding
//!
//! A BDT line is `LLL` + `TTTT` + content, where `LLL` is the total line
//! length in bytes (three digits, zero padded) and `TTTT` the field tag.
//! The length counts CP1252 bytes, not UTF-8 bytes.

use super::encoding::{encode, encoded_len};
use crate::domain::{BdtError, Result};
use std::fmt;
use std::str::FromStr;

/// Bytes taken by the length prefix and the tag
pub const LINE_OVERHEAD: usize = 7;

/// Largest total line length the 3-digit prefix can express
pub const MAX_LINE_LENGTH: usize = 999;

/// Largest content that fits in one line
pub const MAX_CONTENT_LENGTH: usize = MAX_LINE_LENGTH - LINE_OVERHEAD;

/// A four-digit BDT field identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldTag([u8; 4]);

impl FieldTag {
    /// Builds a tag from a literal, checked at compile time in const context
    pub const fn from_static(tag: &'static str) -> Self {
        let bytes = tag.as_bytes();
        assert!(bytes.len() == 4, "field tag must be four digits");
        let mut i = 0;
        while i < 4 {
            assert!(bytes[i].is_ascii_digit(), "field tag must be four digits");
            i += 1;
        }
        Self([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// The tag as text
    pub fn as_str(&self) -> &str {
        // Only ever holds ASCII digits.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for FieldTag {
    type Err = BdtError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(BdtError::InvalidTag(s.to_string()));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One encoded BDT line
///
/// Immutable once built; `length()` always equals `7 + encoded_len(content)`
/// and never exceeds 999.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLine {
    tag: FieldTag,
    content: String,
    length: usize,
}

impl EncodedLine {
    /// Builds a line from already sanitised content
    ///
    /// # Errors
    ///
    /// Returns [`BdtError::FieldOverflow`] if the line would not fit the
    /// 3-digit length prefix.
    pub fn new(tag: FieldTag, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let length = LINE_OVERHEAD + encoded_len(&content);
        if length > MAX_LINE_LENGTH {
            return Err(BdtError::FieldOverflow {
                tag: tag.to_string(),
                length,
            });
        }
        Ok(Self {
            tag,
            content,
            length,
        })
    }

    pub fn tag(&self) -> FieldTag {
        self.tag
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Total line length in bytes, excluding the line terminator
    pub fn length(&self) -> usize {
        self.length
    }

    /// The line as text, without terminator
    pub fn render(&self) -> String {
        format!("{:03}{}{}", self.length, self.tag, self.content)
    }

    /// The line as CP1252 bytes, without terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.render())
    }
}

impl fmt::Display for EncodedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}{}{}", self.length, self.tag, self.content)
    }
}

/// What to do with content longer than one line can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Continue the content on further lines carrying the same tag
    #[default]
    Split,
    /// Cut the content at the maximum length
    Truncate,
}

impl FromStr for OverflowPolicy {
    type Err = BdtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "split" | "continue" | "continuation" => Ok(Self::Split),
            "truncate" => Ok(Self::Truncate),
            _ => Err(BdtError::Configuration(format!(
                "Invalid overflow policy: {s}. Expected 'split' or 'truncate'"
            ))),
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Split => f.write_str("split"),
            Self::Truncate => f.write_str("truncate"),
        }
    }
}

/// Turns tag + content pairs into encoded lines
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldEncoder {
    overflow: OverflowPolicy,
}

impl FieldEncoder {
    pub fn new(overflow: OverflowPolicy) -> Self {
        Self { overflow }
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Encodes one field
    ///
    /// Line breaks inside the content are replaced by spaces and the result
    /// is trimmed. Content that fits yields exactly one line; longer content
    /// is handled by the overflow policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdt_export::core::bdt::field::{FieldEncoder, FieldTag};
    ///
    /// let encoder = FieldEncoder::default();
    /// let lines = encoder.encode(FieldTag::from_static("3101"), "  Jane ");
    /// assert_eq!(lines[0].render(), "0113101Jane");
    /// ```
    pub fn encode(&self, tag: FieldTag, content: &str) -> Vec<EncodedLine> {
        let content = sanitize(content);
        let chunks = if encoded_len(&content) <= MAX_CONTENT_LENGTH {
            vec![content]
        } else {
            tracing::warn!(
                tag = %tag,
                content_length = encoded_len(&content),
                policy = %self.overflow,
                "Field content exceeds the BDT line limit"
            );
            match self.overflow {
                OverflowPolicy::Split => split_content(&content, MAX_CONTENT_LENGTH),
                OverflowPolicy::Truncate => vec![truncate_chars(&content, MAX_CONTENT_LENGTH)
                    .trim_end()
                    .to_string()],
            }
        };

        chunks
            .into_iter()
            .filter_map(|chunk| EncodedLine::new(tag, chunk).ok())
            .collect()
    }
}

/// Flattens line breaks and trims
fn sanitize(content: &str) -> String {
    if content.contains(['\r', '\n']) {
        content
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        content.trim().to_string()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Splits `text` into chunks of at most `max_chars`, preferring spaces
fn split_content(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while encoded_len(rest) > max_chars {
        let window = truncate_chars(rest, max_chars);
        let cut = match window.rfind(' ') {
            Some(space) if space > 0 => space,
            _ => window.len(),
        };
        let (head, tail) = rest.split_at(cut);
        chunks.push(head.trim_end().to_string());
        rest = tail.trim_start();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}
