//! Windows-1252 single-byte encoding
//!
//! BDT files are read by the consuming practice software as CP1252. Every
//! character maps to exactly one byte, so the byte length of a field is its
//! character count. Characters outside the code page become `?`.

/// Characters of the 0x80..=0x9F block; `None` marks unassigned positions
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// Byte written for characters the code page cannot represent
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Encodes one character
pub fn encode_char(c: char) -> u8 {
    let code = c as u32;
    match code {
        0x00..=0x7F | 0xA0..=0xFF => code as u8,
        _ => CP1252_HIGH
            .iter()
            .position(|mapped| *mapped == Some(c))
            .map(|index| 0x80 + index as u8)
            .unwrap_or(REPLACEMENT_BYTE),
    }
}

/// Decodes one byte; unassigned positions decode as their Latin-1 code point
pub fn decode_byte(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_HIGH[(byte - 0x80) as usize].unwrap_or(byte as char),
        _ => byte as char,
    }
}

/// Encodes a string to CP1252 bytes
///
/// # Examples
///
/// ```
/// use bdt_export::core::bdt::encoding::encode;
///
/// assert_eq!(encode("Müller"), vec![b'M', 0xFC, b'l', b'l', b'e', b'r']);
/// assert_eq!(encode("€"), vec![0x80]);
/// ```
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Decodes CP1252 bytes to a string
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(decode_byte).collect()
}

/// Number of bytes `text` occupies once encoded
pub fn encoded_len(text: &str) -> usize {
    text.chars().count()
}
