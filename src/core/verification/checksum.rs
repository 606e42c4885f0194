//! Checksum calculation for written documents
//!
//! The checksum of a document is taken over its exact encoded bytes, so it
//! changes with any difference in content, encoding or line terminators.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use bdt_export::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"0113101Jane\r\n");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Compares `data` against an expected hex checksum, ignoring case
pub fn checksum_matches(data: &[u8], expected: &str) -> bool {
    calculate_checksum_bytes(data).eq_ignore_ascii_case(expected.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum_bytes() {
        let checksum = calculate_checksum_bytes(b"0103100Doe\r\n");

        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_calculate_checksum_known_value() {
        assert_eq!(
            calculate_checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_terminators_change_checksum() {
        let crlf = calculate_checksum_bytes(b"0103100Doe\r\n");
        let lf = calculate_checksum_bytes(b"0103100Doe\n");
        assert_ne!(crlf, lf);
    }

    #[test]
    fn test_checksum_matches() {
        let data = b"0113101Jane\r\n";
        let expected = calculate_checksum_bytes(data).to_uppercase();
        assert!(checksum_matches(data, &expected));
        assert!(!checksum_matches(b"0113101June\r\n", &expected));
    }
}
