//! Domain error types
//!
//! This module defines the error hierarchy for the BDT exporter. Normalization
//! and encoding never fail; the variants below cover the boundaries around
//! them (configuration, chart loading, the final write, verification).

use std::path::PathBuf;
use thiserror::Error;

/// Main exporter error type
#[derive(Debug, Error)]
pub enum BdtError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The chart aggregate is missing something the generator cannot do without
    #[error("Invalid patient chart: {0}")]
    InvalidChart(String),

    /// A field tag that is not exactly four ASCII digits
    #[error("Invalid field tag '{0}': expected four ASCII digits")]
    InvalidTag(String),

    /// Content too long for the 3-digit length prefix
    #[error("Field {tag} would be {length} bytes long, the limit is 999")]
    FieldOverflow { tag: String, length: usize },

    /// Writing the finished document to its destination failed
    #[error("Failed to write BDT file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export was cancelled before the document was committed
    #[error("Export cancelled before {} was committed", .0.display())]
    Cancelled(PathBuf),

    /// Post-write verification found a mismatch
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors outside the final write
    #[error("I/O error: {0}")]
    Io(String),
}

impl BdtError {
    /// Builds a write error for `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BdtError::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for BdtError {
    fn from(err: std::io::Error) -> Self {
        BdtError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BdtError {
    fn from(err: serde_json::Error) -> Self {
        BdtError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BdtError {
    fn from(err: toml::de::Error) -> Self {
        BdtError::Configuration(format!("TOML parse error: {err}"))
    }
}
