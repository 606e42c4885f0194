//! Verification report structures

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Result of checking a written BDT file against the generated document
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// The file that was checked
    pub path: PathBuf,

    /// Checksum of the document as generated
    pub expected_checksum: String,

    /// Checksum of the bytes found on disk
    pub actual_checksum: Option<String>,

    /// Number of lines read back
    pub lines_checked: usize,

    /// Everything that did not match
    pub failures: Vec<VerificationFailure>,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

/// One verification finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationFailure {
    /// 1-based line number, `None` for whole-file findings
    pub line: Option<usize>,

    /// Reason for failure
    pub reason: String,
}

impl VerificationReport {
    pub fn new(path: impl Into<PathBuf>, expected_checksum: impl Into<String>) -> Self {
        Self {
            verified_at: Utc::now(),
            path: path.into(),
            expected_checksum: expected_checksum.into(),
            actual_checksum: None,
            lines_checked: 0,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_file_failure(&mut self, reason: impl Into<String>) {
        self.failures.push(VerificationFailure {
            line: None,
            reason: reason.into(),
        });
    }

    pub fn record_line_failure(&mut self, line: usize, reason: impl Into<String>) {
        self.failures.push(VerificationFailure {
            line: Some(line),
            reason: reason.into(),
        });
    }

    /// Set the duration of verification
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if all verifications passed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("📊 Verification Report\n");
        summary.push_str(&format!("  File: {}\n", self.path.display()));
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Lines checked: {}\n", self.lines_checked));
        summary.push_str(&format!("  Expected checksum: {}\n", self.expected_checksum));
        if let Some(actual) = &self.actual_checksum {
            summary.push_str(&format!("  Actual checksum: {actual}\n"));
        }

        if self.failures.is_empty() {
            summary.push_str("  ✅ Passed\n");
        } else {
            summary.push_str(&format!("\n❌ Failures ({}):\n", self.failures.len()));
            for (i, failure) in self.failures.iter().enumerate() {
                match failure.line {
                    Some(line) => summary.push_str(&format!(
                        "  {}. Line {line}: {}\n",
                        i + 1,
                        failure.reason
                    )),
                    None => summary.push_str(&format!("  {}. {}\n", i + 1, failure.reason)),
                }
            }
        }

        summary
    }
}
