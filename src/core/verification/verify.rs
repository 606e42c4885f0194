//! Post-write verification
//!
//! Reads a written BDT file back and checks it against the document it was
//! generated from: identical bytes (by checksum), the same number of lines,
//! CRLF terminators throughout and a correct length prefix on every line.

use crate::core::bdt::inspect::inspect_bytes;
use crate::core::bdt::BdtDocument;
use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::core::verification::report::VerificationReport;
use crate::domain::{BdtError, Result};
use std::path::Path;
use std::time::Instant;

/// Verifier for written BDT files
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Self
    }

    /// Verifies the file at `path` against `document`
    ///
    /// Findings are collected in the report; only an unreadable file is an
    /// error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bdt_export::core::verification::Verifier;
    /// # use bdt_export::core::bdt::BdtDocument;
    ///
    /// # async fn example(document: BdtDocument) -> anyhow::Result<()> {
    /// let report = Verifier::new()
    ///     .verify_file("exports/patient_1.bdt".as_ref(), &document)
    ///     .await?;
    /// println!("{}", report.format_summary());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn verify_file(&self, path: &Path, document: &BdtDocument) -> Result<VerificationReport> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            BdtError::Verification(format!("cannot read {}: {e}", path.display()))
        })?;
        Ok(self.verify_bytes(path, &bytes, document))
    }

    /// Verifies already loaded file content
    pub fn verify_bytes(&self, path: &Path, bytes: &[u8], document: &BdtDocument) -> VerificationReport {
        let start = Instant::now();
        let mut report = VerificationReport::new(path, document.checksum());

        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            "Starting post-write verification"
        );

        let actual_checksum = calculate_checksum_bytes(bytes);
        if actual_checksum != report.expected_checksum {
            report.record_file_failure("Checksum mismatch");
        }
        report.actual_checksum = Some(actual_checksum);

        let inspection = inspect_bytes(bytes);
        report.lines_checked = inspection.line_count();

        if inspection.line_count() != document.line_count() {
            report.record_file_failure(format!(
                "Expected {} lines, found {}",
                document.line_count(),
                inspection.line_count()
            ));
        }
        if inspection.bare_line_feeds > 0 {
            report.record_file_failure(format!(
                "{} lines end in LF instead of CRLF",
                inspection.bare_line_feeds
            ));
        }
        if inspection.line_count() > 0 && !inspection.trailing_terminator {
            report.record_file_failure("Last line is not terminated");
        }
        for (line, issue) in inspection.issues() {
            report.record_line_failure(line.number, issue.to_string());
        }

        report.set_duration(start.elapsed().as_millis() as u64);

        if report.is_success() {
            tracing::info!(
                path = %path.display(),
                lines = report.lines_checked,
                duration_ms = report.duration_ms,
                "Verification passed"
            );
        } else {
            tracing::warn!(
                path = %path.display(),
                failures = report.failures.len(),
                "Verification failed"
            );
        }

        report
    }
}
