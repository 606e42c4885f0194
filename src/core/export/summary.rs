//! Export summary and reporting

use crate::core::bdt::{CollectionStats, SectionKind};
use crate::core::verification::report::VerificationReport;
use crate::domain::PatientId;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one chart export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub patient_id: PatientId,

    /// Written file; `None` in dry-run mode
    pub path: Option<PathBuf>,

    /// Canonical copy, when configured and written
    pub mirror_path: Option<PathBuf>,

    pub dry_run: bool,

    /// Lines per section, in output order
    pub section_counts: Vec<(SectionKind, usize)>,

    pub stats: CollectionStats,

    /// Encoded size in bytes
    pub byte_count: usize,

    /// SHA-256 of the encoded document
    pub checksum: String,

    pub duration: Duration,

    /// Verification report (if verification was run)
    pub verification_report: Option<VerificationReport>,
}

impl ExportSummary {
    pub fn line_count(&self) -> usize {
        self.section_counts.iter().map(|(_, count)| count).sum()
    }

    /// True unless verification ran and found problems
    pub fn is_successful(&self) -> bool {
        self.verification_report
            .as_ref()
            .map_or(true, VerificationReport::is_success)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(dry run)".to_string());

        tracing::info!(
            patient_id = %self.patient_id,
            path = %path,
            line_count = self.line_count(),
            byte_count = self.byte_count,
            checksum = %self.checksum,
            visits = self.stats.visits,
            prescriptions = self.stats.prescriptions,
            lab_orders = self.stats.lab_orders,
            radiology_orders = self.stats.radiology_orders,
            duration_ms = self.duration.as_millis(),
            "Export summary"
        );

        for (kind, count) in &self.section_counts {
            tracing::debug!(section = %kind, lines = count, "Section line count");
        }

        if let Some(report) = &self.verification_report {
            if report.is_success() {
                tracing::info!(lines_checked = report.lines_checked, "Verification passed");
            } else {
                tracing::warn!(
                    failure_count = report.failures.len(),
                    "Verification found problems"
                );
                for failure in &report.failures {
                    tracing::warn!(line = ?failure.line, reason = %failure.reason, "Verification failure");
                }
            }
        }
    }
}
