//! Export coordinator - orchestrates one chart export
//!
//! Load the chart, build the document, write it atomically, optionally
//! mirror it under a canonical name, verify, and report.

use crate::config::BdtExportConfig;
use crate::core::bdt::{build_document, BdtDocument, GeneratorSettings};
use crate::core::export::summary::ExportSummary;
use crate::core::export::writer::AtomicWriter;
use crate::core::verification::Verifier;
use crate::domain::{BdtError, PatientChart, PatientId, Result};
use crate::{log_export_complete, log_export_start};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::watch;

/// Timestamp layout used in export file names
const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// `patient_<id>_<YYYY-MM-DDTHH-MM-SS>.bdt`
///
/// Characters of the id that are not safe in a file name are replaced by
/// `_`.
///
/// # Examples
///
/// ```
/// use bdt_export::core::export::export_file_name;
/// use bdt_export::domain::PatientId;
/// use chrono::{TimeZone, Utc};
///
/// let id = PatientId::new("1").unwrap();
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// assert_eq!(export_file_name(&id, at), "patient_1_2024-05-01T12-00-00.bdt");
/// ```
pub fn export_file_name(patient_id: &PatientId, at: DateTime<Utc>) -> String {
    let id: String = patient_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("patient_{id}_{}.bdt", at.format(FILE_TIMESTAMP_FORMAT))
}

/// Export coordinator
pub struct ExportCoordinator {
    config: BdtExportConfig,
    settings: GeneratorSettings,
    writer: AtomicWriter,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the export section is invalid.
    pub fn new(config: BdtExportConfig, shutdown_signal: watch::Receiver<bool>) -> Result<Self> {
        let settings = config.export.generator_settings()?;
        Ok(Self {
            config,
            settings,
            writer: AtomicWriter::new(shutdown_signal),
        })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Reads and parses a chart JSON file
    ///
    /// # Errors
    ///
    /// [`BdtError::Io`] if the file cannot be read, [`BdtError::InvalidChart`]
    /// if it is not a usable chart.
    pub async fn load_chart(path: &Path) -> Result<PatientChart> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BdtError::Io(format!("cannot read chart {}: {e}", path.display())))?;
        PatientChart::from_json_str(&json)
    }

    /// Builds the document without writing anything
    pub fn build(&self, chart: &PatientChart) -> BdtDocument {
        build_document(chart, &self.settings)
    }

    /// Exports the chart stored at `chart_path`
    pub async fn export_file(
        &self,
        chart_path: &Path,
        output: Option<PathBuf>,
    ) -> Result<ExportSummary> {
        let chart = Self::load_chart(chart_path).await?;
        self.export_chart(&chart, output).await
    }

    /// Exports one chart
    ///
    /// `output` overrides the generated destination path. In dry-run mode
    /// the document is built and summarised but nothing is written.
    ///
    /// # Errors
    ///
    /// [`BdtError::Write`] when the file cannot be written,
    /// [`BdtError::Cancelled`] when shutdown was requested before commit.
    /// Verification findings are reported in the summary, not as errors.
    pub async fn export_chart(
        &self,
        chart: &PatientChart,
        output: Option<PathBuf>,
    ) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let output_dir = self.config.export.output_path();
        log_export_start!(chart.patient_id(), output_dir.display());

        let document = self.build(chart);
        let bytes = document.to_bytes();

        let mut summary = ExportSummary {
            patient_id: chart.patient_id().clone(),
            path: None,
            mirror_path: None,
            dry_run: self.config.application.dry_run,
            section_counts: document.section_counts(),
            stats: document.stats(),
            byte_count: bytes.len(),
            checksum: document.checksum(),
            duration: start_time.elapsed(),
            verification_report: None,
        };

        if summary.dry_run {
            tracing::info!(
                patient_id = %chart.patient_id(),
                line_count = document.line_count(),
                "Dry run - BDT file not written"
            );
            summary.duration = start_time.elapsed();
            return Ok(summary);
        }

        let path = output.unwrap_or_else(|| {
            output_dir.join(export_file_name(chart.patient_id(), Utc::now()))
        });
        self.writer.write(&path, &bytes).await?;
        summary.path = Some(path.clone());

        if let Some(name) = &self.config.export.mirror_file_name {
            let mirror = path
                .parent()
                .map_or_else(|| PathBuf::from(name), |dir| dir.join(name));
            match AtomicWriter::uncancellable().write(&mirror, &bytes).await {
                Ok(()) => summary.mirror_path = Some(mirror),
                Err(e) => {
                    tracing::warn!(path = %mirror.display(), error = %e, "Unable to mirror BDT file");
                }
            }
        }

        if self.config.verification.verify_after_write {
            let report = Verifier::new().verify_file(&path, &document).await?;
            summary.verification_report = Some(report);
        }

        summary.duration = start_time.elapsed();
        log_export_complete!(path.display(), document.line_count(), summary.duration);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn coordinator(dir: &Path, configure: impl FnOnce(&mut BdtExportConfig)) -> ExportCoordinator {
        let mut config = BdtExportConfig::default();
        config.export.output_dir = dir.to_string_lossy().into_owned();
        configure(&mut config);
        let (_tx, rx) = watch::channel(false);
        ExportCoordinator::new(config, rx).unwrap()
    }

    fn chart() -> PatientChart {
        PatientChart::from_value(json!({
            "patient": {"id": 7, "firstName": "Jane", "lastName": "Doe"}
        }))
        .unwrap()
    }

    #[test]
    fn test_export_file_name_sanitizes_id() {
        let id = PatientId::new("a/b c").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 11, 12, 9, 30, 5).unwrap();
        assert_eq!(export_file_name(&id, at), "patient_a_b_c_2024-11-12T09-30-05.bdt");
    }

    #[tokio::test]
    async fn test_export_writes_and_verifies() {
        let dir = TempDir::new().unwrap();
        let summary = coordinator(dir.path(), |_| {})
            .export_chart(&chart(), None)
            .await
            .unwrap();

        let path = summary.path.clone().unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("patient_7_"));
        assert_eq!(std::fs::read(&path).unwrap().len(), summary.byte_count);
        assert!(summary.verification_report.as_ref().unwrap().is_success());
        assert!(summary.is_successful());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let summary = coordinator(dir.path(), |config| config.application.dry_run = true)
            .export_chart(&chart(), None)
            .await
            .unwrap();

        assert!(summary.dry_run);
        assert!(summary.path.is_none());
        assert!(summary.line_count() > 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_mirror_copy_is_written() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.bdt");
        let summary = coordinator(dir.path(), |config| {
            config.export.mirror_file_name = Some("patient_export.bdt".to_string());
            config.verification.verify_after_write = false;
        })
        .export_chart(&chart(), Some(output.clone()))
        .await
        .unwrap();

        let mirror = dir.path().join("patient_export.bdt");
        assert_eq!(summary.path, Some(output.clone()));
        assert_eq!(summary.mirror_path, Some(mirror.clone()));
        assert_eq!(std::fs::read(&output).unwrap(), std::fs::read(&mirror).unwrap());
        assert!(summary.verification_report.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_export_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let mut config = BdtExportConfig::default();
        config.export.output_dir = dir.path().to_string_lossy().into_owned();
        let (tx, rx) = watch::channel(false);
        let coordinator = ExportCoordinator::new(config, rx).unwrap();
        tx.send(true).unwrap();

        let result = coordinator.export_chart(&chart(), None).await;

        assert!(matches!(result, Err(BdtError::Cancelled(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_load_chart_errors() {
        let dir = TempDir::new().unwrap();
        let missing = ExportCoordinator::load_chart(&dir.path().join("missing.json")).await;
        assert!(matches!(missing, Err(BdtError::Io(_))));

        let invalid_path = dir.path().join("chart.json");
        std::fs::write(&invalid_path, r#"{"patient": {}}"#).unwrap();
        let invalid = ExportCoordinator::load_chart(&invalid_path).await;
        assert!(matches!(invalid, Err(BdtError::InvalidChart(_))));
    }
}
