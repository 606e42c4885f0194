//! Export command implementation
//!
//! Generates one BDT file from a patient chart JSON file.

use crate::cli::load_cli_config;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::domain::BdtError;
use crate::log_error_with_context;
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Maximum number of verification failures printed
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Patient chart JSON file
    #[arg(long, value_name = "JSON")]
    pub chart: String,

    /// Override the output directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Write to this exact path instead of a generated file name
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Dry run mode - build the document without writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(chart = %self.chart, "Starting export command");

        let mut config = match load_cli_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No file will be written");
            println!();
        }

        let coordinator = match ExportCoordinator::new(config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        let summary = match coordinator
            .export_file(Path::new(&self.chart), self.output.clone())
            .await
        {
            Ok(summary) => summary,
            Err(e) => return Ok(report_failure(&e)),
        };

        summary.log_summary();
        print_summary(&summary);

        let exit_code = if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export written but verification failed");
            1
        };
        Ok(exit_code)
    }
}

/// Prints the error and maps it to an exit code
fn report_failure(error: &BdtError) -> i32 {
    log_error_with_context!(error, "Export failed");
    match error {
        BdtError::Cancelled(_) => {
            println!();
            println!("⚠️  Export interrupted. No file was written.");
            130
        }
        BdtError::Io(_) | BdtError::InvalidChart(_) | BdtError::Configuration(_) => {
            eprintln!("Input error: {error}");
            2
        }
        _ => {
            eprintln!("Export failed: {error}");
            5
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Patient: {}", summary.patient_id);
    match &summary.path {
        Some(path) => println!("  File: {}", path.display()),
        None => println!("  File: (dry run, not written)"),
    }
    if let Some(mirror) = &summary.mirror_path {
        println!("  Mirror: {}", mirror.display());
    }
    println!("  Lines: {}", summary.line_count());
    println!("  Bytes: {}", summary.byte_count);
    println!("  SHA-256: {}", summary.checksum);
    println!(
        "  Visits: {}, Prescriptions: {}, Lab orders: {}, Radiology orders: {}",
        summary.stats.visits,
        summary.stats.prescriptions,
        summary.stats.lab_orders,
        summary.stats.radiology_orders
    );
    println!("  Duration: {:.3}s", summary.duration.as_secs_f64());
    println!();
    println!("  Lines per section:");
    for (kind, count) in &summary.section_counts {
        println!("    {kind:<20} {count}");
    }
    println!();

    if let Some(report) = &summary.verification_report {
        println!("🔍 Verification Results:");
        println!("  Lines checked: {}", report.lines_checked);
        println!("  Failures: {}", report.failures.len());
        for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
            match failure.line {
                Some(line) => println!("    - line {line}: {}", failure.reason),
                None => println!("    - {}", failure.reason),
            }
        }
        if report.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "    ... and {} more failures",
                report.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }
}
