//! Inspect command implementation
//!
//! Prints every line of a BDT file with its tag label and flags lines whose
//! length prefix is wrong or that cannot be parsed at all.

use crate::core::bdt::inspect_bytes;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// BDT file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    ///
    /// Exit code 0 when every line is valid, 1 when issues were found and 2
    /// when the file cannot be read.
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file.display(), "Inspecting BDT file");

        let bytes = match tokio::fs::read(&self.file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", self.file.display());
                return Ok(2);
            }
        };

        let report = inspect_bytes(&bytes);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", report.format_listing());
            println!();
            println!(
                "{} lines, {} with issues",
                report.line_count(),
                report.issue_count()
            );
            if report.bare_line_feeds > 0 {
                println!("{} lines end in LF instead of CRLF", report.bare_line_feeds);
            }
            if !report.lines.is_empty() && !report.trailing_terminator {
                println!("Last line is not terminated");
            }
        }

        tracing::debug!(
            lines = report.line_count(),
            issues = report.issue_count(),
            "Inspection finished"
        );

        Ok(if report.is_valid() { 0 } else { 1 })
    }
}
