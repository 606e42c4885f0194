//! Core logic of the BDT exporter.
//!
//! # Modules
//!
//! - [`normalize`] - reduces the chart's heterogeneous value shapes to text and numbers
//! - [`bdt`] - line encoding, section builders, document assembly, inspection
//! - [`export`] - writing a document to disk
//! - [`verification`] - checksums and post-write checks
//!
//! # Export Workflow
//!
//! 1. **Load**: parse the chart JSON into a [`PatientChart`](crate::domain::PatientChart)
//! 2. **Build**: run the section builders in fixed order
//! 3. **Encode**: join lines with CRLF and encode as CP1252
//! 4. **Write**: temporary file, then rename into place
//! 5. **Verify** (optional): re-read the file and check every line
//!
//! # Example
//!
//! ```rust,no_run
//! use bdt_export::config::load_config;
//! use bdt_export::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("bdt-export.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ExportCoordinator::new(config, shutdown_rx)?;
//! let summary = coordinator.export_file("chart.json".as_ref(), None).await?;
//!
//! println!("Lines: {}", summary.line_count());
//! # Ok(())
//! # }
//! ```

pub mod bdt;
pub mod export;
pub mod normalize;
pub mod verification;
