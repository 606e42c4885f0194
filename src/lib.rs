// BDT Export - Patient charts to BDT files
// Copyright (c) 2025 BDT Export Contributors
// Licensed under the MIT License

//! # BDT Export
//!
//! Turns a loosely-typed patient chart (patient, visits, prescriptions, lab
//! and radiology orders) into a BDT (Behandlungsdatentransfer) file that
//! German practice software can import.
//!
//! ## Overview
//!
//! - **Normalizing** the many historical value shapes of a chart into text
//!   and numbers
//! - **Encoding** each value as a `LLL` + `TTTT` + content line
//! - **Assembling** the sections in fixed order into CRLF terminated CP1252
//!   bytes
//! - **Writing** the file atomically and verifying it afterwards
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Normalization, BDT generation, export, verification
//! - [`domain`] - The chart aggregate, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use bdt_export::core::bdt::{build_document, GeneratorSettings};
//! use bdt_export::domain::PatientChart;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let chart = PatientChart::from_json_str(
//!     r#"{"patient": {"id": 1, "firstName": "Jane", "lastName": "Doe"}}"#,
//! )?;
//! let document = build_document(&chart, &GeneratorSettings::default());
//!
//! assert!(document.to_text().contains("0103100Doe\r\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Chart shape problems never fail an export; they are absorbed by the
//! builders. Errors ([`domain::BdtError`]) come from configuration, reading
//! the chart, and the final write.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
