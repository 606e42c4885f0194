//! Domain models and types for the BDT exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The chart aggregate** ([`PatientChart`]) and the [`Record`] view used
//!   to read its loosely-typed JSON objects
//! - **Strongly-typed identifiers** ([`PatientId`])
//! - **Error types** ([`BdtError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T, BdtError>`]:
//!
//! ```rust
//! use bdt_export::domain::{PatientChart, Result};
//!
//! fn load(json: &str) -> Result<PatientChart> {
//!     PatientChart::from_json_str(json)
//! }
//! ```

pub mod chart;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use chart::{PatientChart, Record};
pub use errors::BdtError;
pub use ids::PatientId;
pub use result::Result;
