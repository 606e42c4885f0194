//! Configuration management for the BDT exporter.
//!
//! # Overview
//!
//! Configuration is read from a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `BDT_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bdt_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("bdt-export.toml")?;
//! println!("Output directory: {}", config.export.output_dir);
//! println!("Overflow policy: {}", config.export.overflow_policy);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry run
//! - [`ExportConfig`] - output directory, header identity, encoding choices
//! - [`VerificationConfig`] - post-write verification
//! - [`LoggingConfig`] - local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! output_dir = "exports/bdt"
//! software_id = "${PRACTICE_SOFTWARE_ID}"
//! overflow_policy = "split"
//! mirror_file_name = "patient_export.bdt"
//!
//! [verification]
//! verify_after_write = true
//! ```

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, load_config_str};
pub use schema::{
    ApplicationConfig, BdtExportConfig, ExportConfig, LoggingConfig, VerificationConfig,
};
