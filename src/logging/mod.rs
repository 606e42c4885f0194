//! Logging and observability
//!
//! Structured logging through `tracing`, with an optional rotating JSON log
//! file. The macros below keep the field names of recurring events uniform.
//!
//! # Example
//!
//! ```no_run
//! use bdt_export::config::LoggingConfig;
//! use bdt_export::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(patient_id = "42", "Exporting chart");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a chart export
///
/// # Example
///
/// ```no_run
/// use bdt_export::domain::PatientId;
/// use bdt_export::log_export_start;
///
/// let patient_id = PatientId::new("42").unwrap();
/// log_export_start!(&patient_id, "exports/bdt");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($patient_id:expr, $output_dir:expr) => {
        tracing::info!(
            patient_id = %$patient_id,
            output_dir = %$output_dir,
            "Starting BDT export"
        );
    };
}

/// Log a finished chart export
///
/// # Example
///
/// ```no_run
/// use bdt_export::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("exports/bdt/patient_42.bdt", 57, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($path:expr, $line_count:expr, $duration:expr) => {
        tracing::info!(
            path = %$path,
            line_count = $line_count,
            duration_ms = $duration.as_millis(),
            "BDT export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use bdt_export::domain::BdtError;
/// use bdt_export::log_error_with_context;
///
/// let error = BdtError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
