//! Configuration schema types
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a usable configuration.

use crate::core::bdt::{GeneratorSettings, OverflowPolicy, TagProfile};
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BdtExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Post-write verification
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BdtExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (build and report, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `patient_<id>_<timestamp>.bdt` files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Value of the 9206 software id field
    #[serde(default = "default_software_id")]
    pub software_id: String,

    /// Value of the 8000 version field
    #[serde(default = "default_bdt_version")]
    pub bdt_version: String,

    /// Content longer than one line: "split" or "truncate"
    #[serde(default = "default_overflow_policy")]
    pub overflow_policy: String,

    /// Give reason-for-visit and radiology notes their own tags
    #[serde(default)]
    pub distinct_tags: bool,

    /// Also write the latest export under this fixed name in `output_dir`
    #[serde(default)]
    pub mirror_file_name: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            software_id: default_software_id(),
            bdt_version: default_bdt_version(),
            overflow_policy: default_overflow_policy(),
            distinct_tags: false,
            mirror_file_name: None,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.software_id.trim().is_empty() {
            return Err("export.software_id cannot be empty".to_string());
        }
        if self.bdt_version.trim().is_empty() {
            return Err("export.bdt_version cannot be empty".to_string());
        }

        self.overflow_policy
            .parse::<OverflowPolicy>()
            .map_err(|e| format!("Invalid export.overflow_policy: {e}"))?;

        if let Some(name) = &self.mirror_file_name {
            if name.trim().is_empty() || name.contains(['/', '\\']) || name == ".." {
                return Err(format!(
                    "Invalid export.mirror_file_name '{name}'. Must be a plain file name"
                ));
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    /// Builder settings derived from this section
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown overflow policy.
    pub fn generator_settings(&self) -> Result<GeneratorSettings> {
        let overflow = self.overflow_policy.parse::<OverflowPolicy>()?;
        Ok(
            GeneratorSettings::new(overflow, TagProfile::from_flag(self.distinct_tags))
                .with_identity(self.bdt_version.trim(), self.software_id.trim()),
        )
    }
}

/// Verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Re-read every written file and check it
    #[serde(default = "default_true")]
    pub verify_after_write: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            verify_after_write: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "exports/bdt".to_string()
}

fn default_software_id() -> String {
    crate::core::bdt::sections::DEFAULT_SOFTWARE_ID.to_string()
}

fn default_bdt_version() -> String {
    crate::core::bdt::sections::DEFAULT_BDT_VERSION.to_string()
}

fn default_overflow_policy() -> String {
    OverflowPolicy::default().to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
