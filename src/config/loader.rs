//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BdtExportConfig;
use crate::domain::errors::BdtError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid")
});

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BdtExportConfig
/// 4. Applies environment variable overrides (BDT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use bdt_export::config::loader::load_config;
///
/// let config = load_config("bdt-export.toml").expect("Failed to load config");
/// println!("{}", config.export.output_dir);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BdtExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BdtError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BdtError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text, see [`load_config`]
pub fn load_config_str(contents: &str) -> Result<BdtExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: BdtExportConfig = toml::from_str(&contents)
        .map_err(|e| BdtError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BdtError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Built-in defaults with environment overrides applied
///
/// Used when no configuration file exists and none was requested
/// explicitly.
pub fn default_config() -> Result<BdtExportConfig> {
    load_config_str("")
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in ENV_VAR_PATTERN.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BdtError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the BDT_* prefix
///
/// Environment variables follow the pattern: BDT_<SECTION>_<KEY>
/// For example: BDT_EXPORT_OUTPUT_DIR, BDT_APPLICATION_LOG_LEVEL
fn apply_env_overrides(config: &mut BdtExportConfig) {
    if let Ok(val) = std::env::var("BDT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("BDT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("BDT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("BDT_EXPORT_SOFTWARE_ID") {
        config.export.software_id = val;
    }
    if let Ok(val) = std::env::var("BDT_EXPORT_BDT_VERSION") {
        config.export.bdt_version = val;
    }
    if let Ok(val) = std::env::var("BDT_EXPORT_OVERFLOW_POLICY") {
        config.export.overflow_policy = val;
    }
    if let Ok(val) = std::env::var("BDT_EXPORT_DISTINCT_TAGS") {
        config.export.distinct_tags = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BDT_EXPORT_MIRROR_FILE_NAME") {
        config.export.mirror_file_name = (!val.trim().is_empty()).then_some(val);
    }

    if let Ok(val) = std::env::var("BDT_VERIFICATION_VERIFY_AFTER_WRITE") {
        config.verification.verify_after_write = val.parse().unwrap_or(true);
    }

    if let Ok(val) = std::env::var("BDT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BDT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("BDT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
