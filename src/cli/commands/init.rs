//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = crate::cli::DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Include commented explanations for every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set software_id to the name your practice software expects");
                println!("  2. Validate configuration: bdt-export validate-config");
                println!("  3. Run export: bdt-export export --chart chart.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# BDT Export Configuration

[application]
log_level = "info"

[export]
output_dir = "exports/bdt"
software_id = "YourEHRSystem"
bdt_version = "3.1.0"

[verification]
verify_after_write = true
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# BDT Export Configuration
#
# Values may reference environment variables as ${VAR_NAME}.
# Any setting can also be overridden with BDT_<SECTION>_<KEY>,
# e.g. BDT_EXPORT_OUTPUT_DIR=/srv/exchange

[application]
# trace, debug, info, warn or error
log_level = "info"
# Build and summarise documents without writing files
dry_run = false

[export]
# Directory receiving patient_<id>_<timestamp>.bdt files
output_dir = "exports/bdt"
# Written to field 9206 of every file
software_id = "YourEHRSystem"
# Written to field 8000 of every file
bdt_version = "3.1.0"
# Content longer than one line: "split" continues on further lines with
# the same tag, "truncate" cuts it
overflow_policy = "split"
# Move reason-for-visit to 6303 and radiology notes to 6335 instead of
# sharing tags with review of systems and radiology results
distinct_tags = false
# Also keep the latest export under a fixed name for the practice software
# mirror_file_name = "patient_export.bdt"

[verification]
# Re-read every written file and check checksum and line lengths
verify_after_write = true

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "logs"
# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_are_valid() {
        let minimal = load_config_str(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(minimal.export.output_dir, "exports/bdt");

        let full = load_config_str(&InitArgs::generate_config_with_examples()).unwrap();
        assert_eq!(full.export.overflow_policy, "split");
        assert!(full.export.mirror_file_name.is_none());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("bdt-export.toml");
        std::fs::write(&output, "# existing").unwrap();

        let mut args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# existing");

        args.force = true;
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("[export]"));
    }
}
