//! Validate config command implementation

use crate::cli::load_cli_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown_path = config_path.unwrap_or(crate::cli::DEFAULT_CONFIG_PATH);
        tracing::info!(config_path = %shown_path, "Validating configuration");

        println!("🔍 Validating configuration: {shown_path}");
        println!();

        let config = match load_cli_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Software ID: {}", config.export.software_id);
        println!("  BDT Version: {}", config.export.bdt_version);
        println!("  Overflow Policy: {}", config.export.overflow_policy);
        println!("  Distinct Tags: {}", config.export.distinct_tags);
        println!(
            "  Mirror File: {}",
            config.export.mirror_file_name.as_deref().unwrap_or("(none)")
        );
        println!(
            "  Verify After Write: {}",
            config.verification.verify_after_write
        );
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_exit_codes() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[export]\noverflow_policy = \"truncate\"\n").unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[logging]\nlocal_rotation = \"weekly\"\n").unwrap();

        let args = ValidateArgs {};
        assert_eq!(args.execute(good.to_str()).await.unwrap(), 0);
        assert_eq!(args.execute(bad.to_str()).await.unwrap(), 2);
    }
}
