//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use crate::config::{default_config, load_config, BdtExportConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "bdt-export.toml";

/// BDT Export - patient charts to BDT files
#[derive(Parser, Debug)]
#[command(name = "bdt-export")]
#[command(version, about, long_about = None)]
#[command(author = "BDT Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "BDT_CONFIG", global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BDT_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a BDT file from a patient chart
    Export(commands::export::ExportArgs),

    /// List the lines of a BDT file and flag malformed ones
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Loads the configuration the CLI should run with
///
/// An explicitly given path must exist. Without one, `bdt-export.toml` in
/// the working directory is used if present, otherwise the built-in
/// defaults.
pub fn load_cli_config(path: Option<&str>) -> Result<BdtExportConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            default_config()
        }
    }
}
