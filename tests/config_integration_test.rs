//! Configuration loading from files on disk

use bdt_export::config::load_config;
use bdt_export::core::bdt::{OverflowPolicy, TagProfile};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_configuration() {
    let file = write_config(
        r#"
[application]
log_level = "warn"
dry_run = true

[export]
output_dir = "/srv/exchange"
software_id = "PraxisSoft"
bdt_version = "3.0"
overflow_policy = "truncate"
distinct_tags = true
mirror_file_name = "patient_export.bdt"

[verification]
verify_after_write = false

[logging]
local_enabled = true
local_path = "/var/log/bdt-export"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert!(config.application.dry_run);
    assert!(!config.verification.verify_after_write);
    assert_eq!(config.logging.local_rotation, "hourly");

    let settings = config.export.generator_settings().unwrap();
    assert_eq!(settings.software_id, "PraxisSoft");
    assert_eq!(settings.bdt_version, "3.0");
    assert_eq!(settings.encoder.overflow_policy(), OverflowPolicy::Truncate);
    assert_eq!(settings.tags, TagProfile::distinct());
}

#[test]
fn test_partial_configuration_uses_defaults() {
    let file = write_config("[export]\nsoftware_id = \"PraxisSoft\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.export.software_id, "PraxisSoft");
    assert_eq!(config.export.output_dir, "exports/bdt");
    assert_eq!(config.export.bdt_version, "3.1.0");
    assert!(config.verification.verify_after_write);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_substitution_in_file() {
    std::env::set_var("BDT_CONFIG_TEST_SOFTWARE_ID", "FromEnv");
    let file = write_config("[export]\nsoftware_id = \"${BDT_CONFIG_TEST_SOFTWARE_ID}\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.export.software_id, "FromEnv");
    std::env::remove_var("BDT_CONFIG_TEST_SOFTWARE_ID");
}

#[test]
fn test_invalid_configurations_are_rejected() {
    for contents in [
        "[application]\nlog_level = \"loud\"\n",
        "[export]\noverflow_policy = \"wrap\"\n",
        "[export]\nmirror_file_name = \"sub/dir.bdt\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
        "[export\n",
    ] {
        let file = write_config(contents);
        assert!(load_config(file.path()).is_err(), "accepted: {contents}");
    }
}
