/*!
 * Tests for application configuration
 */

use anyhow::Result;
use capknow::app_config::{Config, LogLevel};
use capknow::normalizer::JoinPolicy;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert_eq!(config.merge.join_policy, JoinPolicy::Space);
    assert!(!config.merge.case_insensitive);
    assert_eq!(config.merge.wrap_width, Some(100));
    assert_eq!(config.chunking.max_chunk_chars, 1000);
    assert_eq!(config.chunking.overlap_chars, 100);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that the default configuration validates
#[test]
fn test_default_config_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

/// Test validation failure for chunking misconfiguration
#[test]
fn test_validate_withOverlapNotBelowMax_shouldFail() {
    let mut config = Config::default();
    config.chunking.max_chunk_chars = 100;
    config.chunking.overlap_chars = 100;
    assert!(config.validate().is_err());

    config.chunking.overlap_chars = 0;
    assert!(config.validate().is_err());
}

/// Test validation failure for an unknown language code
#[test]
fn test_validate_withBogusLanguage_shouldFail() {
    let mut config = Config::default();
    config.language = "zz".to_string();
    assert!(config.validate().is_err());
}

/// Test save and reload round-trip through a JSON file
#[test]
fn test_config_save_and_load_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.language = "de".to_string();
    config.merge.join_policy = JoinPolicy::Newline;
    config.chunking.max_chunk_chars = 800;
    config.save(&config_path)?;

    let loaded = Config::from_file(&config_path)?;
    assert_eq!(loaded.language, "de");
    assert_eq!(loaded.merge.join_policy, JoinPolicy::Newline);
    assert_eq!(loaded.chunking.max_chunk_chars, 800);
    Ok(())
}

/// Test partial config files fall back to defaults for missing fields
#[test]
fn test_config_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let config_path = common::create_test_file(&dir, "conf.json", r#"{"language": "fr"}"#)?;

    let config = Config::from_file(&config_path)?;
    assert_eq!(config.language, "fr");
    assert_eq!(config.chunking.max_chunk_chars, 1000);
    assert_eq!(config.log_level, LogLevel::Info);
    Ok(())
}

/// Test log level conversion to level filters
#[test]
fn test_log_level_toLevelFilter_shouldMap() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
}
