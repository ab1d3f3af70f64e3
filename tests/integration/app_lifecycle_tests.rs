/*!
 * Full app lifecycle tests for controller construction and error paths
 */

use anyhow::Result;
use capknow::app_config::Config;
use capknow::app_controller::Controller;
use crate::common;

/// Test controller construction with the default configuration
#[test]
fn test_controller_withDefaultConfig_shouldInitialize() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(controller.is_initialized());
    Ok(())
}

/// Test controller construction with a custom configuration
#[test]
fn test_controller_withCustomConfig_shouldInitialize() -> Result<()> {
    let mut config = Config::default();
    config.language = "de".to_string();
    config.chunking.max_chunk_chars = 500;

    let controller = Controller::with_config(config)?;
    assert!(controller.is_initialized());
    Ok(())
}

/// Test that a missing input file is reported as an error
#[tokio::test]
async fn test_run_withMissingInputFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = controller
        .run(
            temp_dir.path().join("does-not-exist.vtt"),
            temp_dir.path().join("out"),
            false,
        )
        .await;
    assert!(result.is_err());
    Ok(())
}

/// Test that a missing input directory is reported as an error
#[tokio::test]
async fn test_run_folder_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = controller
        .run_folder(
            temp_dir.path().join("does-not-exist"),
            temp_dir.path().join("out"),
            false,
        )
        .await;
    assert!(result.is_err());
    Ok(())
}

/// Test that a directory without matching caption files is an error
#[tokio::test]
async fn test_run_folder_withNoCaptionFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("empty");
    std::fs::create_dir_all(&input_dir)?;

    let controller = Controller::new_for_test()?;
    let result = controller
        .run_folder(input_dir, temp_dir.path().join("out"), false)
        .await;
    assert!(result.is_err());
    Ok(())
}
