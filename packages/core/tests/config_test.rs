//! Config Loading Tests

use curriculum_core::config::CONFIG_PATH_ENV;
use curriculum_core::{CurriculumConfig, CurriculumError};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("curriculum.json");
    fs::write(
        &path,
        r#"{"defaultSectionTitle": "Untitled lesson", "maxDepth": 8}"#,
    )
    .unwrap();

    let config = CurriculumConfig::load(&path).await.unwrap();
    assert_eq!(config.default_section_title, "Untitled lesson");
    assert_eq!(config.max_depth, 8);
    // unspecified fields keep their defaults
    assert!(config.validate_on_load);
    assert_eq!(config.max_nodes, CurriculumConfig::default().max_nodes);
}

#[tokio::test]
async fn test_unparsable_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("curriculum.json");
    fs::write(&path, "maxDepth = 8").unwrap();

    let err = CurriculumConfig::load(&path).await.unwrap_err();
    assert!(matches!(err, CurriculumError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_out_of_range_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("curriculum.json");
    fs::write(&path, r#"{"maxNodes": 0}"#).unwrap();

    let err = CurriculumConfig::load(&path).await.unwrap_err();
    assert!(matches!(err, CurriculumError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_config_path_from_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("curriculum.json");
    fs::write(&path, r#"{"validateOnLoad": false}"#).unwrap();

    // only this test touches the variable
    std::env::set_var(CONFIG_PATH_ENV, &path);
    let config = CurriculumConfig::from_env().await;
    std::env::remove_var(CONFIG_PATH_ENV);

    assert!(!config.unwrap().validate_on_load);
}
