//! Config directory lifecycle

use tempfile::TempDir;

use qube::state::{AppConfig, AppState, StateError, CONFIG_FILE_NAME};

#[test]
fn test_init_then_load() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("qube");

    let config = AppConfig {
        pinata_jwt: Some("jwt".to_string()),
        ..Default::default()
    };
    let state = AppState::init(Some(dir.clone()), Some(config.clone())).unwrap();
    assert_eq!(state.config_path, dir.join(CONFIG_FILE_NAME));
    assert!(state.config_path.exists());

    let loaded = AppState::load(Some(dir)).unwrap();
    assert_eq!(loaded.config, config);
}

#[test]
fn test_init_twice_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();

    AppState::init(Some(dir.clone()), None).unwrap();
    let err = AppState::init(Some(dir), None).unwrap_err();
    assert!(matches!(err, StateError::AlreadyInitialized));
}

#[test]
fn test_load_missing_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("absent");

    assert!(matches!(
        AppState::load(Some(dir.clone())),
        Err(StateError::NotInitialized)
    ));

    let state = AppState::load_or_default(Some(dir)).unwrap();
    assert_eq!(state.config, AppConfig::default());
}

#[test]
fn test_load_directory_without_config() {
    let temp = TempDir::new().unwrap();
    let err = AppState::load(Some(temp.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, StateError::MissingFile(_)));
}

#[test]
fn test_malformed_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(CONFIG_FILE_NAME), "server_url = 12").unwrap();

    let err = AppState::load(Some(temp.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, StateError::TomlDe(_)));
}
