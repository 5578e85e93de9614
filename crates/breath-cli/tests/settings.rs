//! Integration tests for settings loading.

use std::time::Duration;

use breath_cli::settings::Settings;
use tempfile::TempDir;

fn write_settings(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_explicit_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(
        &dir,
        r#"
        [services]
        registry_url = "http://registry.internal:5000/"
        timeout_secs = 30

        [ingest]
        parse_timeout_ms = 250
        page_size = 10

        [[training.diagnostic_codes]]
        code = "J44"
        label = "COPD"

        [user]
        email = "clinician@example.org"
        "#,
    );

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.services.registry_url, "http://registry.internal:5000/");
    assert_eq!(settings.services.timeout(), Duration::from_secs(30));
    assert_eq!(settings.services.training_url, "http://localhost:5002");
    assert_eq!(settings.ingest.parse_timeout(), Duration::from_millis(250));
    assert_eq!(settings.ingest.page_size, 10);
    assert_eq!(settings.training.diagnostic_codes.entries().len(), 1);
    assert_eq!(
        settings.user(None).map(|u| u.to_string()),
        Some("clinician@example.org".to_string())
    );
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let error = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(format!("{error:#}").contains("absent.toml"));
}

#[test]
fn test_explicit_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, "[ingest]\npage_size = \"many\"\n");
    let error = Settings::load(Some(&path)).unwrap_err();
    assert!(format!("{error:#}").contains("parse settings"));
}

#[test]
fn test_invalid_catalog_code_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(
        &dir,
        "[[training.diagnostic_codes]]\ncode = \"not a code\"\nlabel = \"x\"\n",
    );
    assert!(Settings::load(Some(&path)).is_err());
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, "");
    assert_eq!(Settings::load(Some(&path)).unwrap(), Settings::default());
}
