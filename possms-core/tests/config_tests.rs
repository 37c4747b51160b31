//! Config error-message, atomic-write-safety, and init integration tests.
//! Storage: ~/.possms/config.yaml

use assert_fs::prelude::*;
use possms_core::{config, PosConfig, StoreError};
use predicates::prelude::predicate;
use std::fs;

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_not_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, StoreError::ConfigNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("possms config init"));
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".possms");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("config.yaml"), b": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn load_wrong_type_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".possms").create_dir_all().expect("mkdir");
    home.child(".possms/config.yaml")
        .write_str("enable_sms_receipt: \"maybe\"\n")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_config_file() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut wanted = PosConfig::default();
    wanted.enable_sms_receipt = true;
    wanted.backend.url = "https://pos.example.com".into();

    config::init_at(home.path(), wanted).expect("init");

    home.child(".possms/config.yaml")
        .assert(predicate::str::contains("enable_sms_receipt: true"))
        .assert(predicate::str::contains("https://pos.example.com"));
}

#[test]
fn init_is_idempotent_and_keeps_existing_values() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut first = PosConfig::default();
    first.company.name = "Kaffebaren".into();
    config::init_at(home.path(), first.clone()).expect("first init");

    let mut second = PosConfig::default();
    second.company.name = "Other".into();
    let kept = config::init_at(home.path(), second).expect("second init");
    assert_eq!(kept, first);
}

#[cfg(unix)]
#[test]
fn saved_config_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let home = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(home.path(), &PosConfig::default()).expect("save");
    let mode = fs::metadata(config::config_path_at(home.path()))
        .expect("metadata")
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}
