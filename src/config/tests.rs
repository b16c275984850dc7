use std::io::Write;

use clap::Parser;
use serial_test::serial;

use super::*;

#[derive(Debug, Parser)]
struct Harness {
    #[command(flatten)]
    overrides: GlobalOverrides,
}

#[test]
fn defaults_point_at_local_api() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.api.base_url.as_str(), "http://127.0.0.1:8000/api/");
    assert_eq!(settings.api.timeout, Duration::from_secs(30));
    assert_eq!(settings.api.page_size.get(), 10);
    assert_eq!(settings.logging.level, LevelFilter::WARN);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(settings.session.file, PathBuf::from(".quill-session.toml"));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.api.page_size = Some(25);
    raw.logging.level = Some("info".to_string());

    let overrides = GlobalOverrides {
        page_size: Some(5),
        log_level: Some("debug".to_string()),
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.api.page_size.get(), 5);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn base_url_gains_trailing_slash() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("https://blog.example.com/api".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.api.base_url.as_str(), "https://blog.example.com/api/");
    assert_eq!(
        settings
            .api
            .base_url
            .join("blog/posts/")
            .expect("join")
            .as_str(),
        "https://blog.example.com/api/blog/posts/"
    );
}

#[test]
fn zero_values_are_rejected() {
    let mut raw = RawSettings::default();
    raw.api.page_size = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero page size");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "api.page_size",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.api.timeout_seconds = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn bad_url_and_level_are_rejected() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("ftp://example.com/".to_string());
    let err = Settings::from_raw(raw).expect_err("ftp scheme");
    assert!(err.to_string().contains("api.base_url"));

    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn global_flags_parse() {
    let harness = Harness::parse_from([
        "quill-cli",
        "--api-url",
        "http://localhost:9000/api/",
        "--page-size",
        "3",
        "--session-file",
        "/tmp/session.toml",
        "--log-json",
        "yes",
    ]);
    assert_eq!(
        harness.overrides.api_url.as_deref(),
        Some("http://localhost:9000/api/")
    );
    assert_eq!(harness.overrides.page_size, Some(3));
    assert_eq!(harness.overrides.log_json, Some(true));
    assert_eq!(
        harness.overrides.session_file,
        Some(PathBuf::from("/tmp/session.toml"))
    );
}

#[test]
#[serial]
fn file_then_env_then_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    writeln!(
        file,
        "[api]\nbase_url = \"http://file.example/api/\"\npage_size = 7\ntimeout_seconds = 12\n"
    )
    .expect("write config");

    // SAFETY: serialised with the other env-reading tests.
    unsafe { std::env::set_var("QUILL__API__PAGE_SIZE", "8") };
    let overrides = GlobalOverrides {
        config_file: Some(file.path().to_path_buf()),
        timeout_seconds: Some(3),
        ..Default::default()
    };
    let loaded = load(&overrides);
    unsafe { std::env::remove_var("QUILL__API__PAGE_SIZE") };

    let settings = loaded.expect("settings load");
    assert_eq!(settings.api.base_url.as_str(), "http://file.example/api/");
    assert_eq!(settings.api.page_size.get(), 8);
    assert_eq!(settings.api.timeout, Duration::from_secs(3));
}

#[test]
#[serial]
fn missing_explicit_config_file_fails() {
    let overrides = GlobalOverrides {
        config_file: Some(PathBuf::from("/definitely/not/here.toml")),
        ..Default::default()
    };
    assert!(matches!(load(&overrides), Err(LoadError::Build(_))));
}
