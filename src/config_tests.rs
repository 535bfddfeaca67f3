use super::*;
use std::collections::HashMap;

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, contents.as_bytes()).expect("write config");
    path
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_config(
        dir.path(),
        r#"{"schema_version": 1, "data_dir": "/tmp/mj", "language": "de"}"#,
    );
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/mj")));
    assert_eq!(config.language, Some(Language::De));
    assert_eq!(config.completion_url, DEFAULT_COMPLETION_URL);
    assert_eq!(config.api_key, None);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    assert!(load_config(Some(&dir.path().join("absent.json"))).is_err());
}

#[test]
fn unknown_fields_and_versions_are_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_config(dir.path(), r#"{"schema_version": 1, "model": "x"}"#);
    assert!(load_config(Some(&path)).is_err());

    let path = write_config(dir.path(), r#"{"schema_version": 2}"#);
    let err = load_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("schema_version 2"), "{err}");
}

#[test]
fn non_http_completion_url_is_rejected() {
    let config = AppConfig {
        completion_url: "ftp://example.com".to_string(),
        ..AppConfig::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn env_overrides_win_and_blank_values_are_ignored() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("MJ_DATA_DIR", "/data/journal"),
        ("MJ_COMPLETION_URL", "http://127.0.0.1:9/v1/chat/completions"),
        ("MJ_API_KEY", "  "),
        ("MJ_LANGUAGE", "pt-BR"),
    ]);
    let mut config = AppConfig {
        api_key: Some("from-file".to_string()),
        ..AppConfig::default()
    };
    apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

    assert_eq!(config.data_dir, Some(PathBuf::from("/data/journal")));
    assert_eq!(config.completion_url, "http://127.0.0.1:9/v1/chat/completions");
    assert_eq!(config.api_key.as_deref(), Some("from-file"));
    assert_eq!(config.language, Some(Language::Pt));
}

#[test]
fn redacted_config_masks_the_key() {
    let config = AppConfig {
        api_key: Some("sk-secret".to_string()),
        ..AppConfig::default()
    };
    let text = serde_json::to_string(&config.redacted()).unwrap();
    assert!(!text.contains("sk-secret"));
    assert!(text.contains("********"));
}

#[test]
fn explicit_data_dir_is_used() {
    let config = AppConfig {
        data_dir: Some(PathBuf::from("/srv/mj")),
        ..AppConfig::default()
    };
    assert_eq!(resolve_data_dir(&config).unwrap(), PathBuf::from("/srv/mj"));
}
