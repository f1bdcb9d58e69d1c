use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    settings
        .apply_file(
            r#"
server_url = "http://inventory.local:8080"
request_timeout_secs = 5
command_queue_depth = 0
"#,
        )
        .expect("apply file");

    assert_eq!(
        settings.server_url.as_deref(),
        Some("http://inventory.local:8080")
    );
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    assert_eq!(settings.command_queue_depth, 1);
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(settings.apply_file("request_timeout_secs = \"soon\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("CONSOLE_SERVER_URL", "http://a"),
        ("APP__SERVER_URL", "http://b"),
        ("APP__REQUEST_TIMEOUT_SECS", "12"),
        ("APP__LOG_FILTER", "console=debug"),
    ]);
    let mut settings = Settings::default();
    settings
        .apply_env(|key| vars.get(key).map(|v| v.to_string()))
        .expect("apply env");

    assert_eq!(settings.server_url.as_deref(), Some("http://b"));
    assert_eq!(settings.request_timeout_secs, 12);
    assert_eq!(settings.log_filter, "console=debug");
}

#[test]
fn malformed_env_timeout_is_an_error() {
    let mut settings = Settings::default();
    let err = settings
        .apply_env(|key| (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "soon".to_string()))
        .expect_err("bad timeout");

    assert!(err.to_string().contains("APP__REQUEST_TIMEOUT_SECS"));
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn zero_timeout_is_raised_to_one_second() {
    let mut settings = Settings::default();
    settings
        .apply_file("request_timeout_secs = 0")
        .expect("apply file");
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));

    settings
        .apply_env(|key| (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "0".to_string()))
        .expect("apply env");
    assert_eq!(settings.request_timeout_secs, 1);

    settings.set_request_timeout_secs(0);
    assert_eq!(settings.request_timeout_secs, 1);
}

#[test]
fn explicit_config_path_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("ctrl_console_missing_{suffix}.toml"));

    let err = load_settings(Some(&missing)).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn explicit_config_path_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("ctrl_console_test_{suffix}.toml"));
    fs::write(&path, "event_queue_depth = 8\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.event_queue_depth, 8);

    fs::remove_file(path).expect("cleanup");
}
