use chat_widget::Error;
use chat_widget::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CHAT_BACKEND__BASE_URL");
        env::remove_var("CHAT_BACKEND__TIMEOUT_SECS");
        env::remove_var("CHAT_BACKEND_URL");
        env::remove_var("CHAT_USER_NAME");
        env::remove_var("CHAT_SESSION_FILE");
        env::remove_var("CONFIG_FILE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["chat-widget"]).expect("defaults should load");
    assert_eq!(config.backend.base_url, "http://localhost:8100/");
    assert_eq!(config.backend.timeout_secs, 60);
    assert_eq!(config.user.label, "You");
    assert!(config.session.storage_path.is_none());
    assert!(config.greeting);

    let options = config.orchestrator_options();
    assert_eq!(options.leave_delay_secs, 10..=15);
    assert_eq!(options.persona.name, "Najd | نجد");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_BACKEND__BASE_URL", "http://chat.internal:9000/");
        env::set_var("CHAT_BACKEND__TIMEOUT_SECS", "5");
    }

    let config = AppConfig::load_from_args(["chat-widget"]).expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://chat.internal:9000/");
    assert_eq!(config.backend.timeout_secs, 5);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("CHAT_BACKEND__BASE_URL", "http://from-env/");
    }

    let config = AppConfig::load_from_args([
        "chat-widget",
        "--backend-url",
        "http://from-cli/",
        "--user-name",
        "Jaasim",
        "--session-file",
        "/tmp/chat-session.json",
        "--no-greeting",
    ])
    .expect("Failed to load config");

    assert_eq!(config.backend.base_url, "http://from-cli/");
    assert_eq!(config.user.name, "Jaasim");
    assert_eq!(
        config.session.storage_path.as_deref(),
        Some("/tmp/chat-session.json")
    );
    assert!(!config.greeting);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("chat.yaml");
    let config_content = r#"
backend:
  base_url: http://file-backend:8100/
persona:
  name: "Roaa | رؤى"
leave_request:
  min_delay_secs: 1
  max_delay_secs: 2
    "#;
    fs::write(&file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args([
        "chat-widget",
        "--config",
        file_path.to_str().unwrap(),
    ])
    .expect("Failed to load config from file");

    assert_eq!(config.backend.base_url, "http://file-backend:8100/");
    assert_eq!(config.persona.name, "Roaa | رؤى");
    // Fields the file leaves out keep their defaults.
    assert_eq!(config.persona.quick_replies.len(), 6);
    assert_eq!(config.orchestrator_options().leave_delay_secs, 1..=2);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["chat-widget", "--config", "/nonexistent/chat.yaml"]);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_inverted_delay_range_is_rejected() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("chat.yaml");
    fs::write(
        &file_path,
        "leave_request:\n  min_delay_secs: 20\n  max_delay_secs: 10\n",
    )
    .unwrap();

    let err = AppConfig::load_from_args(["chat-widget", "--config", file_path.to_str().unwrap()])
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("min_delay_secs"));
}
