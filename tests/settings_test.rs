use respire::presentation::config::{Environment, ModelProvider, Settings};

#[test]
fn given_no_overrides_when_loading_defaults_then_matches_documented_values() {
    let settings = Settings::defaults().unwrap();

    assert_eq!(settings.server.port, 8001);
    assert_eq!(settings.model.provider, ModelProvider::Onnx);
    assert_eq!(settings.model.mock_seed, None);
    assert_eq!(settings.limits.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(settings.limits.max_clip_seconds, 5.0);
    assert!(!settings.logging.json);

    let limits = settings.limits.to_limits();
    assert_eq!(limits.request_timeout.as_secs(), 30);
}

#[test]
fn given_environment_names_when_parsing_then_accepts_aliases() {
    assert_eq!(
        Environment::try_from("production".to_string()),
        Ok(Environment::Prod)
    );
    assert_eq!(Environment::try_from(" Test ".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from("dev".to_string()), Ok(Environment::Local));
}

#[test]
fn given_unknown_environment_when_parsing_then_returns_error() {
    let err = Environment::try_from("staging".to_string()).unwrap_err();

    assert!(err.contains("staging"));
}

#[test]
fn given_environment_when_resolving_settings_file_then_uses_env_name() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
    assert_eq!(Environment::default(), Environment::Local);
}
