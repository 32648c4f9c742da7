use super::*;

#[test]
fn test_defaults() {
    let config = ProjectConfig::default();
    assert_eq!(config.tools.perl, "perl");
    assert_eq!(config.tools.java_heap, "2G");
    assert_eq!(config.tools.timeout_secs, 600);
    assert_eq!(config.ngrams.orders, vec![1, 2, 3, 4]);
    assert!(config.defaults.clean_tokens.is_none());
}

#[test]
fn test_parse_partial_toml() {
    let config: ProjectConfig = toml::from_str(
        r#"
[tools]
bleu_script = "scripts/multi-bleu.perl"
timeout_secs = 0

[ngrams]
orders = [1, 2]
"#,
    )
    .unwrap();
    assert_eq!(config.tools.bleu_script, PathBuf::from("scripts/multi-bleu.perl"));
    assert_eq!(config.tools.timeout_secs, 0);
    // unspecified fields keep their defaults
    assert_eq!(config.tools.java, "java");
    assert_eq!(config.ngrams.orders, vec![1, 2]);
}

#[test]
fn test_env_overrides() {
    let mut config = ProjectConfig::default();
    config.apply_overrides(|key| match key {
        "TEXTMETRICS_METEOR_JAR" => Some("/opt/meteor.jar".to_string()),
        "TEXTMETRICS_PERL" => Some("/usr/bin/perl".to_string()),
        _ => None,
    });
    assert_eq!(config.tools.meteor_jar, PathBuf::from("/opt/meteor.jar"));
    assert_eq!(config.tools.perl, "/usr/bin/perl");
    assert_eq!(config.tools.java, "java");
}

#[test]
fn test_validate_rejects_zero_order() {
    let mut config = ProjectConfig::default();
    config.ngrams.orders = vec![0, 1];
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_duplicate_orders() {
    let mut config = ProjectConfig::default();
    config.ngrams.orders = vec![1, 2, 1];
    match config.validate() {
        Err(ConfigError::Invalid(msg)) => assert!(msg.contains("order 1"), "{}", msg),
        other => panic!("expected Invalid, got {:?}", other),
    }
    config.ngrams.orders = vec![2, 1];
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_verbosity() {
    let mut config = ProjectConfig::default();
    config.defaults.verbosity = Some(2);
    assert!(config.validate().is_err());
    config.defaults.verbosity = Some(0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_missing_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = load_project_config(Some(missing.as_path()), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILENAME), "[tools\nperl = ").unwrap();
    let err = load_project_config(None, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILENAME),
        "[defaults]\nverbosity = 0\nformat = \"csv\"\n",
    )
    .unwrap();
    let config = load_project_config(None, dir.path()).unwrap();
    assert_eq!(config.defaults.verbosity, Some(0));
    assert_eq!(config.defaults.format.as_deref(), Some("csv"));
}
