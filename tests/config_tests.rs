//! Tests for configuration layering.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use newsbrief::config::{BriefConfig, DEFAULT_DISALLOWED_TOOLS};
use newsbrief::error::BriefError;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_the_briefing_setup() {
    let config = BriefConfig::default();
    assert_eq!(config.reader_base_url, "https://r.jina.ai");
    assert_eq!(config.return_format, "markdown");
    assert_eq!(config.fetch_timeout_ms, 30_000);
    assert_eq!(config.server_name, "news-briefing-server");
    assert_eq!(config.server_version, "1.0.0");
    assert_eq!(config.tool_name, "jinaReader");
    assert_eq!(config.disallowed_tools, DEFAULT_DISALLOWED_TOOLS);
    assert!(!config.debug);
    assert!(config.env.is_empty());
}

#[test]
fn toml_file_overrides_only_given_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
reader_base_url = "http://localhost:9000"
max_content_chars = 2000
disallowed_tools = ["WebFetch"]

[env]
ANTHROPIC_MODEL = "test-model"
"#
    )
    .unwrap();

    let config = BriefConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.reader_base_url, "http://localhost:9000");
    assert_eq!(config.max_content_chars, Some(2000));
    assert_eq!(config.disallowed_tools, ["WebFetch"]);
    assert_eq!(config.env.get("ANTHROPIC_MODEL").map(String::as_str), Some("test-model"));
    assert_eq!(config.tool_name, "jinaReader");
}

#[test]
fn missing_file_is_a_configuration_error() {
    let err = BriefConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, BriefError::Configuration(_)));
}

#[test]
fn malformed_toml_is_rejected() {
    let err = BriefConfig::from_toml_str("fetch_timeout_ms = \"soon\"").unwrap_err();
    assert!(matches!(err, BriefError::Toml(_)));
}

#[test]
fn invalid_values_are_rejected() {
    for raw in [
        "fetch_timeout_ms = 0",
        "tool_name = \" \"",
        "reader_base_url = \"ftp://reader\"",
    ] {
        let err = BriefConfig::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, BriefError::Configuration(_)), "{raw}");
    }
}

#[test]
fn variables_overlay_the_file() {
    let config = BriefConfig::from_toml_str("fetch_timeout_ms = 1000")
        .unwrap()
        .apply_vars(vars(&[
            ("NEWSBRIEF_READER_URL", "https://reader.internal"),
            ("NEWSBRIEF_FETCH_TIMEOUT_MS", "2500"),
            ("NEWSBRIEF_DEBUG", "true"),
            ("TARGET_DIR", "/srv/briefs"),
            ("ANTHROPIC_BASE_URL", "https://api.test"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

    assert_eq!(config.reader_base_url, "https://reader.internal");
    assert_eq!(config.fetch_timeout_ms, 2500);
    assert!(config.debug);
    assert_eq!(config.working_dir(), PathBuf::from("/srv/briefs"));
    assert_eq!(
        config.env.keys().map(String::as_str).collect::<Vec<_>>(),
        ["ANTHROPIC_BASE_URL"]
    );
}

#[test]
fn non_numeric_timeout_variable_is_rejected() {
    let err = BriefConfig::default()
        .apply_vars(vars(&[("NEWSBRIEF_FETCH_TIMEOUT_MS", "fast")]))
        .unwrap_err();
    assert!(matches!(err, BriefError::Configuration(_)));
}

#[test]
fn log_filter_follows_debug_from_env() {
    let config = BriefConfig::default()
        .apply_vars(vars(&[("NEWSBRIEF_DEBUG", "1")]))
        .unwrap();
    assert_eq!(config.log_filter(), "debug");
    assert_eq!(BriefConfig::default().log_filter(), "info");
}

#[cfg(feature = "cli")]
#[test]
fn cli_config_takes_debug_from_toml_without_flag() {
    use clap::Parser;
    use newsbrief::cli::Cli;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "debug = true").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let cli = Cli::try_parse_from(["newsbrief", "--config", &path, "fetch", "https://a.test"])
        .unwrap();
    assert!(!cli.debug);

    let config = cli.resolve_config(vars(&[])).unwrap();
    assert!(config.debug);
    assert_eq!(config.log_filter(), "debug");
}
