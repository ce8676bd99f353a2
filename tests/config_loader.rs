mod common;

use argbind::{ArgumentParser, ConfigError, ParserConfig};
use common::temp_parser_config;

/// Test that a config file on disk is loaded and validated.
#[test]
fn test_load_config_from_file() {
    let (_dir, path) = temp_parser_config(
        r#"
long_prefix = "//"
short_prefix = "/"
end_of_options = "//"
value_separator = ":"
group_short_options = false
"#,
    );

    let config = ParserConfig::load(&path).unwrap();
    assert_eq!(config.long_prefix, "//");
    assert_eq!(config.short_prefix, "/");
    assert_eq!(config.value_separator, ':');
    assert!(!config.group_short_options);
    assert!(config.attached_values);
    assert!(config.negative_numbers_are_free);
}

/// Test that a missing file is a read error naming the path.
#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    match ParserConfig::load(&path) {
        Err(ConfigError::ReadError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

/// Test that parse errors report the file path.
#[test]
fn test_parse_error_mentions_path() {
    let (_dir, path) = temp_parser_config("value_separator = \"too long\"");

    let err = ParserConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert!(err.to_string().contains("parser.toml"));
}

/// Test that invalid combinations are rejected on load.
#[test]
fn test_separator_inside_prefix_is_rejected() {
    let (_dir, path) = temp_parser_config(
        r#"
long_prefix = "=="
short_prefix = "="
end_of_options = "--"
"#,
    );

    assert!(matches!(
        ParserConfig::load(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// Test that a loaded config drives the parser.
#[test]
fn test_loaded_config_drives_parser() {
    let (_dir, path) = temp_parser_config(
        r#"
case_sensitive = false
negative_numbers_are_free = false
"#,
    );
    let config = ParserConfig::load(&path).unwrap();

    let mut level = 0i32;
    let mut one = false;
    let result = {
        let mut parser = ArgumentParser::with_config(config).unwrap();
        parser.add_option(&mut level, ["--Level"]).unwrap();
        parser.add_option(&mut one, ["-1"]).unwrap();
        parser.parse_args(["--LEVEL", "7", "-1"])
    };

    assert!(result.is_ok(), "{:?}", result.errors());
    assert_eq!(level, 7);
    assert!(one);
}

/// Test that an invalid config cannot build a parser.
#[test]
fn test_invalid_config_rejected_by_parser() {
    let config = ParserConfig {
        short_prefix: String::new(),
        ..ParserConfig::default()
    };

    assert!(matches!(
        ArgumentParser::with_config(config),
        Err(ConfigError::ValidationError { .. })
    ));
}
