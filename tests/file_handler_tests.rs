// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for file handlers and handler dispatch.

mod common;

use cfghub::ports::MAX_CONFIG_FILE_SIZE;
use cfghub::prelude::*;
use common::write_file;
use std::path::Path;

#[test]
fn test_json_path_store_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "settings.json", r#"{"debug": true}"#);

    let store = JsonFileHandler::new().process_path(&path).unwrap().unwrap();
    assert_eq!(store.name(), Some("settings.json"));
    assert_eq!(store.kind(), &SourceKind::Json);
    assert_eq!(store.handler(), Some("JSON"));
    assert_eq!(
        store.origin(),
        Some(&Origin::Path(path.canonicalize().unwrap()))
    );

    let record = &store.applied_confs()[0];
    assert_eq!(record.kind, SourceKind::Json);
    assert_eq!(record.name.as_deref(), Some("settings.json"));
}

#[test]
fn test_invalid_json_path_is_no_match() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_file(dir.path(), "broken.json", "{not json");
    let array = write_file(dir.path(), "array.json", "[1, 2]");

    let handler = JsonFileHandler::new();
    assert!(handler.process_path(&broken).unwrap().is_none());
    assert!(handler.process_path(&array).unwrap().is_none());
}

#[test]
fn test_invalid_json_stream_is_error() {
    let result = JsonFileHandler::new().process_stream(&mut "{not json".as_bytes(), "inline");
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_oversized_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.json");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(MAX_CONFIG_FILE_SIZE + 1).unwrap();

    let result = cfghub::ports::read_config_file(&path);
    assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    assert!(JsonFileHandler::new().process_path(&path).unwrap().is_none());
}

#[test]
#[cfg(feature = "yaml")]
fn test_json_in_yaml_extension_goes_to_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "config.yaml", r#"{"a": 1}"#);

    let store = ConfigHub::new().config_from_file(&path, None).unwrap().unwrap();
    assert_eq!(store.kind(), &SourceKind::Yaml);
    assert_eq!(store.handler(), Some("YAML"));
}

#[test]
#[cfg(feature = "yaml")]
fn test_uppercase_extension() {
    let handler = YamlFileHandler::new();
    assert!(handler.handles(Path::new("CONFIG.YML")));
    assert!(!handler.handles(Path::new("config.yml.bak")));
}

#[test]
#[cfg(feature = "dotenv")]
fn test_dotenv_names() {
    let handler = DotEnvFileHandler::new();
    assert!(handler.handles(Path::new(".env")));
    assert!(handler.handles(Path::new("prod.env")));
    assert!(!handler.handles(Path::new(".envrc")));
}

#[test]
fn test_unknown_extension_with_strict_hub() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "config.toml", "a = 1");

    let hub = ConfigHub::builder()
        .skip_files_with_missing_handler(false)
        .build();
    let result = hub.aggregate(vec![path.as_path()]);
    assert!(matches!(result, Err(ConfigError::NoHandler { .. })));

    let store = ConfigHub::new().aggregate(vec![path.as_path()]).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_custom_handler_in_chain() {
    struct LinesHandler;

    impl FileHandler for LinesHandler {
        fn name(&self) -> &str {
            "Lines"
        }

        fn kind(&self) -> SourceKind {
            SourceKind::Custom("lines".to_string())
        }

        fn supported_extensions(&self) -> &[&str] {
            &["lines"]
        }

        fn parse(&self, content: &str) -> Result<ConfigMap> {
            Ok(content
                .lines()
                .filter_map(|line| line.split_once(':'))
                .map(|(k, v)| (k.trim().to_string(), ConfigValue::from(v.trim())))
                .collect())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "app.lines", "name: demo\nmode: fast\n");

    let hub = ConfigHub::builder().with_handler(LinesHandler).build();
    let store = hub.aggregate(vec![path.as_path()]).unwrap();

    assert_eq!(store.get("mode").unwrap(), Some(&ConfigValue::from("fast")));
    let record = store.applied_from("name").unwrap();
    assert_eq!(record.kind.as_str(), "lines");
    assert_eq!(record.handler.as_deref(), Some("Lines"));
}

#[test]
fn test_stream_requires_explicit_handler() {
    let mut stream = std::io::Cursor::new(br#"{"k": "v"}"#.to_vec());
    let store = ConfigHub::new()
        .config_from_stream(&mut stream, "Cursor", &JsonFileHandler::new())
        .unwrap();

    assert_eq!(store.kind(), &SourceKind::Io);
    assert_eq!(store.origin(), Some(&Origin::Object("Cursor".to_string())));
}
