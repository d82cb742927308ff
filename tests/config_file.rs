//! 配置文件加载测试

use rat_cms_odm::{
    DatabaseBackend, LogLevel, LoggingConfig, OdmConfig, OdmErrorKind, memory_config, mongodb_config,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn json_file() -> NamedTempFile {
    tempfile::Builder::new().suffix(".json").tempfile().unwrap()
}

fn sample_config() -> OdmConfig {
    OdmConfig::builder()
        .database(mongodb_config("mongodb://localhost:27017", "cms").unwrap())
        .logging(LoggingConfig::builder().level(LogLevel::Info).console(true).build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odm.toml");
    let config = sample_config();
    config.save_to_file(&path).unwrap();

    let loaded = OdmConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_json() {
    let mut file = json_file();
    write!(
        file,
        r#"{{
            "database": {{ "backend": {{ "type": "Memory" }} }},
            "logging": {{ "level": "Debug", "console": false }}
        }}"#
    )
    .unwrap();

    let loaded = OdmConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded.database.backend, DatabaseBackend::Memory);
    assert_eq!(loaded.logging.level, LogLevel::Debug);
    assert!(!loaded.logging.console);
}

#[test]
fn test_load_toml_text() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[database.backend]
type = "MongoDB"
uri = "mongodb://db:27017"
database = "content"

[logging]
level = "Warn"
console = true
"#
    )
    .unwrap();

    let loaded = OdmConfig::from_file(file.path()).unwrap();
    assert_eq!(
        loaded.database.backend,
        DatabaseBackend::MongoDB {
            uri: "mongodb://db:27017".into(),
            database: "content".into(),
        }
    );
}

#[test]
fn test_invalid_files_rejected() {
    let mut file = json_file();
    write!(file, "not json").unwrap();
    let err = OdmConfig::from_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), OdmErrorKind::Config);

    let mut file = json_file();
    write!(
        file,
        r#"{{"database":{{"backend":{{"type":"MongoDB","uri":"","database":"cms"}}}},"logging":{{"level":"Info","console":false}}}}"#
    )
    .unwrap();
    assert!(OdmConfig::from_file(file.path()).is_err());

    assert!(OdmConfig::from_file("/nonexistent/odm.toml").is_err());
}

#[test]
fn test_builders_are_strict() {
    assert!(OdmConfig::builder().database(memory_config().unwrap()).build().is_err());
    assert!(mongodb_config("", "cms").is_err());
    assert!(mongodb_config("mongodb://localhost", " ").is_err());
}
