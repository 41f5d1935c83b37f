use std::fs;

use ingot_conf::{DocumentLoader, SchemaVersion, assemble};
use ingot_core::{BuildContext, ConfigError, TypeRegistry};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_single_json_keeps_service_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "services": { "stats": {}, "policy": {}, "reverse": {} } }"#,
    )
    .unwrap();

    let document = DocumentLoader::new().file(&path).load().unwrap();
    let keys: Vec<_> = document["services"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["stats", "policy", "reverse"]);

    let types = TypeRegistry::collect_all();
    let assembly = assemble(&document, SchemaVersion::Auto, &BuildContext::new(&types)).unwrap();
    assert_eq!(
        &assembly.app_types()[4..],
        &[
            "ingot.app.stats.Config",
            "ingot.app.policy.Config",
            "ingot.app.reverse.Config",
        ]
    );
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_later_files_override() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.json");
    fs::write(
        &base,
        serde_json::to_string(&json!({
            "log": { "loglevel": "warning", "access": "none" },
            "outbound": { "protocol": "freedom" }
        }))
        .unwrap(),
    )
    .unwrap();
    let overlay = dir.path().join("overlay.yaml");
    fs::write(
        &overlay,
        serde_yaml::to_string(&json!({ "log": { "loglevel": "debug" } })).unwrap(),
    )
    .unwrap();

    let document = DocumentLoader::new()
        .file(&base)
        .file(&overlay)
        .load()
        .unwrap();
    assert_eq!(document["log"]["loglevel"], "debug");
    assert_eq!(document["log"]["access"], "none");
    assert_eq!(document["outbound"]["protocol"], "freedom");
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_keeps_service_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "services:\n  stats: {}\n  policy: {}\n  reverse: {}\n").unwrap();

    let document = DocumentLoader::new().file(&path).load().unwrap();
    let types = TypeRegistry::collect_all();
    let assembly = assemble(&document, SchemaVersion::Auto, &BuildContext::new(&types)).unwrap();
    assert_eq!(
        &assembly.app_types()[4..],
        &[
            "ingot.app.stats.Config",
            "ingot.app.policy.Config",
            "ingot.app.reverse.Config",
        ]
    );
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_overlay_keeps_service_order() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.yaml");
    fs::write(&base, "services:\n  stats: {}\n  policy: {}\n").unwrap();
    let overlay = dir.path().join("overlay.json");
    fs::write(
        &overlay,
        r#"{ "services": { "reverse": {}, "policy": { "levels": { "0": { "handshake": 2 } } } } }"#,
    )
    .unwrap();

    let document = DocumentLoader::new()
        .file(&base)
        .file(&overlay)
        .load()
        .unwrap();
    let keys: Vec<_> = document["services"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["stats", "policy", "reverse"]);
    assert_eq!(document["services"]["policy"]["levels"]["0"]["handshake"], 2);
}

#[test]
fn test_missing_document() {
    let dir = TempDir::new().unwrap();
    let err = DocumentLoader::new()
        .file(dir.path().join("absent.json"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_malformed_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"log\": ").unwrap();

    let err = DocumentLoader::new().file(&path).load().unwrap_err();
    assert!(matches!(err, ConfigError::DocumentParse { .. }));
}
