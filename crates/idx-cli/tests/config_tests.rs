use clap::Parser;
use std::path::{Path, PathBuf};

use super::args::CliArgs;
use super::config::{ConfigError, IdxConfig, find_config, load_config, parse_config, resolve_options};
use idx_emitter::{EmitOptions, PassOrder};

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["idx"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).expect("args should parse")
}

#[test]
fn parses_camel_case_keys() {
    let config = parse_config(
        r#"{
            "marker": "get",
            "markerModule": "safe-get",
            "lowerAsync": true,
            "passOrder": "async-first",
            "stripMarkerImports": false,
            "outDir": "dist",
            "files": ["a.js", "b.js"]
        }"#,
    )
    .expect("config should parse");

    assert_eq!(config.marker.as_deref(), Some("get"));
    assert_eq!(config.marker_module.as_deref(), Some("safe-get"));
    assert_eq!(config.lower_async, Some(true));
    assert_eq!(config.pass_order, Some(PassOrder::AsyncFirst));
    assert_eq!(config.strip_marker_imports, Some(false));
    assert_eq!(config.out_dir.as_deref(), Some("dist"));
    assert_eq!(config.files.as_ref().map(Vec::len), Some(2));
}

#[test]
fn rejects_unknown_keys_and_values() {
    assert!(parse_config(r#"{ "markr": "idx" }"#).is_err());
    assert!(parse_config(r#"{ "passOrder": "sideways" }"#).is_err());
}

#[test]
fn empty_config_resolves_to_defaults() {
    let resolved = resolve_options(&args(&["a.js"]), &IdxConfig::default(), Path::new("/base"))
        .expect("resolves");
    assert_eq!(resolved.emit, EmitOptions::default());
    assert_eq!(resolved.files, vec![PathBuf::from("a.js")]);
    assert_eq!(resolved.out_dir, None);
}

#[test]
fn flags_override_config_values() {
    let config = IdxConfig {
        marker: Some("get".to_string()),
        pass_order: Some(PassOrder::AsyncFirst),
        strip_marker_imports: Some(true),
        out_dir: Some("dist".to_string()),
        ..IdxConfig::default()
    };
    let resolved = resolve_options(
        &args(&[
            "--marker",
            "pick",
            "--pass-order",
            "idx-first",
            "--keep-marker-imports",
            "--out-dir",
            "out",
            "a.js",
        ]),
        &config,
        Path::new("/base"),
    )
    .expect("resolves");

    assert_eq!(resolved.emit.marker, "pick");
    assert_eq!(resolved.emit.pass_order, PassOrder::IdxFirst);
    assert!(!resolved.emit.strip_marker_imports);
    assert_eq!(resolved.out_dir, Some(PathBuf::from("out")));
}

#[test]
fn config_paths_are_relative_to_config_dir() {
    let config = IdxConfig {
        files: Some(vec!["src/a.js".to_string()]),
        out_dir: Some("dist".to_string()),
        lower_async: Some(true),
        ..IdxConfig::default()
    };
    let resolved = resolve_options(&args(&[]), &config, Path::new("/proj")).expect("resolves");
    assert_eq!(resolved.files, vec![PathBuf::from("/proj/src/a.js")]);
    assert_eq!(resolved.out_dir, Some(PathBuf::from("/proj/dist")));
    assert!(resolved.emit.lower_async);
}

#[test]
fn invalid_marker_is_rejected() {
    for marker in ["", "1idx", "a-b", "a.b"] {
        let err = resolve_options(
            &args(&["--marker", marker, "a.js"]),
            &IdxConfig::default(),
            Path::new("/"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMarker(_)), "{marker}");
    }
}

#[test]
fn missing_inputs_are_rejected() {
    let err = resolve_options(&args(&[]), &IdxConfig::default(), Path::new("/")).unwrap_err();
    assert!(matches!(err, ConfigError::NoInputFiles));
}

#[test]
fn loads_and_finds_config_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert_eq!(find_config(dir.path()), None);

    let path = dir.path().join("idx.json");
    std::fs::write(&path, r#"{ "marker": "get" }"#).expect("write config");
    assert_eq!(find_config(dir.path()), Some(path.clone()));
    assert_eq!(
        load_config(&path).expect("loads").marker.as_deref(),
        Some("get")
    );

    std::fs::write(&path, "{ not json").expect("write config");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("failed to parse "));

    let missing = load_config(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, ConfigError::Read { .. }));
}
