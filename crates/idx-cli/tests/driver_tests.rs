use clap::Parser;
use std::path::{Path, PathBuf};

use super::args::CliArgs;
use super::driver::{compile, resolve_options};

fn args(argv: &[&str]) -> CliArgs {
    let mut full = vec!["idx"];
    full.extend_from_slice(argv);
    CliArgs::try_parse_from(full).expect("args should parse")
}

fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn compiles_into_out_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(
        dir.path(),
        "src/app.js",
        "import idx from 'idx';\nconst name = idx(props, _ => _.user.name);\n",
    );

    let options = resolve_options(&args(&["--out-dir", "dist", "src/app.js"]), dir.path())
        .expect("options resolve");
    let result = compile(&options, dir.path()).expect("compile succeeds");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.emitted.len(), 1);
    let output = dir.path().join("dist/app.js");
    assert_eq!(result.emitted[0].output.as_deref(), Some(output.as_path()));
    let written = std::fs::read_to_string(&output).expect("output written");
    assert_eq!(
        written,
        "var _a, _b;\nconst name = (_a = props) != null ? (_b = _a.user) != null ? _b.name : _b : _a;\n"
    );
}

#[test]
fn same_basename_inputs_keep_their_layout() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a/x.js", "first = 1;\n");
    write_file(dir.path(), "b/x.js", "second = 2;\n");

    let options = resolve_options(&args(&["--out-dir", "dist", "a/x.js", "b/x.js"]), dir.path())
        .expect("options resolve");
    let result = compile(&options, dir.path()).expect("compile succeeds");

    assert!(result.diagnostics.is_empty());
    let first = dir.path().join("dist/a/x.js");
    let second = dir.path().join("dist/b/x.js");
    assert_eq!(result.emitted[0].output.as_deref(), Some(first.as_path()));
    assert_eq!(result.emitted[1].output.as_deref(), Some(second.as_path()));
    assert_eq!(std::fs::read_to_string(&first).expect("first written"), "first = 1;\n");
    assert_eq!(std::fs::read_to_string(&second).expect("second written"), "second = 2;\n");
    assert!(!dir.path().join("dist/x.js").exists());
}

#[test]
fn nested_inputs_are_relative_to_their_common_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "src/app.js", "x = 1;\n");
    write_file(dir.path(), "src/lib/util.js", "y = 2;\n");

    let options = resolve_options(
        &args(&["--out-dir", "dist", "src/app.js", "src/lib/util.js"]),
        dir.path(),
    )
    .expect("options resolve");
    compile(&options, dir.path()).expect("compile succeeds");

    assert!(dir.path().join("dist/app.js").is_file());
    assert!(dir.path().join("dist/lib/util.js").is_file());
}

#[test]
fn keeps_code_in_memory_without_out_dir() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "a.js", "x = idx(a, _ => _.b);\n");

    let options = resolve_options(&args(&["a.js"]), dir.path()).expect("options resolve");
    let result = compile(&options, dir.path()).expect("compile succeeds");

    assert_eq!(result.emitted[0].output, None);
    assert_eq!(result.emitted[0].code, "var _a;\nx = (_a = a) != null ? _a.b : _a;\n");
}

#[test]
fn collects_diagnostics_per_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "good.js", "x = idx(a, _ => _.b);\n");
    write_file(dir.path(), "bad.js", "y = idx(a);\n");

    let options = resolve_options(&args(&["--out-dir", "out", "good.js", "bad.js"]), dir.path())
        .expect("options resolve");
    let result = compile(&options, dir.path()).expect("compile succeeds");

    assert!(result.has_errors());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].file, "bad.js");
    assert_eq!(result.diagnostics[0].code, 9001);
    assert_eq!(result.emitted.len(), 1);
    assert!(dir.path().join("out/good.js").is_file());
    assert!(!dir.path().join("out/bad.js").exists());
    assert_eq!(result.sources["bad.js"], "y = idx(a);\n");
}

#[test]
fn reads_idx_json_from_cwd() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(
        dir.path(),
        "idx.json",
        r#"{ "marker": "get", "markerModule": "safe-get", "files": ["src/a.js"], "outDir": "lib" }"#,
    );
    write_file(
        dir.path(),
        "src/a.js",
        "import get from 'safe-get';\nx = get(a, _ => _.b);\n",
    );

    let options = resolve_options(&args(&[]), dir.path()).expect("options resolve");
    assert_eq!(options.emit.marker, "get");
    let result = compile(&options, dir.path()).expect("compile succeeds");

    assert!(result.diagnostics.is_empty());
    let written = std::fs::read_to_string(dir.path().join("lib/a.js")).expect("output written");
    assert_eq!(written, "var _a;\nx = (_a = a) != null ? _a.b : _a;\n");
}

#[test]
fn explicit_config_errors_carry_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_file(dir.path(), "conf/idx.json", "{ \"lowerAsync\": \"yes\" }");

    let err = resolve_options(&args(&["--config", "conf/idx.json", "a.js"]), dir.path())
        .unwrap_err();
    assert!(err.to_string().starts_with("failed to load config"), "{err:#}");
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = resolve_options(&args(&["nope.js"]), dir.path()).expect("options resolve");
    let err = compile(&options, dir.path()).unwrap_err();
    assert!(err.to_string().starts_with("failed to read"), "{err:#}");
}
