//! End-to-end tests of the `idx` binary.

use std::path::Path;
use std::process::{Command, Output};

fn run(cwd: &Path, argv: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_idx"))
        .args(argv)
        .current_dir(cwd)
        .env_remove("IDX_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run idx binary")
}

#[test]
fn prints_transformed_code_to_stdout() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("a.js"),
        "import idx from 'idx';\nx = idx(a, _ => _.b);\n",
    )
    .expect("write input");

    let output = run(dir.path(), &["a.js"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "var _a;\nx = (_a = a) != null ? _a.b : _a;\n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn reports_marker_errors_and_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("bad.js"), "y = idx(a, x => {});\n").expect("write input");

    let output = run(dir.path(), &["--pretty", "false", "bad.js"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with("bad.js(1,5) - error IDX9005: The body of the function supplied to `idx` must be a single expression (without curly braces)."),
        "{stderr}"
    );
    assert!(stderr.contains("~~~~~~~~~~~~~~~"), "{stderr}");
}

#[test]
fn json_diagnostics() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("bad.js"), "idx(a, b);\n").expect("write input");

    let output = run(dir.path(), &["--diagnostics", "json", "bad.js"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr is json");
    assert_eq!(value[0]["code"], "IDX9002");
    assert_eq!(value[0]["line"], 1);
}

#[test]
fn lowers_async_with_flag() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("a.js"),
        "async function f(p) { return idx(await p, _ => _.q); }\n",
    )
    .expect("write input");

    let output = run(dir.path(), &["--lower-async", "--pass-order", "async-first", "a.js"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("var __awaiter ="), "{stdout}");
    assert!(stdout.contains("function* () {\n        var _a;\n        return (_a = yield p) != null ? _a.q : _a;"), "{stdout}");
}
