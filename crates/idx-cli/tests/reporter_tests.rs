use super::reporter::Reporter;
use idx_common::Diagnostic;

const SOURCE: &str = "const a = 1;\nconst b = idx(a);\n";

fn reporter() -> Reporter {
    let mut reporter = Reporter::new(false);
    reporter.add_source("src/app.js", SOURCE);
    reporter
}

fn arity_error() -> Diagnostic {
    Diagnostic::error(
        "src/app.js",
        23,
        6,
        "The `idx` function takes exactly two arguments.",
        9001,
    )
}

#[test]
fn formats_location_code_and_snippet() {
    let rendered = reporter().render(&[arity_error()]);
    assert_eq!(
        rendered,
        "src/app.js(2,11) - error IDX9001: The `idx` function takes exactly two arguments.\n    2   const b = idx(a);\n                  ~~~~~~"
    );
}

#[test]
fn separates_multiple_diagnostics() {
    let second = Diagnostic::error("src/app.js", 0, 5, "'x' expected.", 1005);
    let rendered = reporter().render(&[arity_error(), second]);
    assert_eq!(rendered.matches(" - error IDX").count(), 2);
    assert!(rendered.contains("\nsrc/app.js(1,1) - error IDX1005: 'x' expected."));
}

#[test]
fn unknown_file_has_no_location() {
    let diag = Diagnostic::error("missing/nowhere.js", 0, 1, "boom", 1);
    let rendered = Reporter::new(false).render(&[diag]);
    assert_eq!(rendered, "missing/nowhere.js - error IDX1: boom");
}

#[test]
fn renders_json() {
    let json = reporter()
        .render_json(&[arity_error()])
        .expect("serializes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    let entry = &value[0];
    assert_eq!(entry["file"], "src/app.js");
    assert_eq!(entry["line"], 2);
    assert_eq!(entry["column"], 11);
    assert_eq!(entry["start"], 23);
    assert_eq!(entry["length"], 6);
    assert_eq!(entry["category"], "error");
    assert_eq!(entry["code"], "IDX9001");
    assert_eq!(
        entry["message"],
        "The `idx` function takes exactly two arguments."
    );
}
