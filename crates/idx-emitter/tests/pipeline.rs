use super::*;
use crate::transforms::helpers::AWAITER_HELPER;

fn emit(source: &str) -> String {
    emit_with(source, &EmitOptions::default())
}

fn emit_with(source: &str, options: &EmitOptions) -> String {
    match transpile("test.js", source, options) {
        Ok(output) => output.code,
        Err(diagnostics) => panic!("unexpected diagnostics: {diagnostics:?}"),
    }
}

fn errors(source: &str) -> Vec<Diagnostic> {
    match transpile("test.js", source, &EmitOptions::default()) {
        Ok(output) => panic!("expected diagnostics, got:\n{}", output.code),
        Err(diagnostics) => diagnostics,
    }
}

fn with_async(pass_order: PassOrder) -> EmitOptions {
    EmitOptions {
        lower_async: true,
        pass_order,
        ..EmitOptions::default()
    }
}

#[test]
fn test_property_chain_end_to_end() {
    assert_eq!(
        emit("import idx from 'idx';\nconst x = idx(b, b => b.c.d.e);"),
        "var _a, _b, _c;\nconst x = (_a = b) != null ? (_b = _a.c) != null ? (_c = _b.d) != null ? _c.e : _c : _b : _a;\n"
    );
}

#[test]
fn test_call_chain_end_to_end() {
    let output = emit("x = idx(b, b => b.c(...args)().d(x, null, [...y]));");
    assert_eq!(output.matches("!= null").count(), 5);
    assert!(output.starts_with("var _a, _b, _c, _d, _e;\n"), "{output}");
    assert!(output.contains("_e(x, null, [...y]) : _e"), "{output}");
}

#[test]
fn test_computed_chain_end_to_end() {
    let output = emit("x = idx(b, b => b[\"k\"][0][expr]);");
    assert_eq!(output.matches("!= null").count(), 3);
    assert!(output.contains("? _c[expr] : _c"), "{output}");
}

#[test]
fn test_declared_temporaries_and_guards_per_link() {
    // (path, declared temporaries, guards)
    let cases = [
        ("b => b.c.d.e", 3, 3),
        ("b => b.c(...args)().d(x, null, [...y])", 5, 5),
        ("b => b[\"k\"][0][expr]", 3, 3),
        ("b => b.c", 1, 1),
        ("b => b", 0, 0),
    ];
    for (path, temporaries, guards) in cases {
        let output = emit(&format!("x = idx(b, {path});"));
        let declared = match output.lines().next() {
            Some(first) if first.starts_with("var ") => first
                .trim_start_matches("var ")
                .trim_end_matches(';')
                .split(", ")
                .count(),
            _ => 0,
        };
        assert_eq!(declared, temporaries, "{path}:\n{output}");
        assert_eq!(output.matches("!= null").count(), guards, "{path}:\n{output}");
    }
}

#[test]
fn test_loose_null_check_only() {
    let output = emit("x = idx(b, b => b.c);");
    assert!(output.contains("!= null"));
    assert!(!output.contains("!=="));
    assert!(!output.contains("undefined"));
}

#[test]
fn test_marker_reference_without_call_is_unchanged() {
    let source = "import idx from 'idx';\nconst f = idx;\n";
    assert_eq!(emit(source), source);
}

#[test]
fn test_file_without_markers_round_trips() {
    let source = "function f(a) {\n    return a.b;\n}\n";
    assert_eq!(emit(source), source);
}

#[test]
fn test_marker_imports_can_be_kept() {
    let options = EmitOptions {
        strip_marker_imports: false,
        ..EmitOptions::default()
    };
    assert_eq!(
        emit_with("import idx from 'idx';\nx = idx(a, _ => _.b);", &options),
        "var _a;\nimport idx from 'idx';\nx = (_a = a) != null ? _a.b : _a;\n"
    );
}

#[test]
fn test_validator_rejections() {
    let cases = [
        ("idx();", 9001),
        ("idx(x);", 9001),
        ("idx(x, y, z);", 9001),
        ("idx(b, y);", 9002),
        ("idx(b, (x, y) => x);", 9003),
        ("idx(b, (...x) => x);", 9004),
        ("idx(b, x => {});", 9005),
        ("idx(b, x => other.prop);", 9006),
        ("idx(b, x => (x).prop);", 9006),
        ("idx(b, function (x) { return x.y; });", 9005),
    ];
    for (source, code) in cases {
        let diagnostics = errors(source);
        assert_eq!(diagnostics.len(), 1, "{source}");
        assert_eq!(diagnostics[0].code, code, "{source}");
        assert_eq!(diagnostics[0].file, "test.js");
        assert_eq!(diagnostics[0].start, 0);
        assert_eq!(diagnostics[0].length as usize, source.len() - 1);
    }
}

#[test]
fn test_parenthesized_path_function_is_accepted() {
    assert_eq!(
        emit("x = idx(a, (_ => _.b));"),
        "var _a;\nx = (_a = a) != null ? _a.b : _a;\n"
    );
}

#[test]
fn test_syntax_errors_are_reported() {
    let diagnostics = errors("x = (;");
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.code < 9000 && d.file == "test.js"));
}

#[test]
fn test_custom_marker() {
    let options = EmitOptions {
        marker: "get".to_string(),
        marker_module: "safe-get".to_string(),
        ..EmitOptions::default()
    };
    assert_eq!(
        emit_with("import get from 'safe-get';\nx = get(a, _ => _.b);\ny = idx(a);", &options),
        "var _a;\nx = (_a = a) != null ? _a.b : _a;\ny = idx(a);\n"
    );
}

#[test]
fn test_async_lowering_prepends_helper_once() {
    let output = transpile(
        "test.js",
        "async function f() { await a; }\nasync function g() { await b; }",
        &with_async(PassOrder::IdxFirst),
    )
    .expect("transpiles");
    assert!(output.helpers.awaiter);
    assert!(output.code.starts_with(AWAITER_HELPER));
    assert_eq!(output.code.matches("var __awaiter =").count(), 1);
}

#[test]
fn test_helper_follows_directive_prologue() {
    let output = emit_with(
        "'use strict';\nf = async () => 1;",
        &with_async(PassOrder::IdxFirst),
    );
    assert!(output.starts_with("'use strict';\nvar __awaiter ="), "{output}");
}

#[test]
fn test_async_arrow_with_marker() {
    assert_eq!(
        emit_with("f = async (p) => idx(await p, _ => _.a);", &with_async(PassOrder::IdxFirst))
            .trim_start_matches(AWAITER_HELPER),
        "\nf = (p) => __awaiter(this, void 0, void 0, function* () {\n    var _a;\n    return (_a = yield p) != null ? _a.a : _a;\n});\n"
    );
}

#[test]
fn test_pass_order_produces_identical_output() {
    let sources = [
        "async function f(props) {\n  'use strict';\n  const user = await load(props);\n  return idx(user, _ => _.profile.name);\n}",
        "const f = async (p) => idx(p, _ => _.a.b);",
        "const g = async (p) => { return idx(await p, _ => _.a[0]()); };",
        "async function h(a = idx(b, _ => _.c)) { return idx(a, _ => _.d); }",
        "x = idx(a, _ => _.b);\nasync function k() { return arguments.length + idx(c, _ => _.d); }",
        "const m = async function () { const n = async () => idx(await o, _ => _.p); return n; };",
    ];
    for source in sources {
        let idx_first = emit_with(source, &with_async(PassOrder::IdxFirst));
        let async_first = emit_with(source, &with_async(PassOrder::AsyncFirst));
        assert_eq!(idx_first, async_first, "{source}");
        assert!(!idx_first.contains("idx("), "{idx_first}");
        assert!(!idx_first.contains("async "), "{idx_first}");
    }
}

#[test]
fn test_async_path_function_is_rejected_in_both_orders() {
    let source = "x = idx(b, async x => x.c);";
    for options in [
        EmitOptions::default(),
        with_async(PassOrder::IdxFirst),
        with_async(PassOrder::AsyncFirst),
    ] {
        let diagnostics = match transpile("test.js", source, &options) {
            Ok(output) => panic!("expected diagnostics, got:\n{}", output.code),
            Err(diagnostics) => diagnostics,
        };
        assert_eq!(diagnostics.len(), 1, "{:?}", options.pass_order);
        assert_eq!(diagnostics[0].code, 9002, "{:?}", options.pass_order);
        assert_eq!(diagnostics[0].start, 4);
    }
}

#[test]
fn test_pipeline_pass_order() {
    let names = |options: &EmitOptions| Pipeline::from_options(options).pass_names();
    assert_eq!(names(&EmitOptions::default()), ["idx", "marker-imports"]);
    assert_eq!(
        names(&with_async(PassOrder::AsyncFirst)),
        ["async", "idx", "marker-imports"]
    );
    assert_eq!(
        names(&EmitOptions {
            strip_marker_imports: false,
            ..with_async(PassOrder::IdxFirst)
        }),
        ["idx", "async"]
    );
}

#[test]
fn test_pass_order_parsing() {
    assert_eq!("idx-first".parse::<PassOrder>(), Ok(PassOrder::IdxFirst));
    assert_eq!("async-first".parse::<PassOrder>(), Ok(PassOrder::AsyncFirst));
    assert!("sideways".parse::<PassOrder>().is_err());
    assert_eq!(PassOrder::AsyncFirst.to_string(), "async-first");
    assert_eq!(
        serde_json::from_str::<PassOrder>("\"async-first\"").expect("valid"),
        PassOrder::AsyncFirst
    );
}
