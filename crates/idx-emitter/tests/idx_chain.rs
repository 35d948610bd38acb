use super::*;
use crate::lower::lower_source_file;
use crate::transforms::ir_printer::IRPrinter;
use idx_parser::parser::ParserState;
use rustc_hash::FxHashSet;

/// Parse `source` (a single marker call statement) and return its arguments
/// and span.
fn marker_arguments(source: &str) -> (Vec<IRNode>, Span) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let mut program = lower_source_file(parser.get_arena(), root);
    match program.statements.remove(0) {
        IRNode::ExpressionStatement(expr) => match *expr {
            IRNode::CallExpr {
                arguments, span, ..
            } => (arguments, span),
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn chain(source: &str) -> Result<MarkerChain, IdxError> {
    let (arguments, span) = marker_arguments(source);
    MarkerChain::from_call("idx", arguments, span)
}

fn compile(source: &str) -> (String, Vec<String>) {
    let reserved = FxHashSet::default();
    let mut scope = TempScope::new(&reserved);
    let expr = chain(source).expect("valid marker call").compile(&mut scope);
    (IRPrinter::emit_to_string(&expr), scope.into_declared())
}

fn guard_count(output: &str) -> usize {
    output.matches("!= null").count()
}

#[test]
fn test_property_chain() {
    let (output, temps) = compile("idx(b, b => b.c.d.e);");
    assert_eq!(
        output,
        "(_a = b) != null ? (_b = _a.c) != null ? (_c = _b.d) != null ? _c.e : _c : _b : _a"
    );
    assert_eq!(temps, ["_a", "_b", "_c"]);
    assert_eq!(guard_count(&output), 3);
}

#[test]
fn test_calls_with_spread_arguments() {
    let (output, temps) = compile("idx(b, b => b.c(...args)().d(x, null, [...y]));");
    assert_eq!(guard_count(&output), 5);
    assert_eq!(temps.len(), 5);
    assert!(output.contains("(_b = _a.c) != null"));
    assert!(output.contains("(_c = _b(...args)) != null"));
    assert!(output.contains("(_d = _c()) != null"));
    assert!(output.contains("(_e = _d.d) != null ? _e(x, null, [...y]) : _e"));
}

#[test]
fn test_computed_chain_leaves_innermost_unguarded() {
    let (output, _) = compile("idx(b, b => b[\"k\"][0][expr]);");
    assert_eq!(
        output,
        "(_a = b) != null ? (_b = _a[\"k\"]) != null ? (_c = _b[0]) != null ? _c[expr] : _c : _b : _a"
    );
}

#[test]
fn test_degenerate_chain_returns_base() {
    let (output, temps) = compile("idx(a.b, p => p);");
    assert_eq!(output, "a.b");
    assert!(temps.is_empty());
}

#[test]
fn test_single_link() {
    let (output, temps) = compile("idx(props, _ => _.user);");
    assert_eq!(output, "(_a = props) != null ? _a.user : _a");
    assert_eq!(temps, ["_a"]);
}

#[test]
fn test_base_and_links_appear_once() {
    let (output, _) = compile("idx(load(), p => p[key()].run(arg()));");
    assert_eq!(output.matches("load()").count(), 1);
    assert_eq!(output.matches("key()").count(), 1);
    assert_eq!(output.matches("arg()").count(), 1);
}

#[test]
fn test_links_are_collected_in_application_order() {
    let chain = chain("idx(a, x => x.b[c](...d));").expect("valid");
    assert_eq!(chain.base, IRNode::id("a"));
    assert_eq!(chain.links.len(), 3);
    assert_eq!(chain.links[0], AccessLink::Property { name: "b".into() });
    assert_eq!(chain.links[1], AccessLink::Computed { key: IRNode::id("c") });
    assert!(matches!(
        &chain.links[2],
        AccessLink::Invocation { arguments, has_spread: true } if arguments.len() == 1
    ));
}

#[test]
fn test_function_expression_path_requires_expression_body() {
    let err = chain("idx(a, (function (x) { return x.b; }));").unwrap_err();
    assert!(matches!(err, IdxError::BodyShape { .. }));
}

#[test]
fn test_arity_errors() {
    for source in ["idx();", "idx(x);", "idx(x, y, z);", "idx(...a, x => x.b);"] {
        let err = chain(source).unwrap_err();
        assert!(matches!(err, IdxError::Arity { .. }), "{source}: {err:?}");
        assert_eq!(err.code(), 9001);
    }
}

#[test]
fn test_path_function_error() {
    let err = chain("idx(b, notAFunction);").unwrap_err();
    assert!(matches!(err, IdxError::PathFunction { .. }));
    assert_eq!(err.code(), 9002);
}

#[test]
fn test_async_path_function_is_rejected() {
    for source in [
        "idx(b, async x => x.c);",
        "idx(b, async (x) => { return x.c; });",
        "idx(b, (async x => x.c));",
    ] {
        let err = chain(source).unwrap_err();
        assert!(matches!(err, IdxError::PathFunction { .. }), "{source}");
    }
}

#[test]
fn test_parameter_count_error() {
    for source in ["idx(b, (x, y) => x);", "idx(b, () => b.c);"] {
        let err = chain(source).unwrap_err();
        assert!(matches!(err, IdxError::ParameterCount { .. }), "{source}");
    }
}

#[test]
fn test_parameter_shape_error() {
    for source in ["idx(b, (...x) => x);", "idx(b, (x = 1) => x.c);"] {
        let err = chain(source).unwrap_err();
        assert!(matches!(err, IdxError::ParameterShape { .. }), "{source}");
        assert_eq!(err.code(), 9004);
    }
}

#[test]
fn test_body_shape_error() {
    let err = chain("idx(b, x => {});").unwrap_err();
    assert!(matches!(err, IdxError::BodyShape { .. }));
    assert_eq!(err.code(), 9005);
}

#[test]
fn test_base_mismatch_errors() {
    for source in [
        "idx(b, x => other.prop);",
        "idx(b, x => (x).prop);",
        "idx(b, x => x.a + 1);",
        "idx(b, x => new x.A());",
    ] {
        let err = chain(source).unwrap_err();
        assert!(matches!(err, IdxError::BaseMismatch { .. }), "{source}");
        assert_eq!(err.code(), 9006);
    }
}

#[test]
fn test_error_messages_and_diagnostic() {
    let err = chain("  idx(x);").unwrap_err();
    assert_eq!(err.to_string(), "The `idx` function takes exactly two arguments.");
    let diag = err.to_diagnostic("a.js");
    assert_eq!(diag.file, "a.js");
    assert_eq!(diag.start, 2);
    assert_eq!(diag.length, 6);
    assert_eq!(diag.code, 9001);
    assert_eq!(diag.message_text, err.to_string());
}

#[test]
fn test_messages_match_registered_templates() {
    use idx_common::diagnostics::{format_message, get_message_template};
    let span = Span::new(0, 1);
    let marker = "idx".to_string();
    let errors = [
        IdxError::Arity { marker: marker.clone(), span },
        IdxError::PathFunction { marker: marker.clone(), span },
        IdxError::ParameterCount { marker: marker.clone(), span },
        IdxError::ParameterShape { marker: marker.clone(), span },
        IdxError::BodyShape { marker: marker.clone(), span },
        IdxError::BaseMismatch { marker, span },
    ];
    for err in errors {
        let template = get_message_template(err.code()).expect("registered code");
        assert_eq!(err.to_string(), format_message(template, &["idx"]));
    }
}

#[test]
fn test_marker_name_is_interpolated() {
    let (arguments, span) = marker_arguments("get(x);");
    let err = MarkerChain::from_call("get", arguments, span).unwrap_err();
    assert_eq!(err.to_string(), "The `get` function takes exactly two arguments.");
    assert_eq!(
        err.to_diagnostic("a.js").message_text,
        "The `get` function takes exactly two arguments."
    );
}
