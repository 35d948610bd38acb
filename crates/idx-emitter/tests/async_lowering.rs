use super::*;
use crate::lower::lower_source_file;
use crate::transforms::ir_printer::IRPrinter;
use idx_parser::parser::ParserState;
use rustc_hash::FxHashSet;

fn run_pass(source: &str) -> (String, TransformContext) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let mut program = lower_source_file(parser.get_arena(), root);
    let mut ctx = TransformContext::new("test.js", FxHashSet::default());
    AsyncLowering::new().run(&mut program, &mut ctx);

    let mut printer = IRPrinter::new();
    printer.emit_program(&program);
    (printer.take_output(), ctx)
}

fn lowered(source: &str) -> String {
    run_pass(source).0
}

#[test]
fn test_async_function_declaration() {
    let (output, ctx) = run_pass("async function f(a) { await g(a); return 1; }");
    assert_eq!(
        output,
        "function f(a) {\n    return __awaiter(this, void 0, void 0, function* () {\n        yield g(a);\n        return 1;\n    });\n}\n"
    );
    assert!(ctx.helpers().awaiter);
}

#[test]
fn test_async_function_expression() {
    assert_eq!(
        lowered("x = async function () { };"),
        "x = function () {\n    return __awaiter(this, void 0, void 0, function* () { });\n};\n"
    );
}

#[test]
fn test_concise_async_arrow() {
    assert_eq!(
        lowered("f = async (a) => await a;"),
        "f = (a) => __awaiter(this, void 0, void 0, function* () {\n    return yield a;\n});\n"
    );
}

#[test]
fn test_block_async_arrow() {
    assert_eq!(
        lowered("f = async () => { await a; };"),
        "f = () => __awaiter(this, void 0, void 0, function* () {\n    yield a;\n});\n"
    );
}

#[test]
fn test_await_inside_operator_is_parenthesized() {
    let output = lowered("async function f() { return await a + 1; }");
    assert!(output.contains("return (yield a) + 1;"), "{output}");
}

#[test]
fn test_nested_async_functions_are_lowered_independently() {
    let output = lowered("async function f() { const g = async () => await b; await c; }");
    assert_eq!(output.matches("__awaiter(").count(), 2);
    assert!(output.contains("return yield b;"), "{output}");
    assert!(output.contains("yield c;"), "{output}");
    assert!(!output.contains("await "), "{output}");
    assert!(!output.contains("async "), "{output}");
}

#[test]
fn test_arguments_are_forwarded() {
    let output = lowered("async function f() { return arguments.length; }");
    assert!(output.contains("__awaiter(this, arguments, void 0, function* ()"), "{output}");

    let nested = lowered("async function f() { return function () { return arguments; }; }");
    assert!(nested.contains("__awaiter(this, void 0, void 0,"), "{nested}");
}

#[test]
fn test_sync_functions_and_async_generators_are_untouched() {
    let source = "function f(a) {\n    return a;\n}\nasync function* g() {\n    yield 1;\n}\n";
    let (output, ctx) = run_pass(source);
    assert_eq!(output, source);
    assert!(!ctx.helpers().awaiter);
}

#[test]
fn test_parameters_stay_on_outer_function() {
    let output = lowered("async function f(a = 1, ...rest) { await a; }");
    assert!(
        output.starts_with("function f(a = 1, ...rest) {\n    return __awaiter("),
        "{output}"
    );
}
