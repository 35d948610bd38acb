//! Tests for expression parsing in the parser.
use crate::parser::{NodeArena, NodeIndex, ParserState, syntax_kind_ext};
use idx_common::diagnostics::diagnostic_codes;
use idx_scanner::SyntaxKind;

/// Parse `source` as a single expression statement and return its expression.
fn parse_expr(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.into_arena();
    let sf = arena.get_source_file_at(root).expect("source file");
    let statement = arena.get(sf.statements.nodes[0]).expect("statement");
    let expression = arena.get_expr_statement(statement).expect("expression statement").expression;
    (arena, expression)
}

fn kind_of(arena: &NodeArena, idx: NodeIndex) -> u16 {
    arena.get(idx).expect("node").kind
}

#[test]
fn parse_marker_call_shape() {
    let (arena, expr) = parse_expr("idx(a, _ => _.b.c)");
    let call = arena.get_call_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(call.expression), Some("idx"));
    let args = call.arguments.as_ref().unwrap();
    assert_eq!(args.len(), 2);

    let arrow = arena.get(args.nodes[1]).unwrap();
    assert_eq!(arrow.kind, syntax_kind_ext::ARROW_FUNCTION);
    let func = arena.get_function(arrow).unwrap();
    assert_eq!(func.parameters.len(), 1);
    assert_eq!(kind_of(&arena, func.body), syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION);
}

#[test]
fn parse_call_span_covers_arguments() {
    let (arena, expr) = parse_expr("  idx(a, b => b.c);");
    let node = arena.get(expr).unwrap();
    assert_eq!(node.pos, 2);
    assert_eq!(node.end, 18);
}

#[test]
fn parse_binary_precedence() {
    let (arena, expr) = parse_expr("a + b * c");
    let bin = arena.get_binary_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(bin.operator_token, SyntaxKind::PlusToken as u16);
    let right = arena.get_binary_expr(arena.get(bin.right).unwrap()).unwrap();
    assert_eq!(right.operator_token, SyntaxKind::AsteriskToken as u16);
}

#[test]
fn parse_exponent_is_right_associative() {
    let (arena, expr) = parse_expr("a ** b ** c");
    let bin = arena.get_binary_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(kind_of(&arena, bin.left), SyntaxKind::Identifier as u16);
    assert_eq!(kind_of(&arena, bin.right), syntax_kind_ext::BINARY_EXPRESSION);
}

#[test]
fn parse_assignment_is_right_associative() {
    let (arena, expr) = parse_expr("a = b = c");
    let bin = arena.get_binary_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(bin.operator_token, SyntaxKind::EqualsToken as u16);
    assert_eq!(kind_of(&arena, bin.right), syntax_kind_ext::BINARY_EXPRESSION);
}

#[test]
fn parse_conditional_expression() {
    let (arena, expr) = parse_expr("a ? b : c ? d : e");
    let cond = arena.get_conditional_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(
        kind_of(&arena, cond.when_false),
        syntax_kind_ext::CONDITIONAL_EXPRESSION
    );
}

#[test]
fn parse_spread_arguments_and_holes() {
    let (arena, expr) = parse_expr("f(...a, b, [, ...c])");
    let call = arena.get_call_expr(arena.get(expr).unwrap()).unwrap();
    let args = call.arguments.as_ref().unwrap();
    assert_eq!(kind_of(&arena, args.nodes[0]), syntax_kind_ext::SPREAD_ELEMENT);
    let array = arena.get_literal_expr(arena.get(args.nodes[2]).unwrap()).unwrap();
    assert_eq!(array.elements.len(), 2);
    assert_eq!(
        kind_of(&arena, array.elements.nodes[0]),
        syntax_kind_ext::OMITTED_EXPRESSION
    );
}

#[test]
fn parse_object_literal_members() {
    let (arena, expr) = parse_expr("({ a: 1, b, [k]: 2, 'q': 3, ...rest, default: 4 })");
    let paren = arena.get_parenthesized(arena.get(expr).unwrap()).unwrap();
    let object = arena.get_literal_expr(arena.get(paren.expression).unwrap()).unwrap();
    let kinds: Vec<u16> = object.elements.iter().map(|e| kind_of(&arena, e)).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::SPREAD_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
        ]
    );
}

#[test]
fn parse_arrow_function_forms() {
    let (arena, expr) = parse_expr("(a, b = 2, ...c) => { return a; }");
    let func = arena.get_function(arena.get(expr).unwrap()).unwrap();
    assert_eq!(func.parameters.len(), 3);
    assert_eq!(kind_of(&arena, func.body), syntax_kind_ext::BLOCK);

    let (arena, expr) = parse_expr("async x => await x");
    let func = arena.get_function(arena.get(expr).unwrap()).unwrap();
    assert!(func.is_async);
    assert_eq!(kind_of(&arena, func.body), syntax_kind_ext::AWAIT_EXPRESSION);

    let (arena, expr) = parse_expr("async => async");
    let func = arena.get_function(arena.get(expr).unwrap()).unwrap();
    assert!(!func.is_async);
}

#[test]
fn parse_await_is_identifier_outside_async() {
    let (arena, expr) = parse_expr("await(x)");
    assert_eq!(kind_of(&arena, expr), syntax_kind_ext::CALL_EXPRESSION);
}

#[test]
fn parse_function_expression_and_new() {
    let (arena, expr) = parse_expr("new Foo.Bar(function (x) { return x; })");
    let new_expr = arena.get(expr).unwrap();
    assert_eq!(new_expr.kind, syntax_kind_ext::NEW_EXPRESSION);
    let data = arena.get_call_expr(new_expr).unwrap();
    assert_eq!(
        kind_of(&arena, data.expression),
        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
    );
    let args = data.arguments.as_ref().unwrap();
    assert_eq!(kind_of(&arena, args.nodes[0]), syntax_kind_ext::FUNCTION_EXPRESSION);
}

#[test]
fn parse_element_access_and_keyword_property() {
    let (arena, expr) = parse_expr("a[0].default(b)['c']");
    let outer = arena.get_access_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(kind_of(&arena, outer.expression), syntax_kind_ext::CALL_EXPRESSION);
}

#[test]
fn parse_regex_literal() {
    let (arena, expr) = parse_expr("x = /ab+c/g");
    let bin = arena.get_binary_expr(arena.get(expr).unwrap()).unwrap();
    let regex = arena.get(bin.right).unwrap();
    assert_eq!(regex.kind, SyntaxKind::RegularExpressionLiteral as u16);
    assert_eq!(arena.get_literal(regex).unwrap().raw_text, "/ab+c/g");
}

#[test]
fn parse_unary_and_update() {
    let (arena, expr) = parse_expr("!typeof -x++");
    let outer = arena.get_unary_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(outer.operator, SyntaxKind::ExclamationToken as u16);
}

#[test]
fn parse_optional_chaining_is_unsupported() {
    let mut parser = ParserState::new("test.js".to_string(), "a?.b".to_string());
    parser.parse_source_file();
    let diags = parser.get_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::UNSUPPORTED_SYNTAX);
    assert_eq!(diags[0].start, 1);
}

#[test]
fn parse_template_literal_is_unsupported() {
    let mut parser = ParserState::new("test.js".to_string(), "x = `a`;\ny;".to_string());
    parser.parse_source_file();
    assert_eq!(parser.get_diagnostics()[0].code, diagnostic_codes::UNSUPPORTED_SYNTAX);
}

#[test]
fn parse_deep_nesting_reports_error() {
    let source = format!("{}x{}", "(".repeat(400), ")".repeat(400));
    let mut parser = ParserState::new("test.js".to_string(), source);
    parser.parse_source_file();
    assert!(
        parser
            .get_diagnostics()
            .iter()
            .any(|d| d.code == diagnostic_codes::NESTING_TOO_DEEP)
    );
}
