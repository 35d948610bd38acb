//! Tests for statement parsing in the parser.
use crate::parser::{NodeIndex, ParserState, node_flags, syntax_kind_ext};
use idx_common::diagnostics::diagnostic_codes;

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn statement_kinds(parser: &ParserState, root: NodeIndex) -> Vec<u16> {
    let arena = parser.get_arena();
    let sf = arena.get_source_file_at(root).expect("source file");
    sf.statements
        .iter()
        .map(|idx| arena.get(idx).expect("statement").kind)
        .collect()
}

#[test]
fn parse_variable_statements_record_keyword_flags() {
    let (parser, root) = parse_source("var a = 1;\nlet b;\nconst c = 2, d = 3;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let sf = arena.get_source_file_at(root).unwrap();
    assert_eq!(sf.statements.len(), 3);

    let flags: Vec<u16> = sf
        .statements
        .iter()
        .map(|idx| arena.get(idx).unwrap().flags)
        .collect();
    assert_eq!(flags, vec![0, node_flags::LET, node_flags::CONST]);

    let last = arena.get(sf.statements.nodes[2]).unwrap();
    let data = arena.get_variable(last).unwrap();
    assert_eq!(data.declarations.len(), 2);
}

#[test]
fn parse_control_flow_statements() {
    let source = "if (a) { b(); } else c();\n\
                  for (var i = 0; i < n; i++) {}\n\
                  while (x) break;\n\
                  do { continue; } while (y);\n\
                  ;";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    assert_eq!(
        statement_kinds(&parser, root),
        vec![
            syntax_kind_ext::IF_STATEMENT,
            syntax_kind_ext::FOR_STATEMENT,
            syntax_kind_ext::WHILE_STATEMENT,
            syntax_kind_ext::DO_STATEMENT,
            syntax_kind_ext::EMPTY_STATEMENT,
        ]
    );
}

#[test]
fn parse_function_declarations() {
    let (parser, root) =
        parse_source("function f(a, b = 1, ...rest) { return a; }\nasync function g() {}\nfunction* h() { yield 1; }");
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let arena = parser.get_arena();
    let sf = arena.get_source_file_at(root).unwrap();

    let f = arena.get_function(arena.get(sf.statements.nodes[0]).unwrap()).unwrap();
    assert_eq!(f.parameters.len(), 3);
    let rest = arena.get_parameter(arena.get(f.parameters.nodes[2]).unwrap()).unwrap();
    assert!(rest.dot_dot_dot_token);
    let with_default = arena.get_parameter(arena.get(f.parameters.nodes[1]).unwrap()).unwrap();
    assert!(with_default.initializer.is_some());

    let g = arena.get_function(arena.get(sf.statements.nodes[1]).unwrap()).unwrap();
    assert!(g.is_async);
    let h = arena.get_function(arena.get(sf.statements.nodes[2]).unwrap()).unwrap();
    assert!(h.asterisk_token);
}

#[test]
fn parse_async_function_span_includes_async_keyword() {
    let (parser, root) = parse_source("async function g() {}");
    let arena = parser.get_arena();
    let sf = arena.get_source_file_at(root).unwrap();
    let node = arena.get(sf.statements.nodes[0]).unwrap();
    assert_eq!(node.pos, 0);
    assert_eq!(node.end, 21);
}

#[test]
fn parse_import_declarations() {
    let (parser, root) = parse_source("import idx from 'idx';\nimport './side-effect';");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let sf = arena.get_source_file_at(root).unwrap();

    let first = arena.get_import_decl(arena.get(sf.statements.nodes[0]).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(first.import_clause), Some("idx"));
    let module = arena.get(first.module_specifier).unwrap();
    assert_eq!(arena.get_literal(module).unwrap().text, "idx");

    let second = arena.get_import_decl(arena.get(sf.statements.nodes[1]).unwrap()).unwrap();
    assert!(second.import_clause.is_none());
}

#[test]
fn parse_automatic_semicolon_insertion() {
    let (parser, root) = parse_source("a = 1\nb = 2\nreturn\nc");
    assert!(parser.get_diagnostics().is_empty());
    assert_eq!(statement_kinds(&parser, root).len(), 4);
}

#[test]
fn parse_missing_semicolon_reports_expected() {
    let (parser, _root) = parse_source("a b");
    let diags = parser.get_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::EXPECTED);
    assert_eq!(diags[0].message, "';' expected.");
}

#[test]
fn parse_statement_recovery_after_unsupported_class() {
    let (parser, root) = parse_source("class A { m() {} }\nconst ok = 1;");
    let diags = parser.get_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, diagnostic_codes::UNSUPPORTED_SYNTAX);
    assert_eq!(
        statement_kinds(&parser, root),
        vec![syntax_kind_ext::VARIABLE_STATEMENT]
    );
}

#[test]
fn parse_stray_close_brace_reports_statement_expected() {
    let (parser, root) = parse_source("}\nx;");
    assert_eq!(
        parser.get_diagnostics()[0].code,
        diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED
    );
    assert_eq!(statement_kinds(&parser, root).len(), 1);
}

#[test]
fn parse_destructuring_binding_is_unsupported() {
    let (parser, _root) = parse_source("const { a } = b;");
    assert!(
        parser
            .get_diagnostics()
            .iter()
            .any(|d| d.code == diagnostic_codes::UNSUPPORTED_SYNTAX)
    );
}

#[test]
fn parse_let_as_identifier() {
    let (parser, root) = parse_source("let = 5;");
    assert!(parser.get_diagnostics().is_empty());
    assert_eq!(
        statement_kinds(&parser, root),
        vec![syntax_kind_ext::EXPRESSION_STATEMENT]
    );
}

#[test]
fn parse_for_in_is_unsupported() {
    let (parser, _root) = parse_source("for (var k in o) {}");
    assert_eq!(
        parser.get_diagnostics()[0].code,
        diagnostic_codes::UNSUPPORTED_SYNTAX
    );
}

#[test]
fn parse_shebang_is_skipped() {
    let (parser, root) = parse_source("#!/usr/bin/env node\nfoo();");
    assert!(parser.get_diagnostics().is_empty());
    assert_eq!(statement_kinds(&parser, root).len(), 1);
}
