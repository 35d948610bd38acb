//! AST Lowering - converts the parser's arena AST into the owned IR
//!
//! This is the bridge between `idx_parser` and the transform passes. It runs
//! once per file, after parsing succeeded without diagnostics, and produces an
//! [`IRProgram`] that every pass rewrites in place.
//!
//! Lowering is purely structural: no JavaScript semantics change here. Source
//! text is preserved where it matters for faithful output (string literal
//! quotes, numeric spellings, regex flags), and call expressions keep their
//! source spans so marker diagnostics can point at them.

use crate::transforms::ir::{
    IRArrowBody, IRNode, IRParam, IRProgram, IRProperty, IRPropertyKey, VarKind,
};
use idx_common::Span;
use idx_parser::parser::node::{FunctionData, Node, NodeArena, node_flags};
use idx_parser::parser::syntax_kind_ext;
use idx_parser::parser::{NodeIndex, NodeList};
use idx_scanner::SyntaxKind;

/// Tokens that can appear as a unary or binary operator.
const OPERATOR_TOKENS: &[SyntaxKind] = &[
    SyntaxKind::CommaToken,
    SyntaxKind::LessThanToken,
    SyntaxKind::GreaterThanToken,
    SyntaxKind::LessThanEqualsToken,
    SyntaxKind::GreaterThanEqualsToken,
    SyntaxKind::EqualsEqualsToken,
    SyntaxKind::ExclamationEqualsToken,
    SyntaxKind::EqualsEqualsEqualsToken,
    SyntaxKind::ExclamationEqualsEqualsToken,
    SyntaxKind::PlusToken,
    SyntaxKind::MinusToken,
    SyntaxKind::AsteriskToken,
    SyntaxKind::AsteriskAsteriskToken,
    SyntaxKind::SlashToken,
    SyntaxKind::PercentToken,
    SyntaxKind::PlusPlusToken,
    SyntaxKind::MinusMinusToken,
    SyntaxKind::LessThanLessThanToken,
    SyntaxKind::GreaterThanGreaterThanToken,
    SyntaxKind::GreaterThanGreaterThanGreaterThanToken,
    SyntaxKind::AmpersandToken,
    SyntaxKind::BarToken,
    SyntaxKind::CaretToken,
    SyntaxKind::ExclamationToken,
    SyntaxKind::TildeToken,
    SyntaxKind::AmpersandAmpersandToken,
    SyntaxKind::BarBarToken,
    SyntaxKind::QuestionQuestionToken,
    SyntaxKind::EqualsToken,
    SyntaxKind::PlusEqualsToken,
    SyntaxKind::MinusEqualsToken,
    SyntaxKind::AsteriskEqualsToken,
    SyntaxKind::AsteriskAsteriskEqualsToken,
    SyntaxKind::SlashEqualsToken,
    SyntaxKind::PercentEqualsToken,
    SyntaxKind::LessThanLessThanEqualsToken,
    SyntaxKind::GreaterThanGreaterThanEqualsToken,
    SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
    SyntaxKind::AmpersandEqualsToken,
    SyntaxKind::BarEqualsToken,
    SyntaxKind::CaretEqualsToken,
    SyntaxKind::BarBarEqualsToken,
    SyntaxKind::AmpersandAmpersandEqualsToken,
    SyntaxKind::QuestionQuestionEqualsToken,
    SyntaxKind::InKeyword,
    SyntaxKind::InstanceOfKeyword,
    SyntaxKind::TypeOfKeyword,
    SyntaxKind::VoidKeyword,
    SyntaxKind::DeleteKeyword,
];

fn operator_text(kind: u16) -> &'static str {
    OPERATOR_TOKENS
        .iter()
        .find(|token| **token as u16 == kind)
        .map_or("", |token| token.text())
}

/// Lower the source file rooted at `root` into an [`IRProgram`].
pub fn lower_source_file(arena: &NodeArena, root: NodeIndex) -> IRProgram {
    let Some(source_file) = arena.get_source_file_at(root) else {
        return IRProgram::default();
    };
    let lowering = AstLowering {
        arena,
        source_text: &source_file.text,
    };
    let statements = lowering.lower_statement_list(&source_file.statements);
    tracing::debug!(
        file = %source_file.file_name,
        statements = statements.len(),
        "lowered source file"
    );
    IRProgram {
        file_name: source_file.file_name.clone(),
        statements,
    }
}

struct AstLowering<'a> {
    arena: &'a NodeArena,
    source_text: &'a str,
}

impl AstLowering<'_> {
    // =========================================================================
    // Statements
    // =========================================================================

    fn lower_statement_list(&self, list: &NodeList) -> Vec<IRNode> {
        list.iter()
            .filter(|idx| idx.is_some())
            .map(|idx| self.lower_statement(idx))
            .collect()
    }

    fn lower_statement(&self, idx: NodeIndex) -> IRNode {
        let Some(node) = self.arena.get(idx) else {
            return IRNode::EmptyStatement;
        };

        match node.kind {
            k if k == syntax_kind_ext::VARIABLE_STATEMENT => self.lower_variable_statement(node),
            k if k == syntax_kind_ext::EXPRESSION_STATEMENT => {
                match self.arena.get_expr_statement(node) {
                    Some(data) => IRNode::expr_stmt(self.lower_expression(data.expression)),
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::IF_STATEMENT => match self.arena.get_if_statement(node) {
                Some(data) => IRNode::IfStatement {
                    condition: Box::new(self.lower_expression(data.expression)),
                    then_branch: Box::new(self.lower_statement(data.then_statement)),
                    else_branch: self
                        .optional(data.else_statement)
                        .map(|idx| Box::new(self.lower_statement(idx))),
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::FOR_STATEMENT => match self.arena.get_loop(node) {
                Some(data) => IRNode::ForStatement {
                    initializer: self.optional(data.initializer).map(|idx| {
                        let is_declaration = self
                            .arena
                            .get(idx)
                            .is_some_and(|n| n.kind == syntax_kind_ext::VARIABLE_STATEMENT);
                        Box::new(if is_declaration {
                            self.lower_statement(idx)
                        } else {
                            self.lower_expression(idx)
                        })
                    }),
                    condition: self.optional_expression(data.condition),
                    incrementor: self.optional_expression(data.incrementor),
                    body: Box::new(self.lower_statement(data.statement)),
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::WHILE_STATEMENT => match self.arena.get_loop(node) {
                Some(data) => IRNode::WhileStatement {
                    condition: Box::new(self.lower_expression(data.condition)),
                    body: Box::new(self.lower_statement(data.statement)),
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::DO_STATEMENT => match self.arena.get_loop(node) {
                Some(data) => IRNode::DoWhileStatement {
                    body: Box::new(self.lower_statement(data.statement)),
                    condition: Box::new(self.lower_expression(data.condition)),
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::RETURN_STATEMENT => {
                match self.arena.get_return_statement(node) {
                    Some(data) => IRNode::ReturnStatement(self.optional_expression(data.expression)),
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::THROW_STATEMENT => {
                match self.arena.get_return_statement(node) {
                    Some(data) => {
                        IRNode::ThrowStatement(Box::new(self.lower_expression(data.expression)))
                    }
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::BREAK_STATEMENT => IRNode::BreakStatement,
            k if k == syntax_kind_ext::CONTINUE_STATEMENT => IRNode::ContinueStatement,
            k if k == syntax_kind_ext::EMPTY_STATEMENT => IRNode::EmptyStatement,
            k if k == syntax_kind_ext::BLOCK => IRNode::Block(self.lower_block_statements(idx)),
            k if k == syntax_kind_ext::FUNCTION_DECLARATION => {
                match self.arena.get_function(node) {
                    Some(func) => IRNode::FunctionDecl {
                        name: self
                            .arena
                            .identifier_text(func.name)
                            .unwrap_or_default()
                            .to_string(),
                        parameters: self.lower_parameters(&func.parameters),
                        body: self.lower_block_statements(func.body),
                        is_async: func.is_async,
                        is_generator: func.asterisk_token,
                    },
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::IMPORT_DECLARATION => match self.arena.get_import_decl(node)
            {
                Some(data) => IRNode::ImportDecl {
                    default_binding: self
                        .arena
                        .identifier_text(data.import_clause)
                        .map(str::to_string),
                    module: Box::new(self.lower_expression(data.module_specifier)),
                },
                None => self.raw(node),
            },
            _ => self.raw(node),
        }
    }

    fn lower_variable_statement(&self, node: &Node) -> IRNode {
        let Some(data) = self.arena.get_variable(node) else {
            return self.raw(node);
        };
        let kind = if node.flags & node_flags::CONST != 0 {
            VarKind::Const
        } else if node.flags & node_flags::LET != 0 {
            VarKind::Let
        } else {
            VarKind::Var
        };

        let declarations = data
            .declarations
            .iter()
            .filter_map(|idx| {
                let decl_node = self.arena.get(idx)?;
                let decl = self.arena.get_variable_declaration(decl_node)?;
                Some(IRNode::VarDecl {
                    name: self.arena.identifier_text(decl.name)?.to_string(),
                    initializer: self.optional_expression(decl.initializer),
                })
            })
            .collect();

        IRNode::VariableStatement { kind, declarations }
    }

    fn lower_block_statements(&self, idx: NodeIndex) -> Vec<IRNode> {
        self.arena
            .get(idx)
            .and_then(|node| self.arena.get_block(node))
            .map(|block| self.lower_statement_list(&block.statements))
            .unwrap_or_default()
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn lower_expression(&self, idx: NodeIndex) -> IRNode {
        let Some(node) = self.arena.get(idx) else {
            return IRNode::Undefined;
        };

        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => match self.arena.get_identifier(node) {
                Some(data) => IRNode::Identifier(data.escaped_text.clone()),
                None => self.raw(node),
            },
            k if k == SyntaxKind::NumericLiteral as u16
                || k == SyntaxKind::BigIntLiteral as u16
                || k == SyntaxKind::StringLiteral as u16
                || k == SyntaxKind::RegularExpressionLiteral as u16 =>
            {
                self.lower_literal(node)
            }
            k if k == SyntaxKind::TrueKeyword as u16 => IRNode::BooleanLiteral(true),
            k if k == SyntaxKind::FalseKeyword as u16 => IRNode::BooleanLiteral(false),
            k if k == SyntaxKind::NullKeyword as u16 => IRNode::NullLiteral,
            k if k == SyntaxKind::ThisKeyword as u16 => IRNode::This,
            k if k == syntax_kind_ext::PARENTHESIZED_EXPRESSION => {
                match self.arena.get_parenthesized(node) {
                    Some(data) => IRNode::Parenthesized(Box::new(self.lower_expression(data.expression))),
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::CALL_EXPRESSION => match self.arena.get_call_expr(node) {
                Some(data) => IRNode::CallExpr {
                    callee: Box::new(self.lower_expression(data.expression)),
                    arguments: self.lower_arguments(data.arguments.as_ref()),
                    span: Span::new(node.pos, node.end),
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::NEW_EXPRESSION => match self.arena.get_call_expr(node) {
                Some(data) => IRNode::NewExpr {
                    callee: Box::new(self.lower_expression(data.expression)),
                    arguments: self.lower_arguments(data.arguments.as_ref()),
                    explicit_arguments: data.arguments.is_some(),
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => {
                match self.arena.get_access_expr(node) {
                    Some(data) => IRNode::PropertyAccess {
                        object: Box::new(self.lower_expression(data.expression)),
                        property: self
                            .arena
                            .identifier_text(data.name_or_argument)
                            .unwrap_or_default()
                            .to_string(),
                    },
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => {
                match self.arena.get_access_expr(node) {
                    Some(data) => IRNode::elem(
                        self.lower_expression(data.expression),
                        self.lower_expression(data.name_or_argument),
                    ),
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::BINARY_EXPRESSION => match self.arena.get_binary_expr(node) {
                Some(data) => IRNode::binary(
                    self.lower_expression(data.left),
                    operator_text(data.operator_token),
                    self.lower_expression(data.right),
                ),
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::PREFIX_UNARY_EXPRESSION => {
                match self.arena.get_unary_expr(node) {
                    Some(data) => IRNode::PrefixUnaryExpr {
                        operator: operator_text(data.operator).to_string(),
                        operand: Box::new(self.lower_expression(data.operand)),
                    },
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::POSTFIX_UNARY_EXPRESSION => {
                match self.arena.get_unary_expr(node) {
                    Some(data) => IRNode::PostfixUnaryExpr {
                        operand: Box::new(self.lower_expression(data.operand)),
                        operator: operator_text(data.operator).to_string(),
                    },
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                match self.arena.get_conditional_expr(node) {
                    Some(data) => IRNode::conditional(
                        self.lower_expression(data.condition),
                        self.lower_expression(data.when_true),
                        self.lower_expression(data.when_false),
                    ),
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::AWAIT_EXPRESSION => match self.arena.get_unary_expr_ex(node)
            {
                Some(data) => IRNode::Await(Box::new(self.lower_expression(data.expression))),
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::YIELD_EXPRESSION => match self.arena.get_unary_expr_ex(node)
            {
                Some(data) => IRNode::Yield {
                    expression: self.optional_expression(data.expression),
                    delegate: data.asterisk_token,
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::SPREAD_ELEMENT => match self.arena.get_unary_expr_ex(node) {
                Some(data) => IRNode::SpreadElement(Box::new(self.lower_expression(data.expression))),
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::OMITTED_EXPRESSION => IRNode::Elision,
            k if k == syntax_kind_ext::ARRAY_LITERAL_EXPRESSION => {
                match self.arena.get_literal_expr(node) {
                    Some(data) => IRNode::ArrayLiteral(
                        data.elements
                            .iter()
                            .map(|idx| self.lower_expression(idx))
                            .collect(),
                    ),
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::OBJECT_LITERAL_EXPRESSION => {
                match self.arena.get_literal_expr(node) {
                    Some(data) => IRNode::ObjectLiteral {
                        properties: data
                            .elements
                            .iter()
                            .filter_map(|idx| self.lower_object_member(idx))
                            .collect(),
                        multi_line: data.multi_line,
                    },
                    None => self.raw(node),
                }
            }
            k if k == syntax_kind_ext::FUNCTION_EXPRESSION => match self.arena.get_function(node) {
                Some(func) => IRNode::FunctionExpr {
                    name: self.arena.identifier_text(func.name).map(str::to_string),
                    parameters: self.lower_parameters(&func.parameters),
                    body: self.lower_block_statements(func.body),
                    is_async: func.is_async,
                    is_generator: func.asterisk_token,
                },
                None => self.raw(node),
            },
            k if k == syntax_kind_ext::ARROW_FUNCTION => match self.arena.get_function(node) {
                Some(func) => self.lower_arrow_function(func),
                None => self.raw(node),
            },
            _ => self.raw(node),
        }
    }

    fn lower_literal(&self, node: &Node) -> IRNode {
        let Some(lit) = self.arena.get_literal(node) else {
            return self.raw(node);
        };
        match node.kind {
            k if k == SyntaxKind::StringLiteral as u16 => IRNode::StringLiteral {
                value: lit.text.clone(),
                raw: Some(lit.raw_text.clone()),
            },
            k if k == SyntaxKind::BigIntLiteral as u16 => {
                IRNode::BigIntLiteral(lit.raw_text.clone())
            }
            k if k == SyntaxKind::RegularExpressionLiteral as u16 => {
                IRNode::RegExpLiteral(lit.raw_text.clone())
            }
            _ => IRNode::NumericLiteral(lit.raw_text.clone()),
        }
    }

    fn lower_arguments(&self, arguments: Option<&NodeList>) -> Vec<IRNode> {
        arguments
            .map(|list| list.iter().map(|idx| self.lower_expression(idx)).collect())
            .unwrap_or_default()
    }

    fn lower_object_member(&self, idx: NodeIndex) -> Option<IRProperty> {
        let node = self.arena.get(idx)?;
        match node.kind {
            k if k == syntax_kind_ext::SPREAD_ASSIGNMENT => {
                let data = self.arena.get_unary_expr_ex(node)?;
                Some(IRProperty::Spread(self.lower_expression(data.expression)))
            }
            k if k == syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT => {
                let data = self.arena.get_property_assignment(node)?;
                let name = self.arena.identifier_text(data.name)?;
                Some(IRProperty::Shorthand(name.to_string()))
            }
            k if k == syntax_kind_ext::PROPERTY_ASSIGNMENT => {
                let data = self.arena.get_property_assignment(node)?;
                Some(IRProperty::Init {
                    key: self.lower_property_key(data.name)?,
                    value: self.lower_expression(data.initializer),
                })
            }
            _ => None,
        }
    }

    fn lower_property_key(&self, idx: NodeIndex) -> Option<IRPropertyKey> {
        let node = self.arena.get(idx)?;
        if let Some(ident) = self.arena.get_identifier(node) {
            return Some(IRPropertyKey::Identifier(ident.escaped_text.clone()));
        }
        if let Some(lit) = self.arena.get_literal(node) {
            return Some(IRPropertyKey::Literal(lit.raw_text.clone()));
        }
        let computed = self.arena.get_computed_property(node)?;
        Some(IRPropertyKey::Computed(Box::new(
            self.lower_expression(computed.expression),
        )))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn lower_arrow_function(&self, func: &FunctionData) -> IRNode {
        let body_is_block = self
            .arena
            .get(func.body)
            .is_some_and(|n| n.kind == syntax_kind_ext::BLOCK);
        let body = if body_is_block {
            IRArrowBody::Block(self.lower_block_statements(func.body))
        } else {
            IRArrowBody::Expression(Box::new(self.lower_expression(func.body)))
        };
        IRNode::ArrowFunction {
            parameters: self.lower_parameters(&func.parameters),
            body,
            is_async: func.is_async,
        }
    }

    fn lower_parameters(&self, parameters: &NodeList) -> Vec<IRParam> {
        parameters
            .iter()
            .filter_map(|idx| {
                let node = self.arena.get(idx)?;
                let param = self.arena.get_parameter(node)?;
                Some(IRParam {
                    name: self.arena.identifier_text(param.name)?.to_string(),
                    rest: param.dot_dot_dot_token,
                    default_value: self.optional_expression(param.initializer),
                })
            })
            .collect()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn optional(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.arena.get(idx).map(|_| idx)
    }

    fn optional_expression(&self, idx: NodeIndex) -> Option<Box<IRNode>> {
        self.optional(idx)
            .map(|idx| Box::new(self.lower_expression(idx)))
    }

    /// Source text of a node with no structured lowering.
    fn raw(&self, node: &Node) -> IRNode {
        let text = self
            .source_text
            .get(node.pos as usize..node.end as usize)
            .unwrap_or_default();
        tracing::trace!(kind = node.kind, pos = node.pos, "lowering node as raw text");
        IRNode::Raw(text.to_string())
    }
}

#[cfg(test)]
#[path = "../tests/lower.rs"]
mod tests;
