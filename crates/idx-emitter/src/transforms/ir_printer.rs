//! IR Printer - Emits IR nodes as JavaScript text
//!
//! Parentheses are never stored in the tree except where the source wrote
//! them (`IRNode::Parenthesized`). Everywhere else the printer derives them
//! from operator precedence, so passes can splice expressions together
//! without worrying about grouping.

use crate::transforms::ir::*;

#[path = "ir_printer_helpers.rs"]
mod helpers;

/// Operator precedence levels, lowest to highest.
pub(crate) mod precedence {
    pub const COMMA: u8 = 0;
    pub const ASSIGNMENT: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const COALESCE: u8 = 4;
    pub const LOGICAL_OR: u8 = 4;
    pub const LOGICAL_AND: u8 = 5;
    pub const BITWISE_OR: u8 = 6;
    pub const BITWISE_XOR: u8 = 7;
    pub const BITWISE_AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const EXPONENTIATION: u8 = 14;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 16;
    pub const MEMBER: u8 = 17;
    pub const PRIMARY: u8 = 18;
}

use precedence as prec;

/// Precedence of a binary operator token.
pub(crate) fn binary_operator_precedence(operator: &str) -> u8 {
    match operator {
        "," => prec::COMMA,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "**=" | "<<=" | ">>=" | ">>>=" | "&=" | "|="
        | "^=" | "&&=" | "||=" | "??=" => prec::ASSIGNMENT,
        "??" => prec::COALESCE,
        "||" => prec::LOGICAL_OR,
        "&&" => prec::LOGICAL_AND,
        "|" => prec::BITWISE_OR,
        "^" => prec::BITWISE_XOR,
        "&" => prec::BITWISE_AND,
        "==" | "!=" | "===" | "!==" => prec::EQUALITY,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => prec::RELATIONAL,
        "<<" | ">>" | ">>>" => prec::SHIFT,
        "+" | "-" => prec::ADDITIVE,
        "*" | "/" | "%" => prec::MULTIPLICATIVE,
        "**" => prec::EXPONENTIATION,
        _ => prec::PRIMARY,
    }
}

/// Precedence of an expression node when printed without added parentheses.
pub(crate) fn node_precedence(node: &IRNode) -> u8 {
    match node {
        IRNode::BinaryExpr { operator, .. } => binary_operator_precedence(operator),
        IRNode::ConditionalExpr { .. } => prec::CONDITIONAL,
        IRNode::ArrowFunction { .. } | IRNode::Yield { .. } => prec::ASSIGNMENT,
        IRNode::PrefixUnaryExpr { .. } | IRNode::Await(_) | IRNode::Undefined => prec::UNARY,
        IRNode::PostfixUnaryExpr { .. } => prec::POSTFIX,
        IRNode::NewExpr {
            explicit_arguments: false,
            ..
        } => prec::POSTFIX,
        IRNode::CallExpr { .. }
        | IRNode::NewExpr { .. }
        | IRNode::PropertyAccess { .. }
        | IRNode::ElementAccess { .. } => prec::MEMBER,
        _ => prec::PRIMARY,
    }
}

fn is_right_associative(operator: &str) -> bool {
    operator == "**" || binary_operator_precedence(operator) == prec::ASSIGNMENT
}

fn is_logical(operator: &str) -> bool {
    operator == "||" || operator == "&&"
}

/// Leftmost expression printed for `node`, following the operands that are
/// printed first without parentheses of their own.
pub(crate) fn leftmost_expression(node: &IRNode) -> &IRNode {
    let mut current = node;
    loop {
        let next = match current {
            IRNode::BinaryExpr { left, operator, .. } => {
                let p = binary_operator_precedence(operator);
                let left_p = node_precedence(left);
                if left_p < p || (left_p == p && is_right_associative(operator)) {
                    return current;
                }
                left.as_ref()
            }
            IRNode::ConditionalExpr { condition, .. } => {
                if node_precedence(condition) <= prec::CONDITIONAL {
                    return current;
                }
                condition.as_ref()
            }
            IRNode::CallExpr { callee: object, .. }
            | IRNode::PropertyAccess { object, .. }
            | IRNode::ElementAccess { object, .. } => {
                if node_precedence(object) < prec::MEMBER
                    || matches!(object.as_ref(), IRNode::NumericLiteral(_))
                {
                    return current;
                }
                object.as_ref()
            }
            IRNode::PostfixUnaryExpr { operand, .. } => {
                if node_precedence(operand) < prec::POSTFIX {
                    return current;
                }
                operand.as_ref()
            }
            _ => return current,
        };
        current = next;
    }
}

/// IR Printer - converts IR nodes to JavaScript strings
pub struct IRPrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl IRPrinter {
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(1024),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Print a single node to a string.
    pub fn emit_to_string(node: &IRNode) -> String {
        let mut printer = Self::new();
        printer.emit_node(node);
        printer.output
    }

    /// Print a whole program, one top-level statement per line.
    pub fn emit_program(&mut self, program: &IRProgram) {
        for stmt in &program.statements {
            self.write_indent();
            self.emit_node(stmt);
            self.write_line();
        }
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn take_output(self) -> String {
        self.output
    }

    /// Emit a node in a context that accepts any expression or statement.
    pub fn emit_node(&mut self, node: &IRNode) {
        match node {
            // Literals
            IRNode::NumericLiteral(n) | IRNode::BigIntLiteral(n) | IRNode::RegExpLiteral(n) => {
                self.write(n)
            }
            IRNode::StringLiteral { value, raw } => match raw {
                Some(raw) => self.write(raw),
                None => {
                    self.write("\"");
                    self.write_escaped(value);
                    self.write("\"");
                }
            },
            IRNode::BooleanLiteral(b) => self.write(if *b { "true" } else { "false" }),
            IRNode::NullLiteral => self.write("null"),
            IRNode::Undefined => self.write("void 0"),
            IRNode::Identifier(name) => self.write(name),
            IRNode::This => self.write("this"),

            // Expressions
            IRNode::BinaryExpr {
                left,
                operator,
                right,
            } => self.emit_binary(left, operator, right),
            IRNode::PrefixUnaryExpr { operator, operand } => {
                self.write(operator);
                let operand_is_keyword_op = operator.chars().all(|c| c.is_ascii_alphabetic());
                let merges_with_operand = match operand.as_ref() {
                    IRNode::PrefixUnaryExpr { operator: inner, .. } => {
                        (operator.starts_with('+') && inner.starts_with('+'))
                            || (operator.starts_with('-') && inner.starts_with('-'))
                    }
                    _ => false,
                };
                if operand_is_keyword_op || merges_with_operand {
                    self.write(" ");
                }
                self.emit_with_min_precedence(operand, prec::UNARY);
            }
            IRNode::PostfixUnaryExpr { operand, operator } => {
                self.emit_with_min_precedence(operand, prec::POSTFIX);
                self.write(operator);
            }
            IRNode::CallExpr {
                callee, arguments, ..
            } => {
                self.emit_member_object(callee);
                self.write("(");
                self.emit_comma_separated(arguments);
                self.write(")");
            }
            IRNode::NewExpr {
                callee,
                arguments,
                explicit_arguments,
            } => {
                self.write("new ");
                if node_precedence(callee) < prec::MEMBER || Self::contains_call(callee) {
                    self.write("(");
                    self.emit_node(callee);
                    self.write(")");
                } else {
                    self.emit_member_object(callee);
                }
                if *explicit_arguments || !arguments.is_empty() {
                    self.write("(");
                    self.emit_comma_separated(arguments);
                    self.write(")");
                }
            }
            IRNode::PropertyAccess { object, property } => {
                self.emit_member_object(object);
                self.write(".");
                self.write(property);
            }
            IRNode::ElementAccess { object, index } => {
                self.emit_member_object(object);
                self.write("[");
                self.emit_node(index);
                self.write("]");
            }
            IRNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                self.emit_with_min_precedence(condition, prec::CONDITIONAL + 1);
                self.write(" ? ");
                self.emit_with_min_precedence(when_true, prec::ASSIGNMENT);
                self.write(" : ");
                self.emit_with_min_precedence(when_false, prec::ASSIGNMENT);
            }
            IRNode::Parenthesized(inner) => {
                self.write("(");
                self.emit_node(inner);
                self.write(")");
            }
            IRNode::ArrayLiteral(elements) => {
                self.write("[");
                self.emit_comma_separated(elements);
                if matches!(elements.last(), Some(IRNode::Elision)) {
                    self.write(",");
                }
                self.write("]");
            }
            IRNode::Elision => {}
            IRNode::SpreadElement(inner) => {
                self.write("...");
                self.emit_with_min_precedence(inner, prec::ASSIGNMENT);
            }
            IRNode::ObjectLiteral {
                properties,
                multi_line,
            } => {
                if *multi_line {
                    self.emit_object_literal_multiline(properties);
                } else {
                    self.emit_object_literal_single_line(properties);
                }
            }
            IRNode::FunctionExpr {
                name,
                parameters,
                body,
                is_async,
                is_generator,
            } => self.emit_function(name.as_deref(), parameters, body, *is_async, *is_generator),
            IRNode::ArrowFunction {
                parameters,
                body,
                is_async,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write("(");
                self.emit_parameters(parameters);
                self.write(") => ");
                match body {
                    IRArrowBody::Expression(expr) => {
                        let needs_parens = node_precedence(expr) < prec::ASSIGNMENT
                            || matches!(leftmost_expression(expr), IRNode::ObjectLiteral { .. });
                        self.emit_parenthesized_if(expr, needs_parens);
                    }
                    IRArrowBody::Block(statements) => self.emit_block(statements),
                }
            }
            IRNode::Await(inner) => {
                self.write("await ");
                self.emit_with_min_precedence(inner, prec::UNARY);
            }
            IRNode::Yield {
                expression,
                delegate,
            } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(expr) = expression {
                    self.write(" ");
                    self.emit_with_min_precedence(expr, prec::ASSIGNMENT);
                }
            }

            // Statements
            IRNode::VarDecl { name, initializer } => {
                self.write(name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit_with_min_precedence(init, prec::ASSIGNMENT);
                }
            }
            IRNode::VariableStatement { kind, declarations } => {
                self.emit_variable_list(*kind, declarations);
                self.write(";");
            }
            IRNode::ExpressionStatement(expr) => {
                let needs_parens = matches!(
                    leftmost_expression(expr),
                    IRNode::ObjectLiteral { .. } | IRNode::FunctionExpr { .. }
                );
                self.emit_parenthesized_if(expr, needs_parens);
                self.write(";");
            }
            IRNode::ReturnStatement(expr) => {
                self.write("return");
                if let Some(expr) = expr {
                    self.write(" ");
                    self.emit_node(expr);
                }
                self.write(";");
            }
            IRNode::ThrowStatement(expr) => {
                self.write("throw ");
                self.emit_node(expr);
                self.write(";");
            }
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_node(condition);
                self.write(")");
                self.emit_embedded_statement(then_branch);
                if let Some(other) = else_branch {
                    if matches!(then_branch.as_ref(), IRNode::Block(_)) {
                        self.write(" ");
                    } else {
                        self.write_line();
                        self.write_indent();
                    }
                    self.write("else");
                    if matches!(other.as_ref(), IRNode::IfStatement { .. }) {
                        self.write(" ");
                        self.emit_node(other);
                    } else {
                        self.emit_embedded_statement(other);
                    }
                }
            }
            IRNode::Block(statements) => self.emit_block(statements),
            IRNode::EmptyStatement => self.write(";"),
            IRNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                self.write("for (");
                if let Some(init) = initializer {
                    match init.as_ref() {
                        IRNode::VariableStatement { kind, declarations } => {
                            self.emit_variable_list(*kind, declarations)
                        }
                        other => self.emit_node(other),
                    }
                }
                self.write(";");
                if let Some(cond) = condition {
                    self.write(" ");
                    self.emit_node(cond);
                }
                self.write(";");
                if let Some(incr) = incrementor {
                    self.write(" ");
                    self.emit_node(incr);
                }
                self.write(")");
                self.emit_embedded_statement(body);
            }
            IRNode::WhileStatement { condition, body } => {
                self.write("while (");
                self.emit_node(condition);
                self.write(")");
                self.emit_embedded_statement(body);
            }
            IRNode::DoWhileStatement { body, condition } => {
                self.write("do");
                self.emit_embedded_statement(body);
                if matches!(body.as_ref(), IRNode::Block(_)) {
                    self.write(" ");
                } else {
                    self.write_line();
                    self.write_indent();
                }
                self.write("while (");
                self.emit_node(condition);
                self.write(");");
            }
            IRNode::BreakStatement => self.write("break;"),
            IRNode::ContinueStatement => self.write("continue;"),

            // Declarations
            IRNode::FunctionDecl {
                name,
                parameters,
                body,
                is_async,
                is_generator,
            } => self.emit_function(Some(name), parameters, body, *is_async, *is_generator),
            IRNode::ImportDecl {
                default_binding,
                module,
            } => {
                self.write("import ");
                if let Some(name) = default_binding {
                    self.write(name);
                    self.write(" from ");
                }
                self.emit_node(module);
                self.write(";");
            }

            IRNode::Raw(text) => self.write(text),
        }
    }

    /// Emit `node`, wrapping it in parentheses when it binds looser than `min`.
    pub(crate) fn emit_with_min_precedence(&mut self, node: &IRNode, min: u8) {
        let needs_parens = node_precedence(node) < min;
        self.emit_parenthesized_if(node, needs_parens);
    }

    fn emit_parenthesized_if(&mut self, node: &IRNode, needs_parens: bool) {
        if needs_parens {
            self.write("(");
            self.emit_node(node);
            self.write(")");
        } else {
            self.emit_node(node);
        }
    }

    fn emit_binary(&mut self, left: &IRNode, operator: &str, right: &IRNode) {
        let p = binary_operator_precedence(operator);
        let right_assoc = is_right_associative(operator);

        let left_p = node_precedence(left);
        let left_parens = left_p < p
            || (left_p == p && right_assoc)
            || (operator == "**"
                && matches!(left, IRNode::PrefixUnaryExpr { .. } | IRNode::Await(_) | IRNode::Undefined))
            || Self::mixes_coalesce(operator, left);
        self.emit_parenthesized_if(left, left_parens);

        if operator == "," {
            self.write(", ");
        } else {
            self.write(" ");
            self.write(operator);
            self.write(" ");
        }

        let right_p = node_precedence(right);
        let right_parens =
            right_p < p || (right_p == p && !right_assoc) || Self::mixes_coalesce(operator, right);
        self.emit_parenthesized_if(right, right_parens);
    }

    /// `??` cannot be combined with `||` or `&&` without explicit grouping.
    fn mixes_coalesce(operator: &str, operand: &IRNode) -> bool {
        let IRNode::BinaryExpr {
            operator: inner, ..
        } = operand
        else {
            return false;
        };
        (operator == "??" && is_logical(inner)) || (is_logical(operator) && inner == "??")
    }

    /// Emit the object of a member access or the callee of a call.
    fn emit_member_object(&mut self, object: &IRNode) {
        let needs_parens = node_precedence(object) < prec::MEMBER
            || matches!(object, IRNode::NumericLiteral(_));
        self.emit_parenthesized_if(object, needs_parens);
    }

    /// Whether a `new` callee contains a call in its member chain, which would
    /// otherwise be parsed as the `new` arguments.
    fn contains_call(node: &IRNode) -> bool {
        match node {
            IRNode::CallExpr { .. } => true,
            IRNode::PropertyAccess { object, .. } | IRNode::ElementAccess { object, .. } => {
                Self::contains_call(object)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/ir_printer.rs"]
mod tests;
