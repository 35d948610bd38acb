//! Helper methods for the IR printer.
//!
//! Contains block and embedded-statement layout, function and parameter
//! emission, object literal formatting and the low-level writers.

use std::fmt::Write as _;

use super::*;

impl IRPrinter {
    /// Emit `{ }` for an empty body, otherwise one statement per line.
    pub(super) fn emit_block(&mut self, statements: &[IRNode]) {
        if statements.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for stmt in statements {
            self.write_indent();
            self.emit_node(stmt);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    /// Emit the body of `if`/`for`/`while`/`do` after its header.
    pub(super) fn emit_embedded_statement(&mut self, stmt: &IRNode) {
        match stmt {
            IRNode::Block(statements) => {
                self.write(" ");
                self.emit_block(statements);
            }
            IRNode::EmptyStatement => self.write(";"),
            _ => {
                self.write_line();
                self.increase_indent();
                self.write_indent();
                self.emit_node(stmt);
                self.decrease_indent();
            }
        }
    }

    pub(super) fn emit_function(
        &mut self,
        name: Option<&str>,
        parameters: &[IRParam],
        body: &[IRNode],
        is_async: bool,
        is_generator: bool,
    ) {
        if is_async {
            self.write("async ");
        }
        self.write("function");
        if is_generator {
            self.write("*");
        }
        self.write(" ");
        if let Some(name) = name {
            self.write(name);
        }
        self.write("(");
        self.emit_parameters(parameters);
        self.write(") ");
        self.emit_block(body);
    }

    pub(super) fn emit_parameters(&mut self, params: &[IRParam]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if param.rest {
                self.write("...");
            }
            self.write(&param.name);
            if let Some(default) = &param.default_value {
                self.write(" = ");
                self.emit_with_min_precedence(default, prec::ASSIGNMENT);
            }
        }
    }

    /// `var a = 1, b` without the trailing semicolon (shared with `for` headers).
    pub(super) fn emit_variable_list(&mut self, kind: VarKind, declarations: &[IRNode]) {
        self.write(kind.as_str());
        self.write(" ");
        self.emit_comma_separated(declarations);
    }

    /// Emit list items, grouping any that contain a top-level comma.
    pub(super) fn emit_comma_separated(&mut self, nodes: &[IRNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_with_min_precedence(node, prec::ASSIGNMENT);
        }
    }

    pub(super) fn emit_object_literal_single_line(&mut self, properties: &[IRProperty]) {
        if properties.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        for (i, prop) in properties.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_property(prop);
        }
        self.write(" }");
    }

    pub(super) fn emit_object_literal_multiline(&mut self, properties: &[IRProperty]) {
        if properties.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for (i, prop) in properties.iter().enumerate() {
            self.write_indent();
            self.emit_property(prop);
            if i < properties.len() - 1 {
                self.write(",");
            }
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    pub(super) fn emit_property(&mut self, prop: &IRProperty) {
        match prop {
            IRProperty::Init { key, value } => {
                match key {
                    IRPropertyKey::Identifier(name) | IRPropertyKey::Literal(name) => {
                        self.write(name)
                    }
                    IRPropertyKey::Computed(expr) => {
                        self.write("[");
                        self.emit_with_min_precedence(expr, prec::ASSIGNMENT);
                        self.write("]");
                    }
                }
                self.write(": ");
                self.emit_with_min_precedence(value, prec::ASSIGNMENT);
            }
            IRProperty::Shorthand(name) => self.write(name),
            IRProperty::Spread(expr) => {
                self.write("...");
                self.emit_with_min_precedence(expr, prec::ASSIGNMENT);
            }
        }
    }

    pub(super) fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub(super) fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\0' => self.output.push_str("\\0"),
                '\u{2028}' | '\u{2029}' => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                c if (c as u32) < 0x20 || c == '\x7F' => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                _ => self.output.push(c),
            }
        }
    }

    pub(super) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(super) fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    pub(super) const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(super) const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

impl Default for IRPrinter {
    fn default() -> Self {
        Self::new()
    }
}
