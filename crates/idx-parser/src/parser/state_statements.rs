//! Parser state - statement and declaration parsing methods

use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR,
    CONTEXT_FLAG_IN_FUNCTION, CONTEXT_FLAG_IN_ITERATION, ParseDiagnostic, ParserState,
};
use crate::parser::{
    NodeIndex, NodeList,
    node::{
        BlockData, ExprStatementData, FunctionData, IdentifierData, IfStatementData,
        ImportDeclData, LiteralData, LoopData, ParameterData, ReturnData, SourceFileData,
        VariableData, VariableDeclarationData, node_flags,
    },
    syntax_kind_ext,
};
use idx_common::diagnostics::{diagnostic_codes, diagnostic_messages};
use idx_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Source file
    // =========================================================================

    /// Parse the whole source text into a `SOURCE_FILE` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        let _span = tracing::debug_span!("parse_source_file", file = %self.file_name).entered();

        self.scanner.scan_shebang_trivia();
        self.next_token();

        let statements = self.parse_statement_list(|state| {
            state.is_token(SyntaxKind::EndOfFileToken)
        });

        for diag in self.scanner.take_diagnostics() {
            self.parse_diagnostics.push(ParseDiagnostic {
                start: self.u32_from_usize(diag.pos),
                length: self.u32_from_usize(diag.length),
                message: diag.message.to_string(),
                code: diag.code,
            });
        }
        self.parse_diagnostics.sort_by_key(|d| d.start);

        let end_pos = self.token_end();
        let eof_token = self
            .arena
            .add_token(SyntaxKind::EndOfFileToken as u16, end_pos, end_pos);

        tracing::debug!(
            nodes = self.arena.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );

        self.arena.add_source_file(
            syntax_kind_ext::SOURCE_FILE,
            0,
            end_pos,
            SourceFileData {
                statements,
                end_of_file_token: eof_token,
                file_name: self.file_name.clone(),
                text: self.scanner.source_text().to_string(),
            },
        )
    }

    /// Parse statements until `is_end` holds, resynchronizing after errors.
    fn parse_statement_list(&mut self, is_end: impl Fn(&ParserState) -> bool) -> NodeList {
        let mut statements = Vec::new();

        while !is_end(self) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let pos_before = self.token_pos();

            if self.is_token(SyntaxKind::CloseBraceToken) {
                self.parse_error_at_current_token(
                    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.next_token();
                continue;
            }

            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }

            // Guarantee forward progress on malformed input.
            if self.token_pos() == pos_before && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }

        NodeList::with_nodes(statements)
    }

    /// Skip tokens up to the end of the current statement.
    fn skip_to_statement_boundary(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::SemicolonToken if depth == 0 => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseBraceToken => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                _ => {}
            }
            self.next_token();
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                let start_pos = self.token_pos();
                self.next_token();
                self.arena
                    .add_token(syntax_kind_ext::EMPTY_STATEMENT, start_pos, self.previous_token_end)
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(self.token_pos(), false),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                let start_pos = self.token_pos();
                self.next_token();
                self.parse_function_declaration(start_pos, true)
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(syntax_kind_ext::RETURN_STATEMENT),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(syntax_kind_ext::THROW_STATEMENT),
            SyntaxKind::BreakKeyword => self.parse_jump_statement(syntax_kind_ext::BREAK_STATEMENT),
            SyntaxKind::ContinueKeyword => {
                self.parse_jump_statement(syntax_kind_ext::CONTINUE_STATEMENT)
            }
            SyntaxKind::ImportKeyword
                if !self.look_ahead(|state| {
                    matches!(
                        state.next_token(),
                        SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                    )
                }) =>
            {
                self.parse_import_declaration()
            }
            SyntaxKind::ClassKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::DebuggerKeyword
            | SyntaxKind::EnumKeyword => {
                let keyword = self.token().text();
                self.error_unsupported(&format!("{keyword} statement"));
                self.skip_to_statement_boundary();
                NodeIndex::NONE
            }
            _ => self.parse_expression_statement(),
        }
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements =
            self.parse_statement_list(|state| state.is_token(SyntaxKind::CloseBraceToken));
        let multi_line = self.has_preceding_line_break() || !statements.is_empty();
        self.parse_expected(SyntaxKind::CloseBraceToken);

        self.arena.add_block(
            syntax_kind_ext::BLOCK,
            start_pos,
            self.previous_token_end,
            BlockData {
                statements,
                multi_line,
            },
        )
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_expression();
        if expression.is_none() {
            self.skip_to_statement_boundary();
            return NodeIndex::NONE;
        }
        if !self.parse_semicolon() {
            self.skip_to_statement_boundary();
        }

        self.arena.add_expr_statement(
            syntax_kind_ext::EXPRESSION_STATEMENT,
            start_pos,
            self.previous_token_end,
            ExprStatementData { expression },
        )
    }

    fn look_ahead_is_let_declaration(&mut self) -> bool {
        self.look_ahead(|state| {
            state.next_token();
            state.is_identifier()
                || state.is_token(SyntaxKind::OpenBracketToken)
                || state.is_token(SyntaxKind::OpenBraceToken)
        })
    }

    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        self.look_ahead(|state| {
            state.next_token();
            state.is_token(SyntaxKind::FunctionKeyword) && !state.has_preceding_line_break()
        })
    }

    // =========================================================================
    // Variable statements
    // =========================================================================

    fn parse_variable_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let flags = self.parse_variable_keyword();
        let declarations = self.parse_variable_declaration_list();
        self.parse_semicolon();

        let statement = self.arena.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            start_pos,
            self.previous_token_end,
            VariableData { declarations },
        );
        self.arena.set_flags(statement, flags);
        statement
    }

    fn parse_variable_keyword(&mut self) -> u16 {
        let flags = match self.token() {
            SyntaxKind::LetKeyword => node_flags::LET,
            SyntaxKind::ConstKeyword => node_flags::CONST,
            _ => 0,
        };
        self.next_token();
        flags
    }

    fn parse_variable_declaration_list(&mut self) -> NodeList {
        let mut declarations = Vec::new();
        loop {
            let start_pos = self.token_pos();
            let name = self.parse_binding_identifier();
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression_or_missing()
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.arena.add_variable_declaration(
                syntax_kind_ext::VARIABLE_DECLARATION,
                start_pos,
                self.previous_token_end,
                VariableDeclarationData { name, initializer },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        NodeList::with_nodes(declarations)
    }

    /// Binding names are plain identifiers; destructuring is rejected.
    pub(crate) fn parse_binding_identifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::OpenBraceToken) || self.is_token(SyntaxKind::OpenBracketToken)
        {
            self.error_unsupported("Destructuring pattern");
            self.skip_balanced();
            return self.create_missing_identifier();
        }
        if !self.is_identifier() {
            self.error_identifier_expected();
            return self.create_missing_identifier();
        }
        self.parse_identifier()
    }

    /// Skip a bracketed group starting at the current opening token.
    fn skip_balanced(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenParenToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseParenToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                SyntaxKind::EndOfFileToken => return,
                _ => {}
            }
            self.next_token();
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Parse `function [*] name(params) { body }`; `async` is already consumed.
    fn parse_function_declaration(&mut self, start_pos: u32, is_async: bool) -> NodeIndex {
        let data = self.parse_function_like(is_async, true);
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_DECLARATION,
            start_pos,
            self.previous_token_end,
            data,
        )
    }

    /// Shared by declarations and function expressions. Starts at `function`.
    pub(crate) fn parse_function_like(&mut self, is_async: bool, name_required: bool) -> FunctionData {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);

        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            if name_required {
                self.error_identifier_expected();
            }
            NodeIndex::NONE
        };

        let flags = function_context_flags(is_async, asterisk_token);
        let (parameters, body) = self.with_context(
            flags,
            CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR | CONTEXT_FLAG_DISALLOW_IN,
            |state| {
                let parameters = state.parse_parameter_list();
                let body = state.parse_function_body();
                (parameters, body)
            },
        );

        FunctionData {
            is_async,
            asterisk_token,
            name,
            parameters,
            body,
            equals_greater_than_token: false,
        }
    }

    /// Parse a block body with iteration context reset.
    pub(crate) fn parse_function_body(&mut self) -> NodeIndex {
        self.with_context(CONTEXT_FLAG_IN_FUNCTION, CONTEXT_FLAG_IN_ITERATION, |state| {
            state.parse_block()
        })
    }

    /// Parse `(a, b = 1, ...rest)`.
    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let mut parameters = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::new();
        }

        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let pos_before = self.token_pos();
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == pos_before {
                break;
            }
        }

        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(parameters)
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_identifier();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_or_missing()
        } else {
            NodeIndex::NONE
        };

        self.arena.add_parameter(
            syntax_kind_ext::PARAMETER,
            start_pos,
            self.previous_token_end,
            ParameterData {
                dot_dot_dot_token,
                name,
                initializer,
            },
        )
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_or_missing();
        self.parse_expected(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_embedded_statement(&mut self) -> NodeIndex {
        let statement = self.parse_statement();
        if statement.is_none() {
            let pos = self.token_pos();
            return self
                .arena
                .add_token(syntax_kind_ext::EMPTY_STATEMENT, pos, pos);
        }
        statement
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_embedded_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_embedded_statement()
        } else {
            NodeIndex::NONE
        };

        self.arena.add_if_statement(
            syntax_kind_ext::IF_STATEMENT,
            start_pos,
            self.previous_token_end,
            IfStatementData {
                expression,
                then_statement,
                else_statement,
            },
        )
    }

    fn parse_loop_body(&mut self) -> NodeIndex {
        self.with_context(CONTEXT_FLAG_IN_ITERATION, 0, |state| {
            state.parse_embedded_statement()
        })
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        if self.is_token(SyntaxKind::AwaitKeyword) {
            self.error_unsupported("for await");
            self.skip_to_statement_boundary();
            return NodeIndex::NONE;
        }
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_context(CONTEXT_FLAG_DISALLOW_IN, 0, |state| {
                state.parse_for_initializer()
            })
        };

        if self.is_token(SyntaxKind::InKeyword) || self.is_token(SyntaxKind::OfKeyword) {
            let keyword = self.token().text();
            self.error_unsupported(&format!("for-{keyword} loop"));
            self.skip_to_statement_boundary();
            return NodeIndex::NONE;
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression_or_missing()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression_or_missing()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_loop_body();

        self.arena.add_loop(
            syntax_kind_ext::FOR_STATEMENT,
            start_pos,
            self.previous_token_end,
            LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            },
        )
    }

    /// A variable declaration list (as a `VARIABLE_STATEMENT` node) or an
    /// expression.
    fn parse_for_initializer(&mut self) -> NodeIndex {
        let is_declaration = match self.token() {
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => true,
            SyntaxKind::LetKeyword => self.look_ahead_is_let_declaration(),
            _ => false,
        };
        if !is_declaration {
            return self.parse_expression_or_missing();
        }

        let start_pos = self.token_pos();
        let flags = self.parse_variable_keyword();
        let declarations = self.parse_variable_declaration_list();
        let list = self.arena.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            start_pos,
            self.previous_token_end,
            VariableData { declarations },
        );
        self.arena.set_flags(list, flags);
        list
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let statement = self.parse_loop_body();

        self.arena.add_loop(
            syntax_kind_ext::WHILE_STATEMENT,
            start_pos,
            self.previous_token_end,
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let statement = self.parse_loop_body();
        self.parse_expected(SyntaxKind::WhileKeyword);
        let condition = self.parse_parenthesized_condition();
        // The semicolon after do-while is always optional.
        self.parse_optional(SyntaxKind::SemicolonToken);

        self.arena.add_loop(
            syntax_kind_ext::DO_STATEMENT,
            start_pos,
            self.previous_token_end,
            LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            },
        )
    }

    fn parse_return_or_throw(&mut self, kind: u16) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        let expression = if kind == syntax_kind_ext::THROW_STATEMENT {
            if self.has_preceding_line_break() {
                self.error_expression_expected();
                NodeIndex::NONE
            } else {
                self.parse_expression_or_missing()
            }
        } else if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression_or_missing()
        };
        self.parse_semicolon();

        self.arena.add_return(
            kind,
            start_pos,
            self.previous_token_end,
            ReturnData { expression },
        )
    }

    fn parse_jump_statement(&mut self, kind: u16) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        if !self.can_parse_semicolon() && self.is_identifier() {
            self.error_unsupported("Labeled jump");
            self.next_token();
        }
        self.parse_semicolon();
        self.arena.add_token(kind, start_pos, self.previous_token_end)
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// `import x from "m";` or `import "m";`
    fn parse_import_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        let import_clause = if self.is_token(SyntaxKind::StringLiteral) {
            NodeIndex::NONE
        } else if self.is_identifier() {
            let binding = self.parse_identifier();
            if self.is_token(SyntaxKind::CommaToken) {
                self.error_unsupported("Named import");
                self.skip_to_statement_boundary();
                return NodeIndex::NONE;
            }
            self.parse_expected(SyntaxKind::FromKeyword);
            binding
        } else {
            self.error_unsupported("Named import");
            self.skip_to_statement_boundary();
            return NodeIndex::NONE;
        };

        let module_specifier = if self.is_token(SyntaxKind::StringLiteral) {
            let pos = self.token_pos();
            let end = self.token_end();
            let raw_text = self.scanner.token_text().to_string();
            let text = self.token_value();
            self.next_token();
            self.arena.add_literal(
                SyntaxKind::StringLiteral as u16,
                pos,
                end,
                LiteralData { text, raw_text },
            )
        } else {
            self.error_token_expected("string literal");
            NodeIndex::NONE
        };
        self.parse_semicolon();

        self.arena.add_import_decl(
            syntax_kind_ext::IMPORT_DECLARATION,
            start_pos,
            self.previous_token_end,
            ImportDeclData {
                import_clause,
                module_specifier,
            },
        )
    }

    /// Consume the current identifier-like token as an `Identifier` node.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let end_pos = self.token_end();
        let escaped_text = self.token_value();
        self.next_token();
        self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            start_pos,
            end_pos,
            IdentifierData { escaped_text },
        )
    }
}

pub(crate) fn function_context_flags(is_async: bool, is_generator: bool) -> u32 {
    let mut flags = 0;
    if is_async {
        flags |= CONTEXT_FLAG_ASYNC;
    }
    if is_generator {
        flags |= CONTEXT_FLAG_GENERATOR;
    }
    flags
}

#[cfg(test)]
#[path = "../../tests/state_statement_tests.rs"]
mod tests;
