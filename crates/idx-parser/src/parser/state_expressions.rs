//! Parser state - expression parsing methods

use super::state::{
    CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState,
};
use super::state_statements::function_context_flags;
use crate::parser::{NodeIndex, NodeList, node::*, syntax_kind_ext};
use idx_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    /// Parse an expression (including comma operator)
    pub fn parse_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_assignment_expression();
        if left.is_none() {
            return left;
        }

        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            if right.is_none() {
                self.error_expression_expected();
                break;
            }
            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start_pos,
                self.previous_token_end,
                BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken as u16,
                    right,
                },
            );
        }

        left
    }

    pub(crate) fn parse_expression_or_missing(&mut self) -> NodeIndex {
        let expression = self.parse_expression();
        if expression.is_none() {
            self.error_expression_expected();
            return self.create_missing_identifier();
        }
        expression
    }

    pub(crate) fn parse_assignment_expression_or_missing(&mut self) -> NodeIndex {
        let expression = self.parse_assignment_expression();
        if expression.is_none() {
            self.error_expression_expected();
            return self.create_missing_identifier();
        }
        expression
    }

    /// Parse assignment expression. Returns `NodeIndex::NONE` (without
    /// reporting) when the current token cannot start an expression.
    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::YieldKeyword) && self.in_generator_context() {
            return self.parse_yield_expression();
        }

        let start_pos = self.token_pos();
        if self.is_start_of_arrow_function() {
            return self.parse_arrow_function_expression(start_pos, false);
        }
        if self.is_token(SyntaxKind::AsyncKeyword) && self.look_ahead_is_async_arrow_function() {
            self.next_token();
            return self.parse_arrow_function_expression(start_pos, true);
        }

        let expression = self.parse_conditional_expression();
        if expression.is_none() {
            return expression;
        }

        if self.token().is_assignment_operator() {
            let operator_token = self.token() as u16;
            self.next_token();
            let right = self.parse_assignment_expression_or_missing();
            return self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start_pos,
                self.previous_token_end,
                BinaryExprData {
                    left: expression,
                    operator_token,
                    right,
                },
            );
        }

        expression
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let condition = self.parse_binary_expression(1);
        if condition.is_none() || !self.is_token(SyntaxKind::QuestionToken) {
            return condition;
        }

        self.next_token();
        let when_true = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
            state.parse_assignment_expression_or_missing()
        });
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression_or_missing();

        self.arena.add_conditional_expr(
            syntax_kind_ext::CONDITIONAL_EXPRESSION,
            start_pos,
            self.previous_token_end,
            ConditionalExprData {
                condition,
                when_true,
                when_false,
            },
        )
    }

    fn binary_operator_precedence(&self, kind: SyntaxKind) -> u8 {
        match kind {
            SyntaxKind::QuestionQuestionToken => 1,
            SyntaxKind::BarBarToken => 2,
            SyntaxKind::AmpersandAmpersandToken => 3,
            SyntaxKind::BarToken => 4,
            SyntaxKind::CaretToken => 5,
            SyntaxKind::AmpersandToken => 6,
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => 7,
            SyntaxKind::InKeyword if self.in_disallow_in_context() => 0,
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::InstanceOfKeyword
            | SyntaxKind::InKeyword => 8,
            SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 9,
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => 10,
            SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 11,
            SyntaxKind::AsteriskAsteriskToken => 12,
            _ => 0,
        }
    }

    /// Precedence climbing over binary operators. `**` is right-associative.
    pub(crate) fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        if left.is_none() {
            return left;
        }

        loop {
            let operator = self.token();
            let precedence = self.binary_operator_precedence(operator);
            if precedence == 0 || precedence < min_precedence {
                break;
            }
            self.next_token();

            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence
            } else {
                precedence + 1
            };
            let mut right = self.parse_binary_expression(next_min);
            if right.is_none() {
                self.error_expression_expected();
                right = self.create_missing_identifier();
            }

            left = self.arena.add_binary_expr(
                syntax_kind_ext::BINARY_EXPRESSION,
                start_pos,
                self.previous_token_end,
                BinaryExprData {
                    left,
                    operator_token: operator as u16,
                    right,
                },
            );
        }

        left
    }

    pub(crate) fn parse_unary_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.create_missing_identifier();
        }
        let result = self.parse_unary_expression_inner();
        self.exit_recursion();
        result
    }

    fn parse_unary_expression_inner(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::ExclamationToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword => {
                let operator = self.token() as u16;
                self.next_token();
                let mut operand = self.parse_unary_expression();
                if operand.is_none() {
                    self.error_expression_expected();
                    operand = self.create_missing_identifier();
                }
                self.arena.add_unary_expr(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    start_pos,
                    self.previous_token_end,
                    UnaryExprData { operator, operand },
                )
            }
            SyntaxKind::AwaitKeyword if self.in_async_context() => {
                self.next_token();
                let mut expression = self.parse_unary_expression();
                if expression.is_none() {
                    self.error_expression_expected();
                    expression = self.create_missing_identifier();
                }
                self.arena.add_unary_expr_ex(
                    syntax_kind_ext::AWAIT_EXPRESSION,
                    start_pos,
                    self.previous_token_end,
                    UnaryExprDataEx {
                        expression,
                        asterisk_token: false,
                    },
                )
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression();
        if expression.is_none() {
            return expression;
        }

        if (self.is_token(SyntaxKind::PlusPlusToken) || self.is_token(SyntaxKind::MinusMinusToken))
            && !self.has_preceding_line_break()
        {
            let operator = self.token() as u16;
            self.next_token();
            return self.arena.add_unary_expr(
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION,
                start_pos,
                self.previous_token_end,
                UnaryExprData {
                    operator,
                    operand: expression,
                },
            );
        }

        expression
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        let mut asterisk_token = false;
        let mut expression = NodeIndex::NONE;
        if !self.has_preceding_line_break() {
            asterisk_token = self.parse_optional(SyntaxKind::AsteriskToken);
            if asterisk_token {
                expression = self.parse_assignment_expression_or_missing();
            } else if !self.is_expression_terminator() {
                expression = self.parse_assignment_expression();
            }
        }

        self.arena.add_unary_expr_ex(
            syntax_kind_ext::YIELD_EXPRESSION,
            start_pos,
            self.previous_token_end,
            UnaryExprDataEx {
                expression,
                asterisk_token,
            },
        )
    }

    fn is_expression_terminator(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EndOfFileToken
        )
    }

    // =========================================================================
    // Member and call expressions
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        if expression.is_none() {
            return expression;
        }
        self.parse_member_expression_rest(start_pos, expression, true)
    }

    /// Parse `.name`, `[expr]` and (when `allow_calls`) `(args)` suffixes.
    fn parse_member_expression_rest(
        &mut self,
        start_pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        loop {
            let mut question_dot_token = false;
            if self.is_token(SyntaxKind::QuestionDotToken) {
                self.error_unsupported("Optional chaining");
                question_dot_token = true;
                self.next_token();
                if !self.is_token(SyntaxKind::OpenBracketToken)
                    && !self.is_token(SyntaxKind::OpenParenToken)
                {
                    expression = self.parse_property_access_name(start_pos, expression, true);
                    continue;
                }
            }

            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    expression = self.parse_property_access_name(start_pos, expression, false);
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let argument = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
                        state.parse_expression_or_missing()
                    });
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = self.arena.add_access_expr(
                        syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                        start_pos,
                        self.previous_token_end,
                        AccessExprData {
                            expression,
                            name_or_argument: argument,
                            question_dot_token,
                        },
                    );
                }
                SyntaxKind::OpenParenToken if allow_calls || question_dot_token => {
                    let arguments = self.parse_argument_list();
                    expression = self.arena.add_call_expr(
                        syntax_kind_ext::CALL_EXPRESSION,
                        start_pos,
                        self.previous_token_end,
                        CallExprData {
                            expression,
                            arguments: Some(arguments),
                        },
                    );
                }
                SyntaxKind::BacktickToken => {
                    self.error_unsupported("Tagged template");
                    return expression;
                }
                _ => return expression,
            }
        }
    }

    fn parse_property_access_name(
        &mut self,
        start_pos: u32,
        expression: NodeIndex,
        question_dot_token: bool,
    ) -> NodeIndex {
        let name = if self.is_identifier_or_keyword() {
            self.parse_identifier()
        } else {
            if self.is_token(SyntaxKind::HashToken) {
                self.error_unsupported("Private name");
            } else {
                self.error_identifier_expected();
            }
            self.create_missing_identifier()
        };

        self.arena.add_access_expr(
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
            start_pos,
            self.previous_token_end,
            AccessExprData {
                expression,
                name_or_argument: name,
                question_dot_token,
            },
        )
    }

    /// `new Callee(args)` or `new Callee`
    fn parse_new_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        if self.is_token(SyntaxKind::DotToken) {
            self.error_unsupported("new.target");
            return self.create_missing_identifier();
        }

        let callee_start = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = if callee.is_none() {
            self.error_expression_expected();
            self.create_missing_identifier()
        } else {
            self.parse_member_expression_rest(callee_start, callee, false)
        };

        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list())
        } else {
            None
        };

        self.arena.add_call_expr(
            syntax_kind_ext::NEW_EXPRESSION,
            start_pos,
            self.previous_token_end,
            CallExprData {
                expression: callee,
                arguments,
            },
        )
    }

    /// Parse `(a, ...b, c)`; trailing commas are allowed.
    pub(crate) fn parse_argument_list(&mut self) -> NodeList {
        let mut arguments = Vec::new();
        self.parse_expected(SyntaxKind::OpenParenToken);

        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
            while !state.is_token(SyntaxKind::CloseParenToken)
                && !state.is_token(SyntaxKind::EndOfFileToken)
            {
                let argument = state.parse_spread_or_assignment_expression();
                if argument.is_none() {
                    state.error_expression_expected();
                    break;
                }
                arguments.push(argument);
                if !state.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });

        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(arguments)
    }

    fn parse_spread_or_assignment_expression(&mut self) -> NodeIndex {
        if !self.is_token(SyntaxKind::DotDotDotToken) {
            return self.parse_assignment_expression();
        }
        let start_pos = self.token_pos();
        self.next_token();
        let expression = self.parse_assignment_expression_or_missing();
        self.arena.add_unary_expr_ex(
            syntax_kind_ext::SPREAD_ELEMENT,
            start_pos,
            self.previous_token_end,
            UnaryExprDataEx {
                expression,
                asterisk_token: false,
            },
        )
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    pub(crate) fn parse_primary_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral => self.parse_literal(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.current_token = self.scanner.rescan_slash_token();
                self.parse_literal()
            }
            SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword => {
                let kind = self.token() as u16;
                self.next_token();
                self.arena.add_token(kind, start_pos, self.previous_token_end)
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(start_pos, false),
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.next_token();
                self.parse_function_expression(start_pos, true)
            }
            SyntaxKind::BacktickToken => {
                self.error_unsupported("Template literal");
                self.skip_template();
                self.create_missing_identifier()
            }
            SyntaxKind::ClassKeyword => {
                self.error_unsupported("Class expression");
                self.create_missing_identifier()
            }
            SyntaxKind::SuperKeyword => {
                self.error_unsupported("super");
                self.next_token();
                self.create_missing_identifier()
            }
            SyntaxKind::ImportKeyword => {
                self.error_unsupported("Dynamic import");
                self.next_token();
                self.create_missing_identifier()
            }
            SyntaxKind::HashToken => {
                self.error_unsupported("Private name");
                self.next_token();
                self.create_missing_identifier()
            }
            _ if self.is_identifier() => self.parse_identifier(),
            _ => NodeIndex::NONE,
        }
    }

    /// Skip the tokens of a template literal after reporting it.
    fn skip_template(&mut self) {
        self.next_token();
        while !self.is_token(SyntaxKind::BacktickToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            self.next_token();
        }
        self.parse_optional(SyntaxKind::BacktickToken);
    }

    fn parse_literal(&mut self) -> NodeIndex {
        let kind = self.token() as u16;
        let start_pos = self.token_pos();
        let end_pos = self.token_end();
        let raw_text = self.scanner.token_text().to_string();
        let text = self.token_value();
        self.next_token();
        self.arena
            .add_literal(kind, start_pos, end_pos, LiteralData { text, raw_text })
    }

    fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
            state.parse_expression_or_missing()
        });
        self.parse_expected(SyntaxKind::CloseParenToken);

        self.arena.add_parenthesized(
            syntax_kind_ext::PARENTHESIZED_EXPRESSION,
            start_pos,
            self.previous_token_end,
            ParenthesizedData { expression },
        )
    }

    /// `[a, , ...b]`
    fn parse_array_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();

        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
            while !state.is_token(SyntaxKind::CloseBracketToken)
                && !state.is_token(SyntaxKind::EndOfFileToken)
            {
                if state.is_token(SyntaxKind::CommaToken) {
                    let pos = state.token_pos();
                    elements.push(
                        state
                            .arena
                            .add_token(syntax_kind_ext::OMITTED_EXPRESSION, pos, pos),
                    );
                    state.next_token();
                    continue;
                }
                let element = state.parse_spread_or_assignment_expression();
                if element.is_none() {
                    state.error_expression_expected();
                    break;
                }
                elements.push(element);
                if !state.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        });

        let multi_line = self.has_preceding_line_break();
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
            start_pos,
            self.previous_token_end,
            LiteralExprData {
                elements: NodeList::with_nodes(elements),
                multi_line,
            },
        )
    }

    /// `{ a: 1, b, [k]: v, ...rest }`
    fn parse_object_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();

        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
            while !state.is_token(SyntaxKind::CloseBraceToken)
                && !state.is_token(SyntaxKind::EndOfFileToken)
            {
                let pos_before = state.token_pos();
                let member = state.parse_object_literal_member();
                if member.is_some() {
                    elements.push(member);
                }
                if !state.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
                if state.token_pos() == pos_before {
                    break;
                }
            }
        });

        let multi_line = self.has_preceding_line_break();
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_literal_expr(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            start_pos,
            self.previous_token_end,
            LiteralExprData {
                elements: NodeList::with_nodes(elements),
                multi_line,
            },
        )
    }

    fn parse_object_literal_member(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression_or_missing();
            return self.arena.add_unary_expr_ex(
                syntax_kind_ext::SPREAD_ASSIGNMENT,
                start_pos,
                self.previous_token_end,
                UnaryExprDataEx {
                    expression,
                    asterisk_token: false,
                },
            );
        }

        if self.is_token(SyntaxKind::AsteriskToken) || self.look_ahead_is_accessor() {
            self.error_unsupported("Object literal method");
            self.skip_object_member();
            return NodeIndex::NONE;
        }

        let is_shorthand_candidate = self.is_identifier();
        let name = self.parse_property_name();
        if name.is_none() {
            self.error_token_expected("}");
            return NodeIndex::NONE;
        }

        if self.parse_optional(SyntaxKind::ColonToken) {
            let initializer = self.parse_assignment_expression_or_missing();
            return self.arena.add_property_assignment(
                syntax_kind_ext::PROPERTY_ASSIGNMENT,
                start_pos,
                self.previous_token_end,
                PropertyAssignmentData { name, initializer },
            );
        }

        if self.is_token(SyntaxKind::OpenParenToken) {
            self.error_unsupported("Object literal method");
            self.skip_object_member();
            return NodeIndex::NONE;
        }

        if !is_shorthand_candidate {
            self.error_token_expected(":");
            return NodeIndex::NONE;
        }

        self.arena.add_property_assignment(
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            start_pos,
            self.previous_token_end,
            PropertyAssignmentData {
                name,
                initializer: NodeIndex::NONE,
            },
        )
    }

    /// `get x() {}` / `set x(v) {}` / `async x() {}`
    fn look_ahead_is_accessor(&mut self) -> bool {
        let is_modifier = self.is_token(SyntaxKind::AsyncKeyword)
            || matches!(self.scanner.token_value(), "get" | "set")
                && self.is_token(SyntaxKind::Identifier);
        if !is_modifier {
            return false;
        }
        self.look_ahead(|state| {
            state.next_token();
            !state.has_preceding_line_break()
                && (state.is_identifier_or_keyword()
                    || state.is_token(SyntaxKind::StringLiteral)
                    || state.is_token(SyntaxKind::NumericLiteral)
                    || state.is_token(SyntaxKind::OpenBracketToken)
                    || state.is_token(SyntaxKind::AsteriskToken))
        })
    }

    /// Skip to the comma or closing brace ending an object member.
    fn skip_object_member(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken if depth == 0 => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
        }
    }

    fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_literal()
            }
            SyntaxKind::OpenBracketToken => {
                let start_pos = self.token_pos();
                self.next_token();
                let expression = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |state| {
                    state.parse_assignment_expression_or_missing()
                });
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena.add_computed_property(
                    syntax_kind_ext::COMPUTED_PROPERTY_NAME,
                    start_pos,
                    self.previous_token_end,
                    ComputedPropertyData { expression },
                )
            }
            _ if self.is_identifier_or_keyword() => self.parse_identifier(),
            _ => NodeIndex::NONE,
        }
    }

    // =========================================================================
    // Functions and arrows
    // =========================================================================

    /// `function [*] [name](params) { body }`; `async` is already consumed.
    fn parse_function_expression(&mut self, start_pos: u32, is_async: bool) -> NodeIndex {
        let data = self.parse_function_like(is_async, false);
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_EXPRESSION,
            start_pos,
            self.previous_token_end,
            data,
        )
    }

    /// `x =>` or `(...) =>`, checked without consuming tokens.
    pub(crate) fn is_start_of_arrow_function(&mut self) -> bool {
        if self.is_identifier() {
            return self.look_ahead(|state| {
                state.next_token();
                state.is_token(SyntaxKind::EqualsGreaterThanToken)
                    && !state.has_preceding_line_break()
            });
        }
        if self.is_token(SyntaxKind::OpenParenToken) {
            return self.look_ahead(|state| state.skip_parenthesized_then_is_arrow());
        }
        false
    }

    /// `async x =>` or `async (...) =>`
    fn look_ahead_is_async_arrow_function(&mut self) -> bool {
        self.look_ahead(|state| {
            state.next_token();
            if state.has_preceding_line_break() {
                return false;
            }
            state.is_start_of_arrow_function()
        })
    }

    /// From `(`, skip to the matching `)` and test for `=>`.
    fn skip_parenthesized_then_is_arrow(&mut self) -> bool {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next_token();
                        return self.is_token(SyntaxKind::EqualsGreaterThanToken)
                            && !self.has_preceding_line_break();
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
            self.next_token();
        }
    }

    /// Parse an arrow function; `async` is already consumed.
    fn parse_arrow_function_expression(&mut self, start_pos: u32, is_async: bool) -> NodeIndex {
        let flags = function_context_flags(is_async, false);

        let (parameters, body) = self.with_context(
            flags,
            CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR,
            |state| {
                let parameters = if state.is_token(SyntaxKind::OpenParenToken) {
                    state.parse_parameter_list()
                } else {
                    let param_start = state.token_pos();
                    let name = state.parse_identifier();
                    let parameter = state.arena.add_parameter(
                        syntax_kind_ext::PARAMETER,
                        param_start,
                        state.previous_token_end,
                        ParameterData {
                            dot_dot_dot_token: false,
                            name,
                            initializer: NodeIndex::NONE,
                        },
                    );
                    NodeList::with_nodes(vec![parameter])
                };
                state.parse_expected(SyntaxKind::EqualsGreaterThanToken);

                let body = if state.is_token(SyntaxKind::OpenBraceToken) {
                    state.parse_function_body()
                } else {
                    state.parse_assignment_expression_or_missing()
                };
                (parameters, body)
            },
        );

        tracing::trace!(pos = start_pos, is_async, "parse_arrow_function_expression");

        self.arena.add_function(
            syntax_kind_ext::ARROW_FUNCTION,
            start_pos,
            self.previous_token_end,
            FunctionData {
                is_async,
                asterisk_token: false,
                name: NodeIndex::NONE,
                parameters,
                body,
                equals_greater_than_token: true,
            },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/state_expression_tests.rs"]
mod tests;
