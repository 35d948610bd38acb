//! Parser state: token cursor, diagnostics and context flags.
//!
//! Statement parsing lives in `state_statements.rs`, expression parsing in
//! `state_expressions.rs`.

use super::base::NodeIndex;
use super::node::{IdentifierData, NodeArena};
use idx_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use idx_common::limits::MAX_PARSER_DEPTH;
use idx_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};
use serde::Serialize;

pub(crate) const CONTEXT_FLAG_ASYNC: u32 = 1 << 0;
pub(crate) const CONTEXT_FLAG_GENERATOR: u32 = 1 << 1;
/// `in` is not a binary operator (for-statement initializers)
pub(crate) const CONTEXT_FLAG_DISALLOW_IN: u32 = 1 << 2;
pub(crate) const CONTEXT_FLAG_IN_FUNCTION: u32 = 1 << 3;
pub(crate) const CONTEXT_FLAG_IN_ITERATION: u32 = 1 << 4;

/// A syntax error with its byte range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

pub(crate) struct SavedState {
    scanner: ScannerSnapshot,
    current_token: SyntaxKind,
    previous_token_end: u32,
    diagnostics_len: usize,
    last_error_pos: Option<u32>,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) current_token: SyntaxKind,
    pub(crate) context_flags: u32,
    pub(crate) recursion_depth: u32,
    /// End of the most recently consumed token
    pub(crate) previous_token_end: u32,
    /// Position of the last reported error, to suppress cascades
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let estimated_nodes = source_text.len() / 4;
        ParserState {
            scanner: ScannerState::new(source_text),
            arena: NodeArena::with_capacity(estimated_nodes),
            file_name,
            parse_diagnostics: Vec::new(),
            current_token: SyntaxKind::Unknown,
            context_flags: 0,
            recursion_depth: 0,
            previous_token_end: 0,
            last_error_pos: None,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.previous_token_end = self.token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.u32_from_usize(self.scanner.token_start())
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.u32_from_usize(self.scanner.token_end())
    }

    pub(crate) fn token_value(&self) -> String {
        self.scanner.token_value().to_string()
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn u32_from_usize(&self, value: usize) -> u32 {
        u32::try_from(value).unwrap_or(u32::MAX)
    }

    /// Identifiers, plus contextual keywords outside the context that
    /// reserves them.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.current_token {
            SyntaxKind::Identifier => true,
            SyntaxKind::AwaitKeyword => !self.in_async_context(),
            SyntaxKind::YieldKeyword => !self.in_generator_context(),
            kind => kind.is_contextual_keyword(),
        }
    }

    /// Any identifier or keyword (property names after `.`, object keys).
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.current_token == SyntaxKind::Identifier || self.current_token.is_keyword()
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report `'x' expected.`
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            self.error_token_expected(kind.text());
            false
        }
    }

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
    }

    /// Consume a statement terminator, applying automatic semicolon insertion.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.is_token(SyntaxKind::SemicolonToken) {
            self.next_token();
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.error_token_expected(";");
        false
    }

    // =========================================================================
    // Look-ahead
    // =========================================================================

    pub(crate) fn save(&self) -> SavedState {
        SavedState {
            scanner: self.scanner.save_state(),
            current_token: self.current_token,
            previous_token_end: self.previous_token_end,
            diagnostics_len: self.parse_diagnostics.len(),
            last_error_pos: self.last_error_pos,
        }
    }

    pub(crate) fn restore(&mut self, saved: SavedState) {
        self.scanner.restore_state(saved.scanner);
        self.current_token = saved.current_token;
        self.previous_token_end = saved.previous_token_end;
        self.parse_diagnostics.truncate(saved.diagnostics_len);
        self.last_error_pos = saved.last_error_pos;
    }

    /// Run `callback` speculatively and rewind the cursor afterwards.
    pub(crate) fn look_ahead<T>(&mut self, callback: impl FnOnce(&mut ParserState) -> T) -> T {
        let saved = self.save();
        let result = callback(self);
        self.restore(saved);
        result
    }

    // =========================================================================
    // Context flags
    // =========================================================================

    pub(crate) fn in_async_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_ASYNC != 0
    }

    pub(crate) fn in_generator_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_GENERATOR != 0
    }

    pub(crate) fn in_disallow_in_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_DISALLOW_IN != 0
    }

    /// Run `callback` with `set` flags added and `clear` flags removed.
    pub(crate) fn with_context<T>(
        &mut self,
        set: u32,
        clear: u32,
        callback: impl FnOnce(&mut ParserState) -> T,
    ) -> T {
        let saved = self.context_flags;
        self.context_flags = (self.context_flags & !clear) | set;
        let result = callback(self);
        self.context_flags = saved;
        result
    }

    /// Enter one level of expression nesting; reports once when too deep.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_DEPTH {
            self.parse_error_at_current_token(
                diagnostic_messages::NESTING_TOO_DEEP,
                diagnostic_codes::NESTING_TOO_DEEP,
            );
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        tracing::trace!(start, code, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, code);
    }

    pub(crate) fn error_token_expected(&mut self, token: &str) {
        let message = format_message(diagnostic_messages::EXPECTED, &[token]);
        self.parse_error_at_current_token(&message, diagnostic_codes::EXPECTED);
    }

    pub(crate) fn error_expression_expected(&mut self) {
        self.parse_error_at_current_token(
            diagnostic_messages::EXPRESSION_EXPECTED,
            diagnostic_codes::EXPRESSION_EXPECTED,
        );
    }

    pub(crate) fn error_identifier_expected(&mut self) {
        self.parse_error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
    }

    pub(crate) fn error_unsupported(&mut self, what: &str) {
        let message = format_message(diagnostic_messages::UNSUPPORTED_SYNTAX, &[what]);
        self.parse_error_at_current_token(&message, diagnostic_codes::UNSUPPORTED_SYNTAX);
    }

    /// Placeholder identifier used after an error so callers always get a node.
    pub(crate) fn create_missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            pos,
            pos,
            IdentifierData {
                escaped_text: String::new(),
            },
        )
    }
}
