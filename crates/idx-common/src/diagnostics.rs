//! Diagnostic types and message lookup.
//!
//! Parser and scanner messages use the 1xxx range; marker lowering uses 9xxx.
//! Message templates use `{0}`, `{1}` placeholders filled by [`format_message`].

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const EXPECTED: u32 = 1005;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const DIGIT_EXPECTED: u32 = 1124;
    pub const UNTERMINATED_COMMENT: u32 = 1010;
    pub const UNSUPPORTED_SYNTAX: u32 = 1200;
    pub const NESTING_TOO_DEEP: u32 = 1201;

    pub const MARKER_ARITY: u32 = 9001;
    pub const MARKER_PATH_NOT_FUNCTION: u32 = 9002;
    pub const MARKER_PARAMETER_COUNT: u32 = 9003;
    pub const MARKER_PARAMETER_SHAPE: u32 = 9004;
    pub const MARKER_BODY_SHAPE: u32 = 9005;
    pub const MARKER_BASE_MISMATCH: u32 = 9006;
}

pub mod diagnostic_messages {
    pub const UNTERMINATED_STRING_LITERAL: &str = "Unterminated string literal.";
    pub const EXPECTED: &str = "'{0}' expected.";
    pub const IDENTIFIER_EXPECTED: &str = "Identifier expected.";
    pub const INVALID_CHARACTER: &str = "Invalid character.";
    pub const DECLARATION_OR_STATEMENT_EXPECTED: &str = "Declaration or statement expected.";
    pub const EXPRESSION_EXPECTED: &str = "Expression expected.";
    pub const DIGIT_EXPECTED: &str = "Digit expected.";
    pub const UNTERMINATED_COMMENT: &str = "'*/' expected.";
    pub const UNSUPPORTED_SYNTAX: &str = "'{0}' is not supported by this compiler.";
    pub const NESTING_TOO_DEEP: &str = "Expression nesting is too deep.";

    pub const MARKER_ARITY: &str = "The `{0}` function takes exactly two arguments.";
    pub const MARKER_PATH_NOT_FUNCTION: &str =
        "The second argument supplied to `{0}` must be a function literal.";
    pub const MARKER_PARAMETER_COUNT: &str =
        "The function supplied to `{0}` must take exactly one parameter.";
    pub const MARKER_PARAMETER_SHAPE: &str =
        "The parameter supplied to `{0}` must be a plain identifier.";
    pub const MARKER_BODY_SHAPE: &str = "The body of the function supplied to `{0}` must be a single expression (without curly braces).";
    pub const MARKER_BASE_MISMATCH: &str =
        "The parameter of the function supplied to `{0}` must match the base of the body expression.";
}

/// All known messages, keyed by code.
pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    msg(
        diagnostic_codes::UNTERMINATED_STRING_LITERAL,
        diagnostic_messages::UNTERMINATED_STRING_LITERAL,
    ),
    msg(
        diagnostic_codes::IDENTIFIER_EXPECTED,
        diagnostic_messages::IDENTIFIER_EXPECTED,
    ),
    msg(diagnostic_codes::EXPECTED, diagnostic_messages::EXPECTED),
    msg(
        diagnostic_codes::UNTERMINATED_COMMENT,
        diagnostic_messages::UNTERMINATED_COMMENT,
    ),
    msg(
        diagnostic_codes::EXPRESSION_EXPECTED,
        diagnostic_messages::EXPRESSION_EXPECTED,
    ),
    msg(
        diagnostic_codes::DIGIT_EXPECTED,
        diagnostic_messages::DIGIT_EXPECTED,
    ),
    msg(
        diagnostic_codes::INVALID_CHARACTER,
        diagnostic_messages::INVALID_CHARACTER,
    ),
    msg(
        diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
        diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
    ),
    msg(
        diagnostic_codes::UNSUPPORTED_SYNTAX,
        diagnostic_messages::UNSUPPORTED_SYNTAX,
    ),
    msg(
        diagnostic_codes::NESTING_TOO_DEEP,
        diagnostic_messages::NESTING_TOO_DEEP,
    ),
    msg(
        diagnostic_codes::MARKER_ARITY,
        diagnostic_messages::MARKER_ARITY,
    ),
    msg(
        diagnostic_codes::MARKER_PATH_NOT_FUNCTION,
        diagnostic_messages::MARKER_PATH_NOT_FUNCTION,
    ),
    msg(
        diagnostic_codes::MARKER_PARAMETER_COUNT,
        diagnostic_messages::MARKER_PARAMETER_COUNT,
    ),
    msg(
        diagnostic_codes::MARKER_PARAMETER_SHAPE,
        diagnostic_messages::MARKER_PARAMETER_SHAPE,
    ),
    msg(
        diagnostic_codes::MARKER_BODY_SHAPE,
        diagnostic_messages::MARKER_BODY_SHAPE,
    ),
    msg(
        diagnostic_codes::MARKER_BASE_MISMATCH,
        diagnostic_messages::MARKER_BASE_MISMATCH,
    ),
];

const fn msg(code: u32, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category: DiagnosticCategory::Error,
        message,
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
        }
    }

    /// Build an error from a registered code, filling the template placeholders.
    pub fn from_code(
        file: impl Into<String>,
        start: u32,
        length: u32,
        code: u32,
        args: &[&str],
    ) -> Self {
        let template = get_message_template(code).unwrap_or("Unknown error.");
        Self::error(file, start, length, format_message(template, args), code)
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}
