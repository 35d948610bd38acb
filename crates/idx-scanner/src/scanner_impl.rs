//! Scanner state machine.
//!
//! The scanner produces one token per `scan()` call. Trivia (whitespace and
//! comments) is skipped, but a line break inside trivia sets
//! `has_preceding_line_break` so the parser can apply automatic semicolon
//! insertion. Look-ahead uses `save_state` / `restore_state`.

use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use idx_common::diagnostics::{diagnostic_codes, diagnostic_messages};

/// A diagnostic produced while scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: &'static str,
    pub code: u32,
}

/// Snapshot of scanner state for look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
    diagnostics_len: usize,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        ScannerState {
            text,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Cooked value of the current token (identifier name, string contents,
    /// numeric text).
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn token_end(&self) -> usize {
        self.pos
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ScannerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    /// Skip a `#!` line at the very start of the file.
    pub fn scan_shebang_trivia(&mut self) {
        if self.pos == 0 && self.text.starts_with("#!") {
            self.pos = memchr::memchr(b'\n', self.text.as_bytes()).unwrap_or(self.text.len());
        }
    }

    fn error(&mut self, pos: usize, length: usize, code: u32, message: &'static str) {
        self.diagnostics.push(ScannerDiagnostic {
            pos,
            length,
            message,
            code,
        });
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.text.as_bytes().get(index).copied()
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.peek_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '"' | '\'' => self.scan_string(ch),
            '0'..='9' => self.scan_number(),
            '.' => {
                if matches!(self.char_at(1), Some('0'..='9')) {
                    self.scan_number()
                } else if self.text[self.pos..].starts_with("...") {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                } else {
                    self.pos += 1;
                    SyntaxKind::DotToken
                }
            }
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => self.scan_punctuation(ch),
        };
        self.token
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                    self.preceding_line_break = true;
                    self.pos += ch.len_utf8();
                }
                ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}' => {
                    self.pos += ch.len_utf8();
                }
                c if c.is_whitespace() => self.pos += c.len_utf8(),
                '/' => match self.byte_at(self.pos + 1) {
                    Some(b'/') => {
                        let rest = &self.text.as_bytes()[self.pos..];
                        self.pos += memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                    }
                    Some(b'*') => {
                        let start = self.pos;
                        let body = &self.text[self.pos + 2..];
                        match body.find("*/") {
                            Some(close) => {
                                if body[..close].contains(['\n', '\r']) {
                                    self.preceding_line_break = true;
                                }
                                self.pos += 2 + close + 2;
                            }
                            None => {
                                self.pos = self.text.len();
                                self.error(
                                    start,
                                    2,
                                    diagnostic_codes::UNTERMINATED_COMMENT,
                                    diagnostic_messages::UNTERMINATED_COMMENT,
                                );
                            }
                        }
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if is_identifier_part(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        self.token_value.push_str(text);
        text_to_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_digits(&mut self, accept: fn(u8) -> bool) -> usize {
        let start = self.pos;
        while let Some(b) = self.byte_at(self.pos) {
            if accept(b) || (b == b'_' && self.pos > start) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos - start
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let radix_prefix = if self.byte_at(self.pos) == Some(b'0') {
            self.byte_at(self.pos + 1).map(|b| b.to_ascii_lowercase())
        } else {
            None
        };

        match radix_prefix {
            Some(b'x') | Some(b'o') | Some(b'b') => {
                self.pos += 2;
                let accept: fn(u8) -> bool = match radix_prefix {
                    Some(b'x') => |b| b.is_ascii_hexdigit(),
                    Some(b'o') => |b| (b'0'..=b'7').contains(&b),
                    _ => |b| b == b'0' || b == b'1',
                };
                if self.scan_digits(accept) == 0 {
                    self.error(
                        self.pos,
                        1,
                        diagnostic_codes::DIGIT_EXPECTED,
                        diagnostic_messages::DIGIT_EXPECTED,
                    );
                }
            }
            _ => {
                self.scan_digits(|b| b.is_ascii_digit());
                if self.byte_at(self.pos) == Some(b'.') {
                    self.pos += 1;
                    self.scan_digits(|b| b.is_ascii_digit());
                }
                if matches!(self.byte_at(self.pos), Some(b'e') | Some(b'E')) {
                    self.pos += 1;
                    if matches!(self.byte_at(self.pos), Some(b'+') | Some(b'-')) {
                        self.pos += 1;
                    }
                    if self.scan_digits(|b| b.is_ascii_digit()) == 0 {
                        self.error(
                            self.pos,
                            1,
                            diagnostic_codes::DIGIT_EXPECTED,
                            diagnostic_messages::DIGIT_EXPECTED,
                        );
                    }
                }
            }
        }

        let kind = if self.byte_at(self.pos) == Some(b'n') {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        let text = self.text[start..self.pos].to_string();
        self.token_value = text;
        kind
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        loop {
            let Some(ch) = self.peek_char() else {
                self.error(
                    start,
                    self.pos - start,
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                );
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\n' || ch == '\r' {
                self.error(
                    start,
                    self.pos - start,
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                );
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape(&mut value);
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }

        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self, value: &mut String) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' if !matches!(self.peek_char(), Some('0'..='9')) => value.push('\0'),
            'x' => {
                if let Some(c) = self.scan_hex_escape(2) {
                    value.push(c);
                }
            }
            'u' => {
                if self.peek_char() == Some('{') {
                    self.pos += 1;
                    let digits_start = self.pos;
                    while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    let code = u32::from_str_radix(&self.text[digits_start..self.pos], 16).ok();
                    if self.peek_char() == Some('}') {
                        self.pos += 1;
                    }
                    if let Some(c) = code.and_then(char::from_u32) {
                        value.push(c);
                    }
                } else if let Some(c) = self.scan_hex_escape(4) {
                    value.push(c);
                }
            }
            // Line continuation
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
    }

    fn scan_hex_escape(&mut self, count: usize) -> Option<char> {
        let end = self.pos + count;
        let digits = self.text.get(self.pos..end)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        self.pos = end;
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    fn scan_punctuation(&mut self, ch: char) -> SyntaxKind {
        const PUNCTUATORS: &[(&str, SyntaxKind)] = &[
            (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
            ("===", SyntaxKind::EqualsEqualsEqualsToken),
            ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
            ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
            ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
            (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
            (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
            ("||=", SyntaxKind::BarBarEqualsToken),
            ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
            ("??=", SyntaxKind::QuestionQuestionEqualsToken),
            ("=>", SyntaxKind::EqualsGreaterThanToken),
            ("==", SyntaxKind::EqualsEqualsToken),
            ("!=", SyntaxKind::ExclamationEqualsToken),
            ("<=", SyntaxKind::LessThanEqualsToken),
            (">=", SyntaxKind::GreaterThanEqualsToken),
            ("**", SyntaxKind::AsteriskAsteriskToken),
            ("++", SyntaxKind::PlusPlusToken),
            ("--", SyntaxKind::MinusMinusToken),
            ("<<", SyntaxKind::LessThanLessThanToken),
            (">>", SyntaxKind::GreaterThanGreaterThanToken),
            ("&&", SyntaxKind::AmpersandAmpersandToken),
            ("||", SyntaxKind::BarBarToken),
            ("??", SyntaxKind::QuestionQuestionToken),
            ("+=", SyntaxKind::PlusEqualsToken),
            ("-=", SyntaxKind::MinusEqualsToken),
            ("*=", SyntaxKind::AsteriskEqualsToken),
            ("/=", SyntaxKind::SlashEqualsToken),
            ("%=", SyntaxKind::PercentEqualsToken),
            ("&=", SyntaxKind::AmpersandEqualsToken),
            ("|=", SyntaxKind::BarEqualsToken),
            ("^=", SyntaxKind::CaretEqualsToken),
        ];

        let rest = &self.text[self.pos..];

        // `?.` is optional chaining unless followed by a digit (`a?.5:b`)
        if rest.starts_with("?.") && !matches!(rest.as_bytes().get(2), Some(b'0'..=b'9')) {
            self.pos += 2;
            return SyntaxKind::QuestionDotToken;
        }

        for (text, kind) in PUNCTUATORS {
            if rest.starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }

        let kind = match ch {
            '{' => SyntaxKind::OpenBraceToken,
            '}' => SyntaxKind::CloseBraceToken,
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            ';' => SyntaxKind::SemicolonToken,
            ',' => SyntaxKind::CommaToken,
            '<' => SyntaxKind::LessThanToken,
            '>' => SyntaxKind::GreaterThanToken,
            '+' => SyntaxKind::PlusToken,
            '-' => SyntaxKind::MinusToken,
            '*' => SyntaxKind::AsteriskToken,
            '/' => SyntaxKind::SlashToken,
            '%' => SyntaxKind::PercentToken,
            '&' => SyntaxKind::AmpersandToken,
            '|' => SyntaxKind::BarToken,
            '^' => SyntaxKind::CaretToken,
            '!' => SyntaxKind::ExclamationToken,
            '~' => SyntaxKind::TildeToken,
            '?' => SyntaxKind::QuestionToken,
            ':' => SyntaxKind::ColonToken,
            '=' => SyntaxKind::EqualsToken,
            '`' => SyntaxKind::BacktickToken,
            '#' => SyntaxKind::HashToken,
            '@' => SyntaxKind::AtToken,
            _ => {
                self.error(
                    self.pos,
                    ch.len_utf8(),
                    diagnostic_codes::INVALID_CHARACTER,
                    diagnostic_messages::INVALID_CHARACTER,
                );
                self.pos += ch.len_utf8();
                return SyntaxKind::Unknown;
            }
        };
        self.pos += ch.len_utf8();
        kind
    }

    /// Re-scan a `/` or `/=` token as a regular expression literal.
    ///
    /// Called by the parser when a slash appears where an expression is
    /// expected.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(
            self.token,
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
        ) {
            return self.token;
        }

        self.pos = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(ch) = self.peek_char() else {
                self.error(
                    self.token_start,
                    self.pos - self.token_start,
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                );
                break;
            };
            if ch == '\n' || ch == '\r' {
                self.error(
                    self.token_start,
                    self.pos - self.token_start,
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                );
                break;
            }
            self.pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(next) = self.peek_char() {
                        self.pos += next.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    // Flags
                    while matches!(self.peek_char(), Some(c) if is_identifier_part(c)) {
                        self.pos += 1;
                    }
                    break;
                }
                _ => {}
            }
        }

        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

pub(crate) fn is_identifier_part(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<(SyntaxKind, String)> {
        let mut scanner = ScannerState::new(source.to_string());
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            out.push((kind, scanner.token_text().to_string()));
        }
        out
    }

    #[test]
    fn test_scan_marker_call() {
        let kinds: Vec<SyntaxKind> = tokens("idx(a, _ => _.b[0](...c))")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::OpenParenToken,
                SyntaxKind::Identifier,
                SyntaxKind::CommaToken,
                SyntaxKind::Identifier,
                SyntaxKind::EqualsGreaterThanToken,
                SyntaxKind::Identifier,
                SyntaxKind::DotToken,
                SyntaxKind::Identifier,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::NumericLiteral,
                SyntaxKind::CloseBracketToken,
                SyntaxKind::OpenParenToken,
                SyntaxKind::DotDotDotToken,
                SyntaxKind::Identifier,
                SyntaxKind::CloseParenToken,
                SyntaxKind::CloseParenToken,
            ]
        );
    }

    #[test]
    fn test_scan_longest_punctuator() {
        let kinds: Vec<SyntaxKind> = tokens("a !== b >>>= c ?? d ??= e")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(kinds[1], SyntaxKind::ExclamationEqualsEqualsToken);
        assert_eq!(
            kinds[3],
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
        );
        assert_eq!(kinds[5], SyntaxKind::QuestionQuestionToken);
        assert_eq!(kinds[7], SyntaxKind::QuestionQuestionEqualsToken);
    }

    #[test]
    fn test_scan_string_escapes() {
        let mut scanner = ScannerState::new(r#""a\n\x41B\u{43}" 'it\'s'"#.to_string());
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\nABC");
        assert_eq!(scanner.token_text(), r#""a\n\x41B\u{43}""#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "it's");
    }

    #[test]
    fn test_scan_numbers() {
        let toks = tokens("0 1.5 .25 1e10 0xFF 1_000 10n");
        let texts: Vec<&str> = toks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["0", "1.5", ".25", "1e10", "0xFF", "1_000", "10n"]);
        assert_eq!(toks[6].0, SyntaxKind::BigIntLiteral);
    }

    #[test]
    fn test_line_break_tracking_through_comments() {
        let mut scanner = ScannerState::new("a /* x\n */ b // c\n d".to_string());
        scanner.scan();
        assert!(!scanner.has_preceding_line_break());
        scanner.scan();
        assert!(scanner.has_preceding_line_break());
        assert_eq!(scanner.token_value(), "b");
        scanner.scan();
        assert!(scanner.has_preceding_line_break());
        assert_eq!(scanner.token_value(), "d");
    }

    #[test]
    fn test_unterminated_string_reports_diagnostic() {
        let mut scanner = ScannerState::new("'abc\nx".to_string());
        scanner.scan();
        assert_eq!(scanner.diagnostics().len(), 1);
        assert_eq!(
            scanner.diagnostics()[0].code,
            diagnostic_codes::UNTERMINATED_STRING_LITERAL
        );
    }

    #[test]
    fn test_save_and_restore_state() {
        let mut scanner = ScannerState::new("a b c".to_string());
        scanner.scan();
        let snapshot = scanner.save_state();
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.token_value(), "c");
        scanner.restore_state(snapshot);
        assert_eq!(scanner.token_value(), "a");
        scanner.scan();
        assert_eq!(scanner.token_value(), "b");
    }

    #[test]
    fn test_rescan_regex() {
        let mut scanner = ScannerState::new("/a[/]b/gi.test".to_string());
        assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
        assert_eq!(
            scanner.rescan_slash_token(),
            SyntaxKind::RegularExpressionLiteral
        );
        assert_eq!(scanner.token_text(), "/a[/]b/gi");
        assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    }

    #[test]
    fn test_optional_chain_token_vs_conditional_decimal() {
        let kinds: Vec<SyntaxKind> = tokens("a?.b").into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds[1], SyntaxKind::QuestionDotToken);
        let kinds: Vec<SyntaxKind> = tokens("a?.5:b").into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds[1], SyntaxKind::QuestionToken);
    }
}
