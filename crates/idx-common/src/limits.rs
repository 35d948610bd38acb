//! Centralized limits shared by the parser and the transforms.

/// Maximum nesting depth for expression parsing.
///
/// Deeply nested parentheses or chained unary operators add several parser
/// frames per level; past this depth the parser reports an error instead of
/// overflowing the stack.
pub const MAX_PARSER_DEPTH: u32 = 256;
