//! Node kinds for composite syntax.
//!
//! Token kinds from `idx_scanner::SyntaxKind` double as node kinds for leaf
//! nodes (identifiers, literals, `this`, `true`...). Composite node kinds are
//! numbered above `SyntaxKind::LAST_TOKEN`.

use idx_scanner::SyntaxKind;

const BASE: u16 = SyntaxKind::LAST_TOKEN + 1;

// Expressions
pub const PARENTHESIZED_EXPRESSION: u16 = BASE;
pub const CALL_EXPRESSION: u16 = BASE + 1;
pub const NEW_EXPRESSION: u16 = BASE + 2;
pub const PROPERTY_ACCESS_EXPRESSION: u16 = BASE + 3;
pub const ELEMENT_ACCESS_EXPRESSION: u16 = BASE + 4;
pub const BINARY_EXPRESSION: u16 = BASE + 5;
pub const PREFIX_UNARY_EXPRESSION: u16 = BASE + 6;
pub const POSTFIX_UNARY_EXPRESSION: u16 = BASE + 7;
pub const CONDITIONAL_EXPRESSION: u16 = BASE + 8;
pub const AWAIT_EXPRESSION: u16 = BASE + 9;
pub const YIELD_EXPRESSION: u16 = BASE + 10;
pub const SPREAD_ELEMENT: u16 = BASE + 11;
pub const OMITTED_EXPRESSION: u16 = BASE + 12;
pub const ARRAY_LITERAL_EXPRESSION: u16 = BASE + 13;
pub const OBJECT_LITERAL_EXPRESSION: u16 = BASE + 14;
pub const FUNCTION_EXPRESSION: u16 = BASE + 15;
pub const ARROW_FUNCTION: u16 = BASE + 16;

// Object literal members
pub const PROPERTY_ASSIGNMENT: u16 = BASE + 20;
pub const SHORTHAND_PROPERTY_ASSIGNMENT: u16 = BASE + 21;
pub const SPREAD_ASSIGNMENT: u16 = BASE + 22;
pub const COMPUTED_PROPERTY_NAME: u16 = BASE + 23;

// Declarations
pub const PARAMETER: u16 = BASE + 30;
pub const FUNCTION_DECLARATION: u16 = BASE + 31;
pub const VARIABLE_DECLARATION: u16 = BASE + 32;
pub const IMPORT_DECLARATION: u16 = BASE + 33;

// Statements
pub const BLOCK: u16 = BASE + 40;
pub const VARIABLE_STATEMENT: u16 = BASE + 41;
pub const EXPRESSION_STATEMENT: u16 = BASE + 42;
pub const IF_STATEMENT: u16 = BASE + 43;
pub const FOR_STATEMENT: u16 = BASE + 44;
pub const WHILE_STATEMENT: u16 = BASE + 45;
pub const DO_STATEMENT: u16 = BASE + 46;
pub const RETURN_STATEMENT: u16 = BASE + 47;
pub const THROW_STATEMENT: u16 = BASE + 48;
pub const BREAK_STATEMENT: u16 = BASE + 49;
pub const CONTINUE_STATEMENT: u16 = BASE + 50;
pub const EMPTY_STATEMENT: u16 = BASE + 51;

pub const SOURCE_FILE: u16 = BASE + 60;

pub fn is_function_like(kind: u16) -> bool {
    matches!(
        kind,
        FUNCTION_EXPRESSION | ARROW_FUNCTION | FUNCTION_DECLARATION
    )
}
