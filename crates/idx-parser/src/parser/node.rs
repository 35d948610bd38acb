//! Thin node headers and typed data pools.
//!
//! Every node is a 16-byte [`Node`] header. Kind-specific data lives in a
//! per-category pool on [`NodeArena`] and is reached through `data_index`.

use super::base::{NodeIndex, NodeList};
use serde::Serialize;

#[repr(C)]
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Node {
    /// Token kind or `syntax_kind_ext` node kind
    pub kind: u16,
    /// Packed `node_flags`
    pub flags: u16,
    /// Start position in source (byte offset)
    pub pos: u32,
    /// End position in source (byte offset)
    pub end: u32,
    /// Index into the kind-specific pool (`Node::NO_DATA` = none)
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index: Self::NO_DATA,
        }
    }

    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }
}

pub mod node_flags {
    pub const LET: u16 = 1 << 0;
    pub const CONST: u16 = 1 << 1;
}

// =============================================================================
// Typed Data Pools
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// Data for string, numeric, bigint and regular expression literals.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    /// Cooked value (string contents without quotes and escapes)
    pub text: String,
    /// Source text including quotes
    pub raw_text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16, // SyntaxKind
    pub right: NodeIndex,
}

/// Prefix/postfix operators, including `typeof`, `void` and `delete`.
#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprData {
    pub operator: u16, // SyntaxKind
    pub operand: NodeIndex,
}

/// Await, yield, spread element and spread assignment.
#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprDataEx {
    pub expression: NodeIndex,
    /// `yield*`
    pub asterisk_token: bool,
}

/// Data for call/new expressions
#[derive(Clone, Debug, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    /// `None` for `new X` without an argument list
    pub arguments: Option<NodeList>,
}

/// Data for property/element access
#[derive(Clone, Debug, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

/// Elements of array literals or members of object literals.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
    pub multi_line: bool,
}

/// `name: value`, or a shorthand `name` when `initializer` is NONE.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComputedPropertyData {
    pub expression: NodeIndex,
}

/// Data for function declarations/expressions/arrows
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub is_async: bool,
    pub asterisk_token: bool,
    pub name: NodeIndex,
    pub parameters: NodeList,
    /// A `BLOCK`, or an expression for concise arrows
    pub body: NodeIndex,
    pub equals_greater_than_token: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
    pub multi_line: bool,
}

/// `var`/`let`/`const` statement; the keyword is in `node_flags`.
#[derive(Clone, Debug, Serialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// Data for for/while/do loops
#[derive(Clone, Debug, Serialize)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

/// Return and throw statements.
#[derive(Clone, Debug, Serialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

/// `import x from "m"` (`import_clause` is the default binding) or `import "m"`.
#[derive(Clone, Debug, Serialize)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub statements: NodeList,
    pub end_of_file_token: NodeIndex,
    pub file_name: String,
    pub text: String,
}

/// Arena holding every node of one parsed file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,
    pub binary_exprs: Vec<BinaryExprData>,
    pub unary_exprs: Vec<UnaryExprData>,
    pub unary_exprs_ex: Vec<UnaryExprDataEx>,
    pub call_exprs: Vec<CallExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub conditional_exprs: Vec<ConditionalExprData>,
    pub parenthesized: Vec<ParenthesizedData>,
    pub literal_exprs: Vec<LiteralExprData>,
    pub property_assignments: Vec<PropertyAssignmentData>,
    pub computed_properties: Vec<ComputedPropertyData>,
    pub functions: Vec<FunctionData>,
    pub parameters: Vec<ParameterData>,
    pub blocks: Vec<BlockData>,
    pub variables: Vec<VariableData>,
    pub variable_declarations: Vec<VariableDeclarationData>,
    pub expr_statements: Vec<ExprStatementData>,
    pub if_statements: Vec<IfStatementData>,
    pub loops: Vec<LoopData>,
    pub return_data: Vec<ReturnData>,
    pub imports: Vec<ImportDeclData>,
    pub source_files: Vec<SourceFileData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_header_is_16_bytes() {
        assert_eq!(std::mem::size_of::<Node>(), 16);
    }

    #[test]
    fn test_node_without_data() {
        let node = Node::new(3, 0, 1);
        assert!(!node.has_data());
        assert!(Node::with_data(3, 0, 1, 0).has_data());
    }
}
