//! NodeArena access methods.
//!
//! Each `get_*` accessor checks the node kind before indexing its pool, so
//! asking for the wrong data yields `None` rather than unrelated data.

use super::base::NodeIndex;
use super::node::*;
use super::syntax_kind_ext::*;
use idx_scanner::SyntaxKind;
use rustc_hash::FxHashSet;

macro_rules! get_pool_data {
    ($(#[$meta:meta])* $name:ident, $pool:ident, $data:ty, $($kind:expr),+) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&self, node: &Node) -> Option<&$data> {
            if node.has_data() && ($(node.kind == $kind)||+) {
                self.$pool.get(node.data_index as usize)
            } else {
                None
            }
        }
    };
}

impl NodeArena {
    /// Get a thin node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    get_pool_data!(
        get_identifier,
        identifiers,
        IdentifierData,
        SyntaxKind::Identifier as u16
    );
    get_pool_data!(
        get_literal,
        literals,
        LiteralData,
        SyntaxKind::StringLiteral as u16,
        SyntaxKind::NumericLiteral as u16,
        SyntaxKind::BigIntLiteral as u16,
        SyntaxKind::RegularExpressionLiteral as u16
    );
    get_pool_data!(
        get_binary_expr,
        binary_exprs,
        BinaryExprData,
        BINARY_EXPRESSION
    );
    get_pool_data!(
        get_unary_expr,
        unary_exprs,
        UnaryExprData,
        PREFIX_UNARY_EXPRESSION,
        POSTFIX_UNARY_EXPRESSION
    );
    get_pool_data!(
        get_unary_expr_ex,
        unary_exprs_ex,
        UnaryExprDataEx,
        AWAIT_EXPRESSION,
        YIELD_EXPRESSION,
        SPREAD_ELEMENT,
        SPREAD_ASSIGNMENT
    );
    get_pool_data!(
        /// Call and `new` expressions.
        get_call_expr,
        call_exprs,
        CallExprData,
        CALL_EXPRESSION,
        NEW_EXPRESSION
    );
    get_pool_data!(
        /// Property access (`a.b`) or element access (`a[b]`).
        get_access_expr,
        access_exprs,
        AccessExprData,
        PROPERTY_ACCESS_EXPRESSION,
        ELEMENT_ACCESS_EXPRESSION
    );
    get_pool_data!(
        get_conditional_expr,
        conditional_exprs,
        ConditionalExprData,
        CONDITIONAL_EXPRESSION
    );
    get_pool_data!(
        get_parenthesized,
        parenthesized,
        ParenthesizedData,
        PARENTHESIZED_EXPRESSION
    );
    get_pool_data!(
        get_literal_expr,
        literal_exprs,
        LiteralExprData,
        ARRAY_LITERAL_EXPRESSION,
        OBJECT_LITERAL_EXPRESSION
    );
    get_pool_data!(
        get_property_assignment,
        property_assignments,
        PropertyAssignmentData,
        PROPERTY_ASSIGNMENT,
        SHORTHAND_PROPERTY_ASSIGNMENT
    );
    get_pool_data!(
        get_computed_property,
        computed_properties,
        ComputedPropertyData,
        COMPUTED_PROPERTY_NAME
    );
    get_pool_data!(
        get_function,
        functions,
        FunctionData,
        FUNCTION_DECLARATION,
        FUNCTION_EXPRESSION,
        ARROW_FUNCTION
    );
    get_pool_data!(get_parameter, parameters, ParameterData, PARAMETER);
    get_pool_data!(get_block, blocks, BlockData, BLOCK);
    get_pool_data!(get_variable, variables, VariableData, VARIABLE_STATEMENT);
    get_pool_data!(
        get_variable_declaration,
        variable_declarations,
        VariableDeclarationData,
        VARIABLE_DECLARATION
    );
    get_pool_data!(
        get_expr_statement,
        expr_statements,
        ExprStatementData,
        EXPRESSION_STATEMENT
    );
    get_pool_data!(get_if_statement, if_statements, IfStatementData, IF_STATEMENT);
    get_pool_data!(
        get_loop,
        loops,
        LoopData,
        FOR_STATEMENT,
        WHILE_STATEMENT,
        DO_STATEMENT
    );
    get_pool_data!(
        get_return_statement,
        return_data,
        ReturnData,
        RETURN_STATEMENT,
        THROW_STATEMENT
    );
    get_pool_data!(get_import_decl, imports, ImportDeclData, IMPORT_DECLARATION);
    get_pool_data!(get_source_file, source_files, SourceFileData, SOURCE_FILE);

    pub fn get_source_file_at(&self, index: NodeIndex) -> Option<&SourceFileData> {
        self.get(index).and_then(|node| self.get_source_file(node))
    }

    /// Text of an identifier node, or `None` for any other node.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.get(index)
            .and_then(|node| self.get_identifier(node))
            .map(|data| data.escaped_text.as_str())
    }

    /// Every identifier name that occurs anywhere in the file, including
    /// property names.
    pub fn collect_identifier_names(&self) -> FxHashSet<String> {
        self.identifiers
            .iter()
            .map(|data| data.escaped_text.clone())
            .collect()
    }
}
