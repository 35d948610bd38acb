//! NodeArena creation methods (add_* methods).

use super::base::NodeIndex;
use super::node::*;

/// Generates an `add_*` method that pushes `data` into `$pool` and a header
/// pointing at it.
macro_rules! add_node_with_data {
    ($(#[$meta:meta])* $name:ident, $pool:ident, $data:ty) => {
        $(#[$meta])*
        pub fn $name(&mut self, kind: u16, pos: u32, end: u32, data: $data) -> NodeIndex {
            let data_index = self.$pool.len() as u32;
            self.$pool.push(data);
            self.push_node(Node::with_data(kind, pos, end, data_index))
        }
    };
}

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with pre-allocated capacity for the hottest pools.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(Self::MAX_NODE_PREALLOC);
        let mut arena = NodeArena::default();
        arena.nodes = Vec::with_capacity(safe_capacity);
        arena.identifiers = Vec::with_capacity(safe_capacity / 4);
        arena.literals = Vec::with_capacity(safe_capacity / 8);
        arena.call_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.access_exprs = Vec::with_capacity(safe_capacity / 8);
        arena.source_files = Vec::with_capacity(1);
        arena
    }

    #[inline]
    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Add a node without data (keywords used as expressions, `break`,
    /// empty statements, array holes, end-of-file).
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind, pos, end))
    }

    add_node_with_data!(add_identifier, identifiers, IdentifierData);
    add_node_with_data!(add_literal, literals, LiteralData);
    add_node_with_data!(add_binary_expr, binary_exprs, BinaryExprData);
    add_node_with_data!(
        /// Prefix and postfix unary expressions.
        add_unary_expr,
        unary_exprs,
        UnaryExprData
    );
    add_node_with_data!(
        /// Await, yield and spread nodes.
        add_unary_expr_ex,
        unary_exprs_ex,
        UnaryExprDataEx
    );
    add_node_with_data!(add_call_expr, call_exprs, CallExprData);
    add_node_with_data!(add_access_expr, access_exprs, AccessExprData);
    add_node_with_data!(add_conditional_expr, conditional_exprs, ConditionalExprData);
    add_node_with_data!(add_parenthesized, parenthesized, ParenthesizedData);
    add_node_with_data!(
        /// Array and object literals.
        add_literal_expr,
        literal_exprs,
        LiteralExprData
    );
    add_node_with_data!(
        add_property_assignment,
        property_assignments,
        PropertyAssignmentData
    );
    add_node_with_data!(
        add_computed_property,
        computed_properties,
        ComputedPropertyData
    );
    add_node_with_data!(add_function, functions, FunctionData);
    add_node_with_data!(add_parameter, parameters, ParameterData);
    add_node_with_data!(add_block, blocks, BlockData);
    add_node_with_data!(add_variable, variables, VariableData);
    add_node_with_data!(
        add_variable_declaration,
        variable_declarations,
        VariableDeclarationData
    );
    add_node_with_data!(add_expr_statement, expr_statements, ExprStatementData);
    add_node_with_data!(add_if_statement, if_statements, IfStatementData);
    add_node_with_data!(add_loop, loops, LoopData);
    add_node_with_data!(
        /// Return and throw statements.
        add_return,
        return_data,
        ReturnData
    );
    add_node_with_data!(add_import_decl, imports, ImportDeclData);
    add_node_with_data!(add_source_file, source_files, SourceFileData);

    /// Set packed flags on an existing node.
    pub fn set_flags(&mut self, index: NodeIndex, flags: u16) {
        if let Some(node) = self.get_mut(index) {
            node.flags = flags;
        }
    }
}
