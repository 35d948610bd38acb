//! Lowered IR (Intermediate Representation) for transforms
//!
//! The pipeline lowers the parser's arena AST into this owned tree once, then
//! every pass rewrites it in place. The printer walks the final tree and
//! emits JavaScript text.
//!
//! Passes never depend on source positions except through [`IRNode::CallExpr`]
//! spans, which diagnostics use to point at the offending call.

use idx_common::Span;

/// Intermediate Representation node for transformed JavaScript
#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Numeric literal, kept as written: `42`, `0xff`, `1e3`
    NumericLiteral(String),

    /// BigInt literal, kept as written: `10n`
    BigIntLiteral(String),

    /// String literal. `raw` holds the source text (with quotes) when the
    /// literal came from the input; synthesized strings print from `value`.
    StringLiteral { value: String, raw: Option<String> },

    /// Regular expression literal, kept as written: `/a+/g`
    RegExpLiteral(String),

    BooleanLiteral(bool),

    NullLiteral,

    /// `void 0`
    Undefined,

    // =========================================================================
    // Identifiers
    // =========================================================================
    Identifier(String),

    This,

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Binary expression, including assignments and the comma operator
    BinaryExpr {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Prefix unary expression: `!x`, `-x`, `++x`, `typeof x`
    PrefixUnaryExpr { operator: String, operand: Box<Self> },

    /// Postfix unary expression: `x++`, `x--`
    PostfixUnaryExpr { operand: Box<Self>, operator: String },

    /// Call expression: `callee(args)`. `span` is the source range of the
    /// whole call, or `Span::DUMMY` for synthesized calls.
    CallExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
        span: Span,
    },

    /// New expression: `new Callee(args)`, or `new Callee` when
    /// `explicit_arguments` is false
    NewExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
        explicit_arguments: bool,
    },

    /// Property access: `object.property`
    PropertyAccess { object: Box<Self>, property: String },

    /// Element access: `object[index]`
    ElementAccess { object: Box<Self>, index: Box<Self> },

    /// Conditional expression: `cond ? then : else`
    ConditionalExpr {
        condition: Box<Self>,
        when_true: Box<Self>,
        when_false: Box<Self>,
    },

    /// Parenthesized expression written in the source: `(expr)`
    Parenthesized(Box<Self>),

    /// Array literal: `[a, , ...b]`
    ArrayLiteral(Vec<Self>),

    /// Hole in an array literal
    Elision,

    /// Spread element: `...expr`
    SpreadElement(Box<Self>),

    /// Object literal: `{ key: value, ... }`
    ObjectLiteral {
        properties: Vec<IRProperty>,
        multi_line: bool,
    },

    /// Function expression: `function name(params) { body }`
    FunctionExpr {
        name: Option<String>,
        parameters: Vec<IRParam>,
        body: Vec<Self>,
        is_async: bool,
        is_generator: bool,
    },

    /// Arrow function: `(params) => body`
    ArrowFunction {
        parameters: Vec<IRParam>,
        body: IRArrowBody,
        is_async: bool,
    },

    /// `await expr`
    Await(Box<Self>),

    /// `yield expr` or `yield* expr`
    Yield {
        expression: Option<Box<Self>>,
        delegate: bool,
    },

    // =========================================================================
    // Statements
    // =========================================================================
    /// Single declarator inside a [`IRNode::VariableStatement`]: `x = value`
    VarDecl {
        name: String,
        initializer: Option<Box<Self>>,
    },

    /// `var a = 1, b;` (also used for `for` initializers)
    VariableStatement {
        kind: VarKind,
        declarations: Vec<Self>,
    },

    /// Expression statement: `expr;`
    ExpressionStatement(Box<Self>),

    /// Return statement: `return expr;`
    ReturnStatement(Option<Box<Self>>),

    /// Throw statement: `throw expr;`
    ThrowStatement(Box<Self>),

    /// If statement: `if (cond) then else otherwise`
    IfStatement {
        condition: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
    },

    /// Block statement: `{ statements }`
    Block(Vec<Self>),

    /// Empty statement: `;`
    EmptyStatement,

    /// For statement: `for (init; cond; incr) body`
    ForStatement {
        initializer: Option<Box<Self>>,
        condition: Option<Box<Self>>,
        incrementor: Option<Box<Self>>,
        body: Box<Self>,
    },

    /// While statement: `while (cond) body`
    WhileStatement { condition: Box<Self>, body: Box<Self> },

    /// Do-while statement: `do body while (cond);`
    DoWhileStatement { body: Box<Self>, condition: Box<Self> },

    BreakStatement,

    ContinueStatement,

    // =========================================================================
    // Declarations
    // =========================================================================
    /// Function declaration: `function name(params) { body }`
    FunctionDecl {
        name: String,
        parameters: Vec<IRParam>,
        body: Vec<Self>,
        is_async: bool,
        is_generator: bool,
    },

    /// `import name from "module";` or `import "module";`
    ImportDecl {
        default_binding: Option<String>,
        module: Box<Self>,
    },

    // =========================================================================
    // Special
    // =========================================================================
    /// Raw JavaScript text (helper preludes)
    Raw(String),
}

/// Keyword of a variable statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

/// Body of an arrow function
#[derive(Debug, Clone, PartialEq)]
pub enum IRArrowBody {
    /// Concise body: `x => expr`
    Expression(Box<IRNode>),
    /// Block body: `x => { statements }`
    Block(Vec<IRNode>),
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct IRParam {
    pub name: String,
    pub rest: bool,
    pub default_value: Option<Box<IRNode>>,
}

impl IRParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: false,
            default_value: None,
        }
    }

    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest: true,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default: IRNode) -> Self {
        self.default_value = Some(Box::new(default));
        self
    }
}

/// Member of an object literal
#[derive(Debug, Clone, PartialEq)]
pub enum IRProperty {
    /// `key: value`
    Init { key: IRPropertyKey, value: IRNode },
    /// `name`
    Shorthand(String),
    /// `...expr`
    Spread(IRNode),
}

/// Object property key
#[derive(Debug, Clone, PartialEq)]
pub enum IRPropertyKey {
    /// Identifier or keyword: `foo`
    Identifier(String),
    /// String or numeric literal key, kept as written: `"a-b"`, `1`
    Literal(String),
    /// Computed key: `[expr]`
    Computed(Box<IRNode>),
}

/// A lowered source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IRProgram {
    pub file_name: String,
    pub statements: Vec<IRNode>,
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl IRNode {
    /// Create an identifier node
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create a synthesized string literal
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral {
            value: s.into(),
            raw: None,
        }
    }

    /// Create a numeric literal
    pub fn number(n: impl Into<String>) -> Self {
        Self::NumericLiteral(n.into())
    }

    /// Create a synthesized call expression
    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::CallExpr {
            callee: Box::new(callee),
            arguments: args,
            span: Span::DUMMY,
        }
    }

    /// Create a property access
    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    /// Create an element access
    pub fn elem(object: Self, index: Self) -> Self {
        Self::ElementAccess {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    /// Create a binary expression
    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::BinaryExpr {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    /// Create an assignment expression
    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    /// Create a conditional expression
    pub fn conditional(condition: Self, when_true: Self, when_false: Self) -> Self {
        Self::ConditionalExpr {
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
    }

    /// `var a, b;` with uninitialized declarators
    pub fn var_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::VariableStatement {
            kind: VarKind::Var,
            declarations: names
                .into_iter()
                .map(|name| Self::VarDecl {
                    name: name.into(),
                    initializer: None,
                })
                .collect(),
        }
    }

    /// Create a return statement
    pub fn ret(expr: Option<Self>) -> Self {
        Self::ReturnStatement(expr.map(Box::new))
    }

    /// Create an expression statement
    pub fn expr_stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    /// Whether this statement is a directive such as `'use strict';`
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            IRNode::ExpressionStatement(expr)
                if matches!(expr.as_ref(), IRNode::StringLiteral { raw: Some(_), .. })
        )
    }

    /// Whether this node is a function boundary (its body is its own var scope)
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            IRNode::FunctionExpr { .. } | IRNode::FunctionDecl { .. } | IRNode::ArrowFunction { .. }
        )
    }

    /// Visit every direct child node mutably, in source order.
    pub fn for_each_child_mut(&mut self, f: &mut impl FnMut(&mut IRNode)) {
        match self {
            IRNode::NumericLiteral(_)
            | IRNode::BigIntLiteral(_)
            | IRNode::StringLiteral { .. }
            | IRNode::RegExpLiteral(_)
            | IRNode::BooleanLiteral(_)
            | IRNode::NullLiteral
            | IRNode::Undefined
            | IRNode::Identifier(_)
            | IRNode::This
            | IRNode::Elision
            | IRNode::EmptyStatement
            | IRNode::BreakStatement
            | IRNode::ContinueStatement
            | IRNode::Raw(_) => {}
            IRNode::BinaryExpr { left, right, .. } => {
                f(left);
                f(right);
            }
            IRNode::PrefixUnaryExpr { operand, .. } | IRNode::PostfixUnaryExpr { operand, .. } => {
                f(operand)
            }
            IRNode::CallExpr {
                callee, arguments, ..
            }
            | IRNode::NewExpr {
                callee, arguments, ..
            } => {
                f(callee);
                arguments.iter_mut().for_each(f);
            }
            IRNode::PropertyAccess { object, .. } => f(object),
            IRNode::ElementAccess { object, index } => {
                f(object);
                f(index);
            }
            IRNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                f(condition);
                f(when_true);
                f(when_false);
            }
            IRNode::Parenthesized(inner)
            | IRNode::SpreadElement(inner)
            | IRNode::Await(inner)
            | IRNode::ExpressionStatement(inner)
            | IRNode::ThrowStatement(inner) => f(inner),
            IRNode::ArrayLiteral(elements) | IRNode::Block(elements) => {
                elements.iter_mut().for_each(f)
            }
            IRNode::ObjectLiteral { properties, .. } => {
                for property in properties {
                    match property {
                        IRProperty::Init { key, value } => {
                            if let IRPropertyKey::Computed(expr) = key {
                                f(expr);
                            }
                            f(value);
                        }
                        IRProperty::Shorthand(_) => {}
                        IRProperty::Spread(expr) => f(expr),
                    }
                }
            }
            IRNode::FunctionExpr {
                parameters, body, ..
            }
            | IRNode::FunctionDecl {
                parameters, body, ..
            } => {
                for_each_param_default_mut(parameters, f);
                body.iter_mut().for_each(f);
            }
            IRNode::ArrowFunction {
                parameters, body, ..
            } => {
                for_each_param_default_mut(parameters, f);
                match body {
                    IRArrowBody::Expression(expr) => f(expr),
                    IRArrowBody::Block(statements) => statements.iter_mut().for_each(f),
                }
            }
            IRNode::Yield { expression, .. } | IRNode::ReturnStatement(expression) => {
                if let Some(expr) = expression {
                    f(expr);
                }
            }
            IRNode::VarDecl { initializer, .. } => {
                if let Some(init) = initializer {
                    f(init);
                }
            }
            IRNode::VariableStatement { declarations, .. } => declarations.iter_mut().for_each(f),
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                f(condition);
                f(then_branch);
                if let Some(other) = else_branch {
                    f(other);
                }
            }
            IRNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                for part in [initializer, condition, incrementor].into_iter().flatten() {
                    f(part);
                }
                f(body);
            }
            IRNode::WhileStatement { condition, body } => {
                f(condition);
                f(body);
            }
            IRNode::DoWhileStatement { body, condition } => {
                f(body);
                f(condition);
            }
            IRNode::ImportDecl { module, .. } => f(module),
        }
    }

    /// Visit every direct child node, in source order.
    pub fn for_each_child(&self, f: &mut impl FnMut(&IRNode)) {
        match self {
            IRNode::NumericLiteral(_)
            | IRNode::BigIntLiteral(_)
            | IRNode::StringLiteral { .. }
            | IRNode::RegExpLiteral(_)
            | IRNode::BooleanLiteral(_)
            | IRNode::NullLiteral
            | IRNode::Undefined
            | IRNode::Identifier(_)
            | IRNode::This
            | IRNode::Elision
            | IRNode::EmptyStatement
            | IRNode::BreakStatement
            | IRNode::ContinueStatement
            | IRNode::Raw(_) => {}
            IRNode::BinaryExpr { left, right, .. } => {
                f(left);
                f(right);
            }
            IRNode::PrefixUnaryExpr { operand, .. } | IRNode::PostfixUnaryExpr { operand, .. } => {
                f(operand)
            }
            IRNode::CallExpr {
                callee, arguments, ..
            }
            | IRNode::NewExpr {
                callee, arguments, ..
            } => {
                f(callee);
                arguments.iter().for_each(f);
            }
            IRNode::PropertyAccess { object, .. } => f(object),
            IRNode::ElementAccess { object, index } => {
                f(object);
                f(index);
            }
            IRNode::ConditionalExpr {
                condition,
                when_true,
                when_false,
            } => {
                f(condition);
                f(when_true);
                f(when_false);
            }
            IRNode::Parenthesized(inner)
            | IRNode::SpreadElement(inner)
            | IRNode::Await(inner)
            | IRNode::ExpressionStatement(inner)
            | IRNode::ThrowStatement(inner) => f(inner),
            IRNode::ArrayLiteral(elements) | IRNode::Block(elements) => elements.iter().for_each(f),
            IRNode::ObjectLiteral { properties, .. } => {
                for property in properties {
                    match property {
                        IRProperty::Init { key, value } => {
                            if let IRPropertyKey::Computed(expr) = key {
                                f(expr);
                            }
                            f(value);
                        }
                        IRProperty::Shorthand(_) => {}
                        IRProperty::Spread(expr) => f(expr),
                    }
                }
            }
            IRNode::FunctionExpr {
                parameters, body, ..
            }
            | IRNode::FunctionDecl {
                parameters, body, ..
            } => {
                for param in parameters.iter() {
                    if let Some(default) = &param.default_value {
                        f(default);
                    }
                }
                body.iter().for_each(f);
            }
            IRNode::ArrowFunction {
                parameters, body, ..
            } => {
                for param in parameters.iter() {
                    if let Some(default) = &param.default_value {
                        f(default);
                    }
                }
                match body {
                    IRArrowBody::Expression(expr) => f(expr),
                    IRArrowBody::Block(statements) => statements.iter().for_each(f),
                }
            }
            IRNode::Yield { expression, .. } | IRNode::ReturnStatement(expression) => {
                if let Some(expr) = expression {
                    f(expr);
                }
            }
            IRNode::VarDecl { initializer, .. } => {
                if let Some(init) = initializer {
                    f(init);
                }
            }
            IRNode::VariableStatement { declarations, .. } => declarations.iter().for_each(f),
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                f(condition);
                f(then_branch);
                if let Some(other) = else_branch {
                    f(other);
                }
            }
            IRNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                for part in [initializer, condition, incrementor].into_iter().flatten() {
                    f(part);
                }
                f(body);
            }
            IRNode::WhileStatement { condition, body } => {
                f(condition);
                f(body);
            }
            IRNode::DoWhileStatement { body, condition } => {
                f(body);
                f(condition);
            }
            IRNode::ImportDecl { module, .. } => f(module),
        }
    }

    /// Whether any identifier reference in this subtree (including nested
    /// functions and shorthand properties) satisfies `predicate`.
    pub fn any_identifier(&self, predicate: &impl Fn(&str) -> bool) -> bool {
        match self {
            IRNode::Identifier(name) => return predicate(name),
            IRNode::ObjectLiteral { properties, .. }
                if properties
                    .iter()
                    .any(|p| matches!(p, IRProperty::Shorthand(name) if predicate(name))) =>
            {
                return true;
            }
            _ => {}
        }
        let mut found = false;
        self.for_each_child(&mut |child| {
            if !found && child.any_identifier(predicate) {
                found = true;
            }
        });
        found
    }
}

fn for_each_param_default_mut(parameters: &mut [IRParam], f: &mut impl FnMut(&mut IRNode)) {
    for param in parameters {
        if let Some(default) = param.default_value.as_mut() {
            f(default);
        }
    }
}
