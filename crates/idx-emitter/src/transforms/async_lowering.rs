//! Async Function Lowering
//!
//! Rewrites async functions onto generators driven by the `__awaiter` helper.
//!
//! # Transform Patterns
//!
//! ## Async function
//! ```javascript
//! async function foo(a) {
//!     await bar(a);
//! }
//! ```
//! Becomes:
//! ```javascript
//! function foo(a) {
//!     return __awaiter(this, void 0, void 0, function* () {
//!         yield bar(a);
//!     });
//! }
//! ```
//!
//! ## Async arrow function
//! ```javascript
//! var foo = async (a) => await a;
//! ```
//! Becomes:
//! ```javascript
//! var foo = (a) => __awaiter(this, void 0, void 0, function* () {
//!     return yield a;
//! });
//! ```
//!
//! Parameters stay on the outer function. A body that reads `arguments`
//! forwards them as the second `__awaiter` argument. Async generators are left
//! as they are.

use crate::transform_context::TransformContext;
use crate::transforms::Transform;
use crate::transforms::ir::{IRArrowBody, IRNode, IRProgram, IRProperty};

#[derive(Debug, Default)]
pub struct AsyncLowering {
    lowered: usize,
}

impl AsyncLowering {
    pub fn new() -> Self {
        Self::default()
    }

    fn lower(&mut self, node: &mut IRNode) {
        node.for_each_child_mut(&mut |child| self.lower(child));

        match node {
            IRNode::FunctionDecl {
                body,
                is_async,
                is_generator: false,
                ..
            }
            | IRNode::FunctionExpr {
                body,
                is_async,
                is_generator: false,
                ..
            } if *is_async => {
                let statements = std::mem::take(body);
                *body = vec![IRNode::ret(Some(awaiter_call(statements)))];
                *is_async = false;
                self.lowered += 1;
            }
            IRNode::ArrowFunction { body, is_async, .. } if *is_async => {
                let statements = match std::mem::replace(body, IRArrowBody::Block(Vec::new())) {
                    IRArrowBody::Expression(expr) => vec![IRNode::ret(Some(*expr))],
                    IRArrowBody::Block(statements) => statements,
                };
                *body = IRArrowBody::Expression(Box::new(awaiter_call(statements)));
                *is_async = false;
                self.lowered += 1;
            }
            _ => {}
        }
    }
}

impl Transform for AsyncLowering {
    fn name(&self) -> &'static str {
        "async"
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn run(&mut self, program: &mut IRProgram, ctx: &mut TransformContext) {
        for stmt in &mut program.statements {
            self.lower(stmt);
        }
        if self.lowered > 0 {
            ctx.helpers_mut().awaiter = true;
        }
        tracing::debug!(lowered = self.lowered, "async functions lowered");
    }
}

/// `__awaiter(this, <arguments | void 0>, void 0, function* () { body })`
fn awaiter_call(mut statements: Vec<IRNode>) -> IRNode {
    statements.iter_mut().for_each(await_to_yield);
    let forwards_arguments = statements.iter().any(references_arguments);

    let generator = IRNode::FunctionExpr {
        name: None,
        parameters: Vec::new(),
        body: statements,
        is_async: false,
        is_generator: true,
    };
    let arguments = if forwards_arguments {
        IRNode::id("arguments")
    } else {
        IRNode::Undefined
    };
    IRNode::call(
        IRNode::id("__awaiter"),
        vec![IRNode::This, arguments, IRNode::Undefined, generator],
    )
}

/// Whether `node` is the body produced for an already lowered async arrow.
pub(crate) fn is_awaiter_call(node: &IRNode) -> bool {
    match node {
        IRNode::CallExpr {
            callee, arguments, ..
        } => {
            matches!(callee.as_ref(), IRNode::Identifier(name) if name == "__awaiter")
                && matches!(
                    arguments.as_slice(),
                    [_, _, _, IRNode::FunctionExpr {
                        is_generator: true,
                        ..
                    }]
                )
        }
        _ => false,
    }
}

/// Replace `await e` with `yield e`, stopping at nested functions.
fn await_to_yield(node: &mut IRNode) {
    if node.is_function_like() {
        return;
    }
    if let IRNode::Await(operand) = node {
        let operand = std::mem::replace(operand.as_mut(), IRNode::Undefined);
        *node = IRNode::Yield {
            expression: Some(Box::new(operand)),
            delegate: false,
        };
    }
    node.for_each_child_mut(&mut await_to_yield);
}

/// Whether `arguments` is read in this function's own scope. Arrows share
/// their enclosing `arguments`, other functions do not.
fn references_arguments(node: &IRNode) -> bool {
    match node {
        IRNode::Identifier(name) => name == "arguments",
        IRNode::FunctionExpr { .. } | IRNode::FunctionDecl { .. } => false,
        IRNode::ObjectLiteral { properties, .. }
            if properties
                .iter()
                .any(|p| matches!(p, IRProperty::Shorthand(name) if name == "arguments")) =>
        {
            true
        }
        _ => {
            let mut found = false;
            node.for_each_child(&mut |child| {
                found = found || references_arguments(child);
            });
            found
        }
    }
}

#[cfg(test)]
#[path = "../../tests/async_lowering.rs"]
mod tests;
