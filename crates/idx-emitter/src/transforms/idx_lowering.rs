//! Marker lowering pass
//!
//! Rewrites every call of the marker identifier into a guarded chain (see
//! [`crate::transforms::idx_chain`]) and hoists the temporaries it needs as
//! `var` declarations at the top of the nearest enclosing function body, or of
//! the program.
//!
//! ```javascript
//! const f = (p) => idx(p, _ => _.a.b);
//! ```
//! Becomes:
//! ```javascript
//! const f = (p) => {
//!     var _a, _b;
//!     return (_a = p) != null ? (_b = _a.a) != null ? _b.b : _b : _a;
//! };
//! ```
//!
//! Markers in parameter initializers belong to the scope around the function.
//! The first invalid marker call aborts the pass for the whole file.

use crate::transform_context::TransformContext;
use crate::transforms::Transform;
use crate::transforms::idx_chain::{IdxError, MarkerChain};
use crate::transforms::ir::{IRArrowBody, IRNode, IRParam, IRProgram};
use crate::transforms::temps::TempScope;
use rustc_hash::FxHashSet;

pub struct IdxLowering {
    marker: String,
}

impl IdxLowering {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Transform for IdxLowering {
    fn name(&self) -> &'static str {
        "idx"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(marker = %self.marker))]
    fn run(&mut self, program: &mut IRProgram, ctx: &mut TransformContext) {
        let result = {
            let mut visitor = MarkerVisitor {
                marker: &self.marker,
                reserved: ctx.reserved_names(),
                rewritten: 0,
            };
            visitor.visit_program(program).map(|()| visitor.rewritten)
        };

        match result {
            Ok(rewritten) => tracing::debug!(rewritten, "marker calls lowered"),
            Err(err) => {
                tracing::debug!(code = err.code(), "marker call rejected");
                let diagnostic = err.to_diagnostic(ctx.file_name());
                ctx.report(diagnostic);
            }
        }
    }
}

struct MarkerVisitor<'a> {
    marker: &'a str,
    reserved: &'a FxHashSet<String>,
    rewritten: usize,
}

impl<'a> MarkerVisitor<'a> {
    fn visit_program(&mut self, program: &mut IRProgram) -> Result<(), IdxError> {
        let mut scope = TempScope::new(self.reserved);
        self.visit_statements(&mut program.statements, &mut scope)?;
        hoist_temporaries(&mut program.statements, scope.into_declared());
        Ok(())
    }

    fn visit_statements(
        &mut self,
        statements: &mut [IRNode],
        scope: &mut TempScope<'a>,
    ) -> Result<(), IdxError> {
        statements
            .iter_mut()
            .try_for_each(|stmt| self.visit(stmt, scope))
    }

    /// Pre-order: a marker call is rewritten before its replacement (which
    /// still holds the base and link arguments) is visited.
    fn visit(&mut self, node: &mut IRNode, scope: &mut TempScope<'a>) -> Result<(), IdxError> {
        while self.is_marker_call(node) {
            self.rewrite_marker_call(node, scope)?;
        }

        match node {
            IRNode::FunctionExpr {
                parameters, body, ..
            }
            | IRNode::FunctionDecl {
                parameters, body, ..
            } => {
                self.visit_parameter_defaults(parameters, scope)?;
                let mut inner = TempScope::new(self.reserved);
                self.visit_statements(body, &mut inner)?;
                hoist_temporaries(body, inner.into_declared());
                Ok(())
            }
            IRNode::ArrowFunction {
                parameters, body, ..
            } => {
                self.visit_parameter_defaults(parameters, scope)?;
                let mut inner = TempScope::new(self.reserved);
                match body {
                    IRArrowBody::Block(statements) => {
                        self.visit_statements(statements, &mut inner)?;
                        hoist_temporaries(statements, inner.into_declared());
                    }
                    IRArrowBody::Expression(expr) => {
                        self.visit(expr, &mut inner)?;
                        if !inner.is_empty() {
                            let expr = std::mem::replace(expr.as_mut(), IRNode::Undefined);
                            let mut statements = vec![IRNode::ret(Some(expr))];
                            hoist_temporaries(&mut statements, inner.into_declared());
                            *body = IRArrowBody::Block(statements);
                        }
                    }
                }
                Ok(())
            }
            _ => {
                let mut result = Ok(());
                node.for_each_child_mut(&mut |child| {
                    if result.is_ok() {
                        result = self.visit(child, scope);
                    }
                });
                result
            }
        }
    }

    fn visit_parameter_defaults(
        &mut self,
        parameters: &mut [IRParam],
        scope: &mut TempScope<'a>,
    ) -> Result<(), IdxError> {
        parameters
            .iter_mut()
            .filter_map(|param| param.default_value.as_deref_mut())
            .try_for_each(|default| self.visit(default, scope))
    }

    fn is_marker_call(&self, node: &IRNode) -> bool {
        matches!(
            node,
            IRNode::CallExpr { callee, .. }
                if matches!(callee.as_ref(), IRNode::Identifier(name) if name == self.marker)
        )
    }

    fn rewrite_marker_call(
        &mut self,
        node: &mut IRNode,
        scope: &mut TempScope<'a>,
    ) -> Result<(), IdxError> {
        let IRNode::CallExpr {
            arguments, span, ..
        } = node
        else {
            return Ok(());
        };
        let arguments = std::mem::take(arguments);
        let chain = MarkerChain::from_call(self.marker, arguments, *span)?;
        tracing::trace!(
            start = span.start,
            links = chain.links.len(),
            "rewriting marker call"
        );
        *node = chain.compile(scope);
        self.rewritten += 1;
        Ok(())
    }
}

/// Insert `var a, b;` before the first statement, after any directive prologue.
fn hoist_temporaries(statements: &mut Vec<IRNode>, names: Vec<String>) {
    if names.is_empty() {
        return;
    }
    let prologue_len = statements.iter().take_while(|stmt| stmt.is_directive()).count();
    statements.insert(prologue_len, IRNode::var_names(names));
}

#[cfg(test)]
#[path = "../../tests/idx_lowering.rs"]
mod tests;
