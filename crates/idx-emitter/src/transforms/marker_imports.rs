//! Marker import stripping
//!
//! Once every marker call has been rewritten, the runtime binding of the
//! marker is dead. This pass removes it from the top level of the program:
//!
//! ```javascript
//! import idx from 'idx';
//! const idx = require('idx');
//! ```
//!
//! Only a binding whose local name is the marker and whose module is the
//! marker module is removed, and only while nothing else in the file still
//! reads the marker.

use crate::transform_context::TransformContext;
use crate::transforms::Transform;
use crate::transforms::ir::{IRNode, IRProgram};

pub struct MarkerImportStripping {
    marker: String,
    module: String,
}

impl MarkerImportStripping {
    pub fn new(marker: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            module: module.into(),
        }
    }

    fn is_marker_module(&self, node: &IRNode) -> bool {
        matches!(node, IRNode::StringLiteral { value, .. } if *value == self.module)
    }

    fn is_marker_import(&self, stmt: &IRNode) -> bool {
        matches!(
            stmt,
            IRNode::ImportDecl { default_binding: Some(name), module }
                if *name == self.marker && self.is_marker_module(module)
        )
    }

    /// `<marker> = require("<module>")`
    fn is_marker_require(&self, declarator: &IRNode) -> bool {
        let IRNode::VarDecl {
            name,
            initializer: Some(init),
        } = declarator
        else {
            return false;
        };
        if *name != self.marker {
            return false;
        }
        matches!(
            init.as_ref(),
            IRNode::CallExpr { callee, arguments, .. }
                if matches!(callee.as_ref(), IRNode::Identifier(id) if id == "require")
                    && matches!(arguments.as_slice(), [module] if self.is_marker_module(module))
        )
    }

    /// Remove marker bindings from `statements`, returning how many were dropped.
    fn strip(&self, statements: &mut Vec<IRNode>) -> usize {
        let mut removed = 0;
        statements.retain_mut(|stmt| {
            if self.is_marker_import(stmt) {
                removed += 1;
                return false;
            }
            if let IRNode::VariableStatement { declarations, .. } = stmt {
                let before = declarations.len();
                declarations.retain(|decl| !self.is_marker_require(decl));
                removed += before - declarations.len();
                return !declarations.is_empty();
            }
            true
        });
        removed
    }
}

impl Transform for MarkerImportStripping {
    fn name(&self) -> &'static str {
        "marker-imports"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(marker = %self.marker))]
    fn run(&mut self, program: &mut IRProgram, _ctx: &mut TransformContext) {
        let still_referenced = program
            .statements
            .iter()
            .any(|stmt| stmt.any_identifier(&|name| name == self.marker));
        if still_referenced {
            tracing::debug!("marker still referenced; keeping its binding");
            return;
        }
        let removed = self.strip(&mut program.statements);
        tracing::debug!(removed, "marker bindings removed");
    }
}

#[cfg(test)]
#[path = "../../tests/marker_imports.rs"]
mod tests;
