//! Marker call validation and guarded-chain compilation.
//!
//! A marker call `idx(base, p => p.a[k](x))` is first validated and split
//! into its base expression and the ordered access links of the path body:
//!
//! ```text
//! base, [Property(a), Computed(k), Invocation(x)]
//! ```
//!
//! The compiler then binds every intermediate value to a fresh temporary and
//! tests it against `null` before applying the next link:
//!
//! ```javascript
//! (_a = base) != null ? (_b = _a.a) != null ? (_c = _b[k]) != null ? _c(x) : _c : _b : _a
//! ```
//!
//! The last link is applied without a guard, so `N` links produce `N`
//! temporaries. A path that is just the parameter yields `base` itself.

use crate::transforms::async_lowering::is_awaiter_call;
use crate::transforms::ir::{IRArrowBody, IRNode, IRParam};
use crate::transforms::temps::TempScope;
use idx_common::diagnostics::diagnostic_codes;
use idx_common::{Diagnostic, Span};

/// One step of a marker path, applied to the previous value.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessLink {
    /// `.name`
    Property { name: String },
    /// `[key]`
    Computed { key: IRNode },
    /// `(arguments)`; spread arguments stay spread.
    Invocation {
        arguments: Vec<IRNode>,
        has_spread: bool,
    },
}

impl AccessLink {
    /// Apply this link to `target`, consuming both.
    pub fn apply(self, target: IRNode) -> IRNode {
        match self {
            AccessLink::Property { name } => IRNode::prop(target, name),
            AccessLink::Computed { key } => IRNode::elem(target, key),
            AccessLink::Invocation {
                arguments,
                has_spread,
            } => {
                debug_assert_eq!(
                    has_spread,
                    arguments
                        .iter()
                        .any(|arg| matches!(arg, IRNode::SpreadElement(_)))
                );
                IRNode::call(target, arguments)
            }
        }
    }
}

/// Rejected marker call. Each variant maps to a stable diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdxError {
    #[error("The `{marker}` function takes exactly two arguments.")]
    Arity { marker: String, span: Span },

    #[error("The second argument supplied to `{marker}` must be a function literal.")]
    PathFunction { marker: String, span: Span },

    #[error("The function supplied to `{marker}` must take exactly one parameter.")]
    ParameterCount { marker: String, span: Span },

    #[error("The parameter supplied to `{marker}` must be a plain identifier.")]
    ParameterShape { marker: String, span: Span },

    #[error(
        "The body of the function supplied to `{marker}` must be a single expression (without curly braces)."
    )]
    BodyShape { marker: String, span: Span },

    #[error(
        "The parameter of the function supplied to `{marker}` must match the base of the body expression."
    )]
    BaseMismatch { marker: String, span: Span },
}

impl IdxError {
    pub fn code(&self) -> u32 {
        match self {
            IdxError::Arity { .. } => diagnostic_codes::MARKER_ARITY,
            IdxError::PathFunction { .. } => diagnostic_codes::MARKER_PATH_NOT_FUNCTION,
            IdxError::ParameterCount { .. } => diagnostic_codes::MARKER_PARAMETER_COUNT,
            IdxError::ParameterShape { .. } => diagnostic_codes::MARKER_PARAMETER_SHAPE,
            IdxError::BodyShape { .. } => diagnostic_codes::MARKER_BODY_SHAPE,
            IdxError::BaseMismatch { .. } => diagnostic_codes::MARKER_BASE_MISMATCH,
        }
    }

    /// Source range of the offending marker call.
    pub fn span(&self) -> Span {
        match self {
            IdxError::Arity { span, .. }
            | IdxError::PathFunction { span, .. }
            | IdxError::ParameterCount { span, .. }
            | IdxError::ParameterShape { span, .. }
            | IdxError::BodyShape { span, .. }
            | IdxError::BaseMismatch { span, .. } => *span,
        }
    }

    fn marker(&self) -> &str {
        match self {
            IdxError::Arity { marker, .. }
            | IdxError::PathFunction { marker, .. }
            | IdxError::ParameterCount { marker, .. }
            | IdxError::ParameterShape { marker, .. }
            | IdxError::BodyShape { marker, .. }
            | IdxError::BaseMismatch { marker, .. } => marker,
        }
    }

    /// Diagnostic built from the registered message template for this code.
    pub fn to_diagnostic(&self, file_name: &str) -> Diagnostic {
        let span = self.span();
        Diagnostic::from_code(file_name, span.start, span.len(), self.code(), &[self.marker()])
    }
}

/// A validated marker call: the base expression and the path links in
/// application order (outermost last).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerChain {
    pub base: IRNode,
    pub links: Vec<AccessLink>,
}

impl MarkerChain {
    /// Validate the arguments of a call to `marker` and decompose its path.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn from_call(marker: &str, arguments: Vec<IRNode>, span: Span) -> Result<Self, IdxError> {
        let marker_name = || marker.to_string();

        let [base, path]: [IRNode; 2] = arguments.try_into().map_err(|_| IdxError::Arity {
            marker: marker_name(),
            span,
        })?;
        if matches!(base, IRNode::SpreadElement(_)) {
            return Err(IdxError::Arity {
                marker: marker_name(),
                span,
            });
        }

        let (parameters, body) = match strip_parentheses(path) {
            // An async path would return a promise, whichever pass saw it first.
            IRNode::ArrowFunction { is_async: true, .. } => {
                return Err(IdxError::PathFunction {
                    marker: marker_name(),
                    span,
                });
            }
            IRNode::ArrowFunction {
                body: IRArrowBody::Expression(body),
                ..
            } if is_awaiter_call(&body) => {
                return Err(IdxError::PathFunction {
                    marker: marker_name(),
                    span,
                });
            }
            IRNode::ArrowFunction {
                parameters, body, ..
            } => (parameters, Some(body)),
            IRNode::FunctionExpr { parameters, .. } => (parameters, None),
            _ => {
                return Err(IdxError::PathFunction {
                    marker: marker_name(),
                    span,
                });
            }
        };

        let [param]: [IRParam; 1] =
            parameters
                .try_into()
                .map_err(|_| IdxError::ParameterCount {
                    marker: marker_name(),
                    span,
                })?;
        if param.rest || param.default_value.is_some() {
            return Err(IdxError::ParameterShape {
                marker: marker_name(),
                span,
            });
        }

        let Some(IRArrowBody::Expression(body)) = body else {
            return Err(IdxError::BodyShape {
                marker: marker_name(),
                span,
            });
        };

        let links = decompose_path(*body, &param.name).ok_or_else(|| IdxError::BaseMismatch {
            marker: marker_name(),
            span,
        })?;

        Ok(MarkerChain { base, links })
    }

    /// Build the guarded expression, allocating temporaries from `scope`.
    pub fn compile(self, scope: &mut TempScope<'_>) -> IRNode {
        let MarkerChain { base, mut links } = self;
        let Some(last) = links.pop() else {
            return base;
        };

        let temps: Vec<String> = (0..=links.len()).map(|_| scope.fresh()).collect();
        debug_assert_eq!(temps.len(), links.len() + 1);

        let mut expr = last.apply(IRNode::id(&temps[links.len()]));
        for (k, link) in links.into_iter().enumerate().rev() {
            let value = link.apply(IRNode::id(&temps[k]));
            expr = guard(&temps[k + 1], value, expr);
        }
        guard(&temps[0], base, expr)
    }
}

/// `(temp = value) != null ? then : temp`
fn guard(temp: &str, value: IRNode, then: IRNode) -> IRNode {
    IRNode::conditional(
        IRNode::binary(
            IRNode::assign(IRNode::id(temp), value),
            "!=",
            IRNode::NullLiteral,
        ),
        then,
        IRNode::id(temp),
    )
}

/// Walk from the outermost body expression down to the parameter reference,
/// collecting links. `None` if anything other than a link or the bare
/// parameter is found.
fn decompose_path(body: IRNode, parameter: &str) -> Option<Vec<AccessLink>> {
    let mut links = Vec::new();
    let mut current = body;
    loop {
        current = match current {
            IRNode::PropertyAccess { object, property } => {
                links.push(AccessLink::Property { name: property });
                *object
            }
            IRNode::ElementAccess { object, index } => {
                links.push(AccessLink::Computed { key: *index });
                *object
            }
            IRNode::CallExpr {
                callee, arguments, ..
            } => {
                let has_spread = arguments
                    .iter()
                    .any(|arg| matches!(arg, IRNode::SpreadElement(_)));
                links.push(AccessLink::Invocation {
                    arguments,
                    has_spread,
                });
                *callee
            }
            IRNode::Identifier(name) if name == parameter => break,
            _ => return None,
        };
    }
    links.reverse();
    Some(links)
}

fn strip_parentheses(node: IRNode) -> IRNode {
    match node {
        IRNode::Parenthesized(inner) => strip_parentheses(*inner),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/idx_chain.rs"]
mod tests;
