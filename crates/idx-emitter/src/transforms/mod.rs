//! JavaScript Transforms
//!
//! Passes that rewrite the lowered [`ir::IRProgram`] before printing.
//!
//! # Architecture
//!
//! Transforms follow a two-phase approach:
//!
//! 1. **Transform Phase**: each pass walks the owned IR tree and replaces
//!    nodes in place, recording helpers and diagnostics on the shared
//!    [`TransformContext`].
//!
//! 2. **Print Phase**: [`ir_printer::IRPrinter`] walks the final tree and emits
//!    JavaScript text.
//!
//! | Transform | Type | Notes |
//! |-----------|------|-------|
//! | `idx_lowering` | [`idx_lowering::IdxLowering`] | Marker calls to guarded conditionals |
//! | `async_lowering` | [`async_lowering::AsyncLowering`] | Async functions onto `__awaiter` |
//! | `marker_imports` | [`marker_imports::MarkerImportStripping`] | Drops unused marker bindings |

pub mod async_lowering;
pub mod helpers;
pub mod idx_chain;
pub mod idx_lowering;
pub mod ir;
pub mod ir_printer;
pub mod marker_imports;
pub mod temps;

use crate::transform_context::TransformContext;
use ir::IRProgram;

/// A rewrite over a whole program.
///
/// Passes report failures through [`TransformContext::report`]; the pipeline
/// stops after the first pass that leaves an error behind.
pub trait Transform {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn run(&mut self, program: &mut IRProgram, ctx: &mut TransformContext);
}
