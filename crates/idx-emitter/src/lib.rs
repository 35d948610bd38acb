//! Lowering passes and JavaScript printer for the idx compiler.
//!
//! The pipeline parses a file, lowers the arena AST to an owned
//! [`transforms::ir::IRNode`] tree, runs the configured passes over it and
//! prints the result:
//!
//! - `idx` lowering: rewrites `idx(base, p => p.a.b())` into nested guarded
//!   conditionals over hoisted temporaries.
//! - async lowering: rewrites async functions onto `__awaiter` and generators.
//! - marker import stripping: drops `import idx from "idx"` once unused.

pub mod lower;
pub mod pipeline;
pub mod transform_context;
pub mod transforms;

pub use pipeline::{EmitOptions, EmitOutput, PassOrder, Pipeline, transpile};
pub use transform_context::TransformContext;
pub use transforms::Transform;
pub use transforms::helpers::HelpersNeeded;
pub use transforms::idx_chain::IdxError;
pub use transforms::ir::{IRNode, IRProgram};
pub use transforms::ir_printer::IRPrinter;
