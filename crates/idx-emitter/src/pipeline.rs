//! Transpile pipeline: parse, lower to IR, run the configured passes, print.

use std::fmt;
use std::str::FromStr;

use idx_common::Diagnostic;
use idx_parser::parser::ParserState;
use serde::{Deserialize, Serialize};

use crate::lower::lower_source_file;
use crate::transform_context::TransformContext;
use crate::transforms::Transform;
use crate::transforms::async_lowering::AsyncLowering;
use crate::transforms::helpers::HelpersNeeded;
use crate::transforms::idx_lowering::IdxLowering;
use crate::transforms::ir::{IRNode, IRProgram};
use crate::transforms::ir_printer::IRPrinter;
use crate::transforms::marker_imports::MarkerImportStripping;

/// Relative order of the marker and async passes. Both orders produce the
/// same output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassOrder {
    #[default]
    IdxFirst,
    AsyncFirst,
}

impl PassOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            PassOrder::IdxFirst => "idx-first",
            PassOrder::AsyncFirst => "async-first",
        }
    }
}

impl fmt::Display for PassOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idx-first" => Ok(PassOrder::IdxFirst),
            "async-first" => Ok(PassOrder::AsyncFirst),
            other => Err(format!(
                "unknown pass order '{other}' (expected 'idx-first' or 'async-first')"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Identifier whose calls are rewritten.
    pub marker: String,
    /// Module the marker is imported from.
    pub marker_module: String,
    pub lower_async: bool,
    pub pass_order: PassOrder,
    pub strip_marker_imports: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            marker: "idx".to_string(),
            marker_module: "idx".to_string(),
            lower_async: false,
            pass_order: PassOrder::IdxFirst,
            strip_marker_imports: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOutput {
    pub code: String,
    /// Helpers prepended to `code`.
    pub helpers: HelpersNeeded,
}

/// Ordered passes for one configuration.
pub struct Pipeline {
    passes: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn from_options(options: &EmitOptions) -> Self {
        let idx: Box<dyn Transform> = Box::new(IdxLowering::new(options.marker.clone()));
        let mut passes = vec![idx];
        if options.lower_async {
            let lowering: Box<dyn Transform> = Box::new(AsyncLowering::new());
            match options.pass_order {
                PassOrder::IdxFirst => passes.push(lowering),
                PassOrder::AsyncFirst => passes.insert(0, lowering),
            }
        }
        if options.strip_marker_imports {
            passes.push(Box::new(MarkerImportStripping::new(
                options.marker.clone(),
                options.marker_module.clone(),
            )));
        }
        Pipeline { passes }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass in order, stopping after the first one that reports an
    /// error.
    pub fn run(
        &mut self,
        program: &mut IRProgram,
        ctx: &mut TransformContext,
    ) -> Result<(), Vec<Diagnostic>> {
        for pass in &mut self.passes {
            let _span = tracing::debug_span!("pass", name = pass.name()).entered();
            pass.run(program, ctx);
            if ctx.has_errors() {
                return Err(ctx.take_diagnostics());
            }
        }
        Ok(())
    }
}

/// Transpile one file.
///
/// Syntax errors and rejected marker calls are returned as diagnostics; no
/// partial output is produced for a failing file.
#[tracing::instrument(level = "debug", skip(source, options), fields(len = source.len()))]
pub fn transpile(
    file_name: &str,
    source: &str,
    options: &EmitOptions,
) -> Result<EmitOutput, Vec<Diagnostic>> {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    if !parser.get_diagnostics().is_empty() {
        tracing::debug!(count = parser.get_diagnostics().len(), "syntax errors");
        return Err(parser
            .get_diagnostics()
            .iter()
            .map(|d| Diagnostic::error(file_name, d.start, d.length, d.message.clone(), d.code))
            .collect());
    }

    let arena = parser.get_arena();
    let mut program = lower_source_file(arena, root);
    let mut ctx = TransformContext::new(file_name, arena.collect_identifier_names());
    Pipeline::from_options(options).run(&mut program, &mut ctx)?;

    let helpers = *ctx.helpers();
    prepend_helpers(&mut program.statements, &helpers);

    let mut printer = IRPrinter::new();
    printer.emit_program(&program);
    Ok(EmitOutput {
        code: printer.take_output(),
        helpers,
    })
}

/// Helpers go after the directive prologue, before everything else.
fn prepend_helpers(statements: &mut Vec<IRNode>, helpers: &HelpersNeeded) {
    if !helpers.any() {
        return;
    }
    let prologue_len = statements.iter().take_while(|stmt| stmt.is_directive()).count();
    statements.splice(prologue_len..prologue_len, helpers.statements());
}

#[cfg(test)]
#[path = "../tests/pipeline.rs"]
mod tests;
