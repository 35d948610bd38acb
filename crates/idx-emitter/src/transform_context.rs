//! Transform Context - state shared by the passes of one pipeline run
//!
//! A context lives for exactly one file. It carries the names already taken
//! in the source (so fresh temporaries never collide with user bindings), the
//! helpers the passes asked for, and the diagnostics they reported.

use crate::transforms::helpers::HelpersNeeded;
use idx_common::Diagnostic;
use rustc_hash::FxHashSet;

#[derive(Clone, Debug, Default)]
pub struct TransformContext {
    file_name: String,
    /// Every identifier name occurring in the source file.
    reserved_names: FxHashSet<String>,
    helpers: HelpersNeeded,
    diagnostics: Vec<Diagnostic>,
}

impl TransformContext {
    pub fn new(file_name: impl Into<String>, reserved_names: FxHashSet<String>) -> Self {
        TransformContext {
            file_name: file_name.into(),
            reserved_names,
            helpers: HelpersNeeded::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn reserved_names(&self) -> &FxHashSet<String> {
        &self.reserved_names
    }

    /// Access helper usage recorded by the passes.
    pub fn helpers(&self) -> &HelpersNeeded {
        &self.helpers
    }

    pub fn helpers_mut(&mut self) -> &mut HelpersNeeded {
        &mut self.helpers
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
