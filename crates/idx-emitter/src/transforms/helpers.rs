//! Runtime helpers emitted at the top of transformed files.
//!
//! Passes record which helpers they rely on in [`HelpersNeeded`]; the
//! pipeline prepends each recorded helper exactly once before printing.

use crate::transforms::ir::IRNode;

/// `__awaiter` drives a generator as an async function.
pub const AWAITER_HELPER: &str = r#"var __awaiter = (this && this.__awaiter) || function (thisArg, _arguments, P, generator) {
    function adopt(value) { return value instanceof P ? value : new P(function (resolve) { resolve(value); }); }
    return new (P || (P = Promise))(function (resolve, reject) {
        function fulfilled(value) { try { step(generator.next(value)); } catch (e) { reject(e); } }
        function rejected(value) { try { step(generator["throw"](value)); } catch (e) { reject(e); } }
        function step(result) { result.done ? resolve(result.value) : adopt(result.value).then(fulfilled, rejected); }
        step((generator = generator.apply(thisArg, _arguments || [])).next());
    });
};"#;

/// Helper usage recorded while transforming a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HelpersNeeded {
    pub awaiter: bool,
}

impl HelpersNeeded {
    pub fn any(&self) -> bool {
        self.awaiter
    }

    /// Helper declarations in emit order.
    pub fn statements(&self) -> Vec<IRNode> {
        let mut statements = Vec::new();
        if self.awaiter {
            statements.push(IRNode::Raw(AWAITER_HELPER.to_string()));
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_helpers_by_default() {
        let helpers = HelpersNeeded::default();
        assert!(!helpers.any());
        assert!(helpers.statements().is_empty());
    }

    #[test]
    fn test_awaiter_emitted_once() {
        let helpers = HelpersNeeded { awaiter: true };
        let statements = helpers.statements();
        assert_eq!(statements.len(), 1);
        let IRNode::Raw(text) = &statements[0] else {
            panic!("expected raw helper text");
        };
        assert!(text.starts_with("var __awaiter = "));
        assert!(text.ends_with("};"));
    }
}
