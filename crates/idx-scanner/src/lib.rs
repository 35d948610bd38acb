//! JavaScript scanner/tokenizer for the idx compiler.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine with snapshot/restore for look-ahead

mod syntax_kind;
pub use syntax_kind::{SyntaxKind, text_to_keyword};

mod scanner_impl;
pub use scanner_impl::{ScannerDiagnostic, ScannerSnapshot, ScannerState};
