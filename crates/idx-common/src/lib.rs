//! Common types and utilities for the idx compiler.
//!
//! This crate provides foundational types used across all idx crates:
//! - Source spans (`Span`)
//! - Line/column mapping for diagnostics (`LineMap`, `Position`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`) and the message table
//! - Recursion limits shared by the parser and the transforms

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits
pub mod limits;

// Diagnostic types, codes and message templates
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, diagnostic_codes, diagnostic_messages,
    format_message,
};
