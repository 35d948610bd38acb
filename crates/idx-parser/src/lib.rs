//! JavaScript parser for the idx compiler.
//!
//! Parsing produces a [`parser::NodeArena`]: 16-byte node headers plus typed
//! data pools, addressed by [`parser::NodeIndex`].

pub mod parser;

pub use parser::{
    NodeArena, NodeIndex, NodeList, ParseDiagnostic, ParserState, node, syntax_kind_ext,
};
