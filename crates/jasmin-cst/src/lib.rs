//! Concrete syntax tree parser for the Jasmin language.
//!
//! This crate provides a lossless, error-tolerant parser for Jasmin source
//! files along with a tree-sitter-style node API. Consumers navigate the
//! tree through borrowed [`Node`] views; a node never outlives its [`Tree`].
//!
//! # Overview
//!
//! - [`Parser::parse`] - Parse a source string into a [`Tree`]
//! - [`Tree::root_node`] - Obtain the root [`Node`] of a tree
//! - [`Node`] - Borrowed view with kind, byte/point ranges, child and field
//!   navigation, and error/missing flags
//!
//! Syntactically invalid regions are represented in the tree rather than
//! reported as failures: unexpected tokens are collected under `ERROR` nodes
//! and absent-but-required tokens become zero-width nodes flagged
//! [`Node::is_missing`]. A parse therefore always produces a tree whose
//! leaves cover the recognizable tokens of the input.
//!
//! # Example
//!
//! ```
//! use jasmin_cst::Parser;
//!
//! let mut parser = Parser::new();
//! let source = "fn f(reg u64 x) -> reg u64 { reg u64 y; y = x; return y; }";
//! let tree = parser.parse(source).unwrap();
//! let root = tree.root_node();
//! assert_eq!(root.kind(), "source_file");
//! assert_eq!(root.named_child(0).unwrap().kind(), "function_definition");
//! ```

#![deny(unsafe_code)]

mod lexer;
mod parser;
mod tree;

pub use tree::{Node, Point, Range, Tree};

/// Jasmin parser.
///
/// One instance is meant to be shared and reused across parses; `parse`
/// takes `&mut self` to mirror that the instance is not re-entrant.
pub struct Parser {
    _private: (),
}

impl Parser {
    /// Create a new parser.
    pub fn new() -> Self {
        Parser { _private: () }
    }

    /// Parse `source` into a concrete syntax tree.
    ///
    /// Always returns `Some` for valid UTF-8 input; the `Option` exists so
    /// callers handle the refusal case uniformly with other CST libraries.
    pub fn parse(&mut self, source: &str) -> Option<Tree> {
        Some(parser::parse(source))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
