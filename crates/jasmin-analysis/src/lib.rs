//! Multi-file analysis engine for jasmin-lsp.
//!
//! Everything here operates on concrete syntax trees produced by
//! [`jasmin_cst`] and is independent of the wire protocol:
//!
//! - [`symbols`] - Declared-symbol and reference extraction, with
//!   documentation-comment capture
//! - [`require`] - `require` directive extraction and filesystem resolution
//! - [`source_map`] - Transitive dependency closure with request-scoped
//!   on-demand loading of non-open files
//! - [`eval`] - Constant-expression evaluation with an iterative fixpoint
//!   over cross-file `param` declarations
//! - [`scope`] - Scope-aware definition lookup at a point
//! - [`diagnostics`] - Syntax-error diagnostics from error/missing nodes
//! - [`keywords`] - Hover documentation for the closed keyword set
//! - [`uri`] - `file:` URI ↔ path conversions shared by the resolver and
//!   the server

#![deny(unsafe_code)]

pub mod diagnostics;
pub mod eval;
pub mod keywords;
pub mod require;
pub mod scope;
pub mod source_map;
pub mod symbols;
pub mod uri;

pub use diagnostics::{SyntaxDiagnostic, collect_syntax_errors};
pub use eval::{EvalError, eval_expr, evaluate_constants};
pub use scope::{find_definition_at_position, identifier_at_point};
pub use source_map::{DocumentProvider, SourceEntry, SourceMap};
pub use symbols::{Reference, Symbol, SymbolKind, extract_references, extract_symbols};
