//! JSON-RPC protocol types, error handling, and capabilities for jasmin-lsp.
//!
//! This crate isolates protocol types from the LSP runtime so they can be
//! shared across the transport layer, the dispatcher, and tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod capabilities;
mod errors;
mod jsonrpc;
pub mod methods;

pub use errors::*;
pub use jsonrpc::*;

/// The name this server reports in `serverInfo` and uses as its
/// configuration section.
pub const SERVER_NAME: &str = "jasmin-lsp";

/// The version this server reports in `serverInfo`.
pub const SERVER_VERSION: &str = "0.1.0";

/// Reserved id for the single standing server-to-client request
/// (`workspace/configuration`). Greater than any id a client will use, so
/// responses carrying it are unambiguously ours.
pub const CONFIG_REQUEST_ID: i64 = i64::MAX;
