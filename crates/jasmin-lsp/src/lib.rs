//! Jasmin LSP Runtime Crate
//!
//! This crate provides the runtime implementation for the Jasmin Language
//! Server. It wires protocol decoding, the priority event queue, server
//! state management, and the per-method request handlers into a single
//! synchronous loop over stdin/stdout.
//!
//! # Architecture
//!
//! - [`event`] - Priority event queue driving the server loop
//! - [`state`] - Document store and server configuration
//! - [`runtime`] - The [`LspServer`], the [`runtime::EventSource`] trait,
//!   dispatch, and the loop itself
//! - [`convert`] - Conversions between CST positions and LSP positions
//! - [`logging`] - Per-process log file plus stderr mirroring
//!
//! # Usage
//!
//! The primary entry point is [`run_stdio()`], which starts the server in
//! stdio mode:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! jasmin_lsp::run_stdio()?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod convert;
pub mod event;
pub mod logging;
pub mod runtime;
pub mod state;

pub use event::{Event, EventQueue, Priority};
pub use runtime::LspServer;

/// Run the LSP server in stdio mode until the client closes the stream.
pub fn run_stdio() -> anyhow::Result<()> {
    let mut server = LspServer::new();
    server.run()
}
