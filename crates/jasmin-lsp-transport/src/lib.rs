//! LSP transport layer for jasmin-lsp.
//!
//! Implements Content-Length based message framing over arbitrary
//! reader/writer pairs according to the LSP Base Protocol:
//!
//! - [`read_message`] - Read headers and an exact-byte body, then decode a
//!   JSON-RPC packet
//! - [`write_message`] - Write a response with proper framing
//! - [`write_notification`] - Write a notification with proper framing
//! - [`write_json`] - Write an arbitrary pre-built JSON message
//!
//! Malformed frames are recoverable ([`TransportError::ParseError`]); only
//! end-of-stream and I/O failures end a session.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod framing;

pub use framing::{TransportError, read_message, write_json, write_message, write_notification};
