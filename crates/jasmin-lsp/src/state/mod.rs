//! Server state: document store and runtime configuration.

mod config;
mod document;

pub use config::ServerConfig;
pub use document::{Document, DocumentStore};
