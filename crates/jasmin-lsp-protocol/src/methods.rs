//! LSP method name constants for standardized request/notification routing.
//!
//! Centralizes all method identifiers so dispatch, capability registration,
//! and tests agree on a single source of truth.

// ============================================================================
// Lifecycle Methods
// ============================================================================

/// Initialize request - first request from client to server
pub const INITIALIZE: &str = "initialize";
/// Initialized notification - client is ready
pub const INITIALIZED: &str = "initialized";
/// Shutdown request - prepare for exit
pub const SHUTDOWN: &str = "shutdown";
/// Exit notification - terminate the server
pub const EXIT: &str = "exit";

// ============================================================================
// Text Document Synchronization
// ============================================================================

/// Document opened in the editor
pub const TEXT_DOCUMENT_DID_OPEN: &str = "textDocument/didOpen";
/// Document content changed
pub const TEXT_DOCUMENT_DID_CHANGE: &str = "textDocument/didChange";
/// Document closed
pub const TEXT_DOCUMENT_DID_CLOSE: &str = "textDocument/didClose";

// ============================================================================
// Language Features
// ============================================================================

/// Go-to-definition request
pub const TEXT_DOCUMENT_DEFINITION: &str = "textDocument/definition";
/// Find-references request
pub const TEXT_DOCUMENT_REFERENCES: &str = "textDocument/references";
/// Hover request
pub const TEXT_DOCUMENT_HOVER: &str = "textDocument/hover";
/// Document symbol outline request
pub const TEXT_DOCUMENT_DOCUMENT_SYMBOL: &str = "textDocument/documentSymbol";
/// Rename request
pub const TEXT_DOCUMENT_RENAME: &str = "textDocument/rename";
/// Server-published diagnostics notification
pub const TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";

// ============================================================================
// Workspace Features
// ============================================================================

/// Workspace-wide symbol search
pub const WORKSPACE_SYMBOL: &str = "workspace/symbol";
/// Watched-file change notification
pub const WORKSPACE_DID_CHANGE_WATCHED_FILES: &str = "workspace/didChangeWatchedFiles";
/// Server-initiated configuration request
pub const WORKSPACE_CONFIGURATION: &str = "workspace/configuration";

// ============================================================================
// Custom Methods (jasmin-lsp namespace)
// ============================================================================

/// Set the master (compilation entry point) file
pub const JASMIN_SET_MASTER_FILE: &str = "jasmin-lsp/setMasterFile";
/// Set the namespace → directory map used by require resolution
pub const JASMIN_SET_NAMESPACE_PATHS: &str = "jasmin-lsp/setNamespacePaths";
/// List the namespaces referenced by the master file's require directives
pub const JASMIN_GET_REQUIRED_NAMESPACES: &str = "jasmin-lsp/getRequiredNamespaces";
