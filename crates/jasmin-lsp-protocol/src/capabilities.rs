//! Server capabilities advertised during initialization.
//!
//! Single source of truth for what the server claims to support: full text
//! sync with open/close, the navigation and symbol providers, rename, and
//! workspace file-operation filters over the Jasmin file extensions.

use lsp_types::*;

/// The file extensions this server watches and operates on.
pub const FILE_EXTENSIONS: &[&str] = &["jazz", "jinc"];

/// Glob covering the language's file extensions.
pub const FILE_GLOB: &str = "**/*.{jazz,jinc}";

fn file_operation_registration() -> FileOperationRegistrationOptions {
    FileOperationRegistrationOptions {
        filters: vec![FileOperationFilter {
            scheme: Some("file".to_string()),
            pattern: FileOperationPattern {
                glob: FILE_GLOB.to_string(),
                matches: None,
                options: None,
            },
        }],
    }
}

/// Build the capabilities this server advertises.
pub fn server_capabilities() -> ServerCapabilities {
    let mut caps = ServerCapabilities::default();

    caps.text_document_sync = Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
        open_close: Some(true),
        change: Some(TextDocumentSyncKind::FULL),
        ..Default::default()
    }));

    caps.definition_provider = Some(OneOf::Left(true));
    caps.hover_provider = Some(HoverProviderCapability::Simple(true));
    caps.references_provider = Some(OneOf::Left(true));
    caps.document_symbol_provider = Some(OneOf::Left(true));
    caps.workspace_symbol_provider = Some(OneOf::Left(true));
    caps.rename_provider = Some(OneOf::Left(true));

    let ops = file_operation_registration();
    caps.workspace = Some(WorkspaceServerCapabilities {
        workspace_folders: None,
        file_operations: Some(WorkspaceFileOperationsServerCapabilities {
            did_create: Some(ops.clone()),
            will_create: Some(ops.clone()),
            did_rename: Some(ops.clone()),
            will_rename: Some(ops.clone()),
            did_delete: Some(ops.clone()),
            will_delete: Some(ops),
        }),
    });

    caps
}
