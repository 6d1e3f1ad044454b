//! Workspace-level handlers.

use super::super::LspServer;
use crate::convert::range_to_lsp;
use crate::event::{Event, Priority};
use jasmin_analysis::extract_symbols;
use jasmin_lsp_protocol::JsonRpcError;
use serde_json::{Value, json};

/// `FileChangeType` values from the LSP specification.
const FILE_CREATED: u64 = 1;
const FILE_CHANGED: u64 = 2;
const FILE_DELETED: u64 = 3;

impl LspServer {
    /// `workspace/symbol`: case-insensitive substring filter over the
    /// symbols of every open document; an empty query returns all.
    pub(crate) fn handle_workspace_symbol(
        &mut self,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        let query = params
            .as_ref()
            .and_then(|p| p.get("query"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();

        let mut out = Vec::new();
        for uri in self.store.open_uris() {
            let Some(doc) = self.store.get(&uri) else { continue };
            let Some(tree) = doc.tree.as_ref() else { continue };
            for symbol in extract_symbols(tree, &doc.text, &uri) {
                if !query.is_empty() && !symbol.name.to_lowercase().contains(&query) {
                    continue;
                }
                out.push(json!({
                    "name": symbol.name,
                    "kind": super::text_document::lsp_symbol_kind(symbol.kind),
                    "location": { "uri": uri, "range": range_to_lsp(&symbol.selection) },
                }));
            }
        }
        Ok(Value::Array(out))
    }

    /// `workspace/didChangeWatchedFiles`: deletions clear diagnostics;
    /// creations and modifications re-read open documents from disk and
    /// refresh diagnostics either way.
    pub(crate) fn handle_did_change_watched_files(
        &mut self,
        params: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        let Some(changes) =
            params.as_ref().and_then(|p| p.get("changes")).and_then(Value::as_array).cloned()
        else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        for change in &changes {
            let Some(uri) = change.get("uri").and_then(Value::as_str) else { continue };
            let kind = change.get("type").and_then(Value::as_u64).unwrap_or(FILE_CHANGED);
            match kind {
                FILE_DELETED => effects.push(self.empty_diagnostics_event(uri)),
                FILE_CREATED | FILE_CHANGED => {
                    if self.store.is_open(uri) && !self.store.reload_from_disk(uri) {
                        tracing::debug!("watched-file reload failed for {uri}");
                    }
                    effects.push(self.publish_diagnostics_event(uri));
                }
                other => tracing::debug!("unknown file change type {other} for {uri}"),
            }
        }
        effects
    }

    /// Route the response to the startup `workspace/configuration`
    /// request: apply the section, then load the master closure and
    /// publish diagnostics for it.
    pub(crate) fn handle_configuration_response(
        &mut self,
        result: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        let section = result
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .cloned()
            .unwrap_or(Value::Null);
        if !section.is_object() {
            tracing::debug!("configuration response carried no usable section");
            return Vec::new();
        }
        self.config.apply_configuration(&section);
        self.load_master_closure()
    }
}
