//! Diagnostics publishing.
//!
//! Diagnostics always refresh on any document change. Published events are
//! `High` priority: delivered after the triggering response, before any
//! future inbound packet is processed.

use super::LspServer;
use crate::convert::lsp_range;
use crate::event::{Event, Priority};
use jasmin_analysis::collect_syntax_errors;
use jasmin_analysis::uri::uri_to_path;
use jasmin_lsp_protocol::methods;
use lsp_types::{Diagnostic, DiagnosticSeverity};
use serde_json::{Value, json};

impl LspServer {
    /// A `publishDiagnostics` event for one URI, from the resident parse
    /// when available, from an ephemeral disk read otherwise.
    pub(crate) fn publish_diagnostics_event(&mut self, uri: &str) -> (Priority, Event) {
        let (errors, version) = match self.store.get(uri) {
            Some(doc) => (
                doc.tree.as_ref().map(collect_syntax_errors).unwrap_or_default(),
                Some(doc.version),
            ),
            None => {
                let text = uri_to_path(uri).and_then(|p| std::fs::read_to_string(p).ok());
                let errors = text
                    .and_then(|t| self.store.parse(&t))
                    .map(|tree| collect_syntax_errors(&tree))
                    .unwrap_or_default();
                (errors, None)
            }
        };

        let diagnostics: Vec<Value> = errors
            .iter()
            .map(|d| {
                let diagnostic = Diagnostic {
                    range: lsp_range(&d.range),
                    severity: Some(DiagnosticSeverity::ERROR),
                    message: d.message.clone(),
                    ..Default::default()
                };
                serde_json::to_value(diagnostic).unwrap_or(Value::Null)
            })
            .collect();

        let mut params = json!({ "uri": uri, "diagnostics": diagnostics });
        if let Some(version) = version {
            params["version"] = json!(version);
        }
        notification(params)
    }

    /// A `publishDiagnostics` event with an empty diagnostics array,
    /// clearing anything previously shown for the URI.
    pub(crate) fn empty_diagnostics_event(&self, uri: &str) -> (Priority, Event) {
        notification(json!({ "uri": uri, "diagnostics": [] }))
    }

    /// Refresh the changed URI plus every other open URI in the relevant
    /// closure.
    pub(crate) fn diagnostics_refresh(&mut self, changed_uri: &str) -> Vec<(Priority, Event)> {
        let master = self.config.master_file.clone();
        let map = self.store.relevant_files(
            changed_uri,
            master.as_deref(),
            &self.config.namespace_paths,
        );

        let mut uris = vec![changed_uri.to_string()];
        let mut others: Vec<String> = map
            .uris()
            .filter(|u| u.as_str() != changed_uri && self.store.is_open(u))
            .cloned()
            .collect();
        others.sort();
        uris.extend(others);

        uris.iter().map(|uri| self.publish_diagnostics_event(uri)).collect()
    }

    /// Load the master file's closure into the store and publish
    /// diagnostics for every file in it.
    pub(crate) fn load_master_closure(&mut self) -> Vec<(Priority, Event)> {
        let Some(master) = self.config.master_file.clone() else { return Vec::new() };
        let map = self.store.closure_of(&master, &self.config.namespace_paths);

        let mut uris: Vec<String> = map.uris().cloned().collect();
        uris.sort();
        for (uri, entry) in map.files {
            self.store.insert_loaded(&uri, entry.text);
        }
        uris.iter().map(|uri| self.publish_diagnostics_event(uri)).collect()
    }
}

fn notification(params: Value) -> (Priority, Event) {
    (
        Priority::High,
        Event::Outbound(json!({
            "jsonrpc": "2.0",
            "method": methods::TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS,
            "params": params,
        })),
    )
}
