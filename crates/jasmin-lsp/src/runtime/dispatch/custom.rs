//! Handlers for the `jasmin-lsp/*` custom methods.

use super::super::LspServer;
use crate::event::{Event, Priority};
use jasmin_analysis::require::extract_requires;
use jasmin_analysis::uri::uri_to_path;
use jasmin_lsp_protocol::JsonRpcError;
use serde_json::{Value, json};
use std::collections::BTreeSet;

impl LspServer {
    /// `jasmin-lsp/setMasterFile`: record the compilation entry point.
    pub(crate) fn handle_set_master_file(
        &mut self,
        params: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        let Some(uri) = params.as_ref().and_then(|p| p.get("uri")).and_then(Value::as_str) else {
            tracing::warn!("setMasterFile without a uri");
            return Vec::new();
        };
        self.config.set_master_file(uri);
        Vec::new()
    }

    /// `jasmin-lsp/setNamespacePaths`: replace the namespace map, then
    /// load the master file's closure into the store and publish
    /// diagnostics for all of it.
    pub(crate) fn handle_set_namespace_paths(
        &mut self,
        params: Option<Value>,
    ) -> Vec<(Priority, Event)> {
        let paths = params.unwrap_or(Value::Null);
        self.config.set_namespace_paths(&paths);
        self.load_master_closure()
    }

    /// `jasmin-lsp/getRequiredNamespaces`: sorted unique namespace ids
    /// referenced by `from … require` directives in the master file.
    pub(crate) fn handle_get_required_namespaces(&mut self) -> Result<Value, JsonRpcError> {
        let Some(master) = self.config.master_file.clone() else { return Ok(json!([])) };

        let namespaces: BTreeSet<String> = match self.store.get(&master) {
            Some(doc) => doc
                .tree
                .as_ref()
                .map(|tree| collect_namespaces(tree, &doc.text))
                .unwrap_or_default(),
            None => {
                // Master not resident: inspect an ephemeral parse.
                let text = uri_to_path(&master)
                    .and_then(|path| std::fs::read_to_string(path).ok())
                    .unwrap_or_default();
                self.store
                    .parse(&text)
                    .map(|tree| collect_namespaces(&tree, &text))
                    .unwrap_or_default()
            }
        };

        Ok(json!(namespaces.into_iter().collect::<Vec<_>>()))
    }
}

fn collect_namespaces(tree: &jasmin_cst::Tree, text: &str) -> BTreeSet<String> {
    extract_requires(tree, text).into_iter().filter_map(|t| t.namespace).collect()
}
