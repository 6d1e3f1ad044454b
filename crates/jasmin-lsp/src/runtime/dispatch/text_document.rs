//! Text document handlers: synchronization and navigation.

use super::super::LspServer;
use super::parse_text_document_position;
use crate::convert::{file_start_location, location, range_to_lsp};
use crate::event::{Event, Priority};
use jasmin_analysis::require::resolve_require;
use jasmin_analysis::source_map::SourceMap;
use jasmin_analysis::uri::uri_dir;
use jasmin_analysis::{
    Symbol, SymbolKind, evaluate_constants, extract_references, extract_symbols,
    find_definition_at_position, identifier_at_point, keywords::keyword_hover,
};
use jasmin_lsp_protocol::{JsonRpcError, internal_error, invalid_params};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Value, json};

/// What the definition handler found at the request point.
enum AtPoint {
    /// A require string literal: jump to the required file.
    Require { namespace: Option<String>, filename: String },
    /// An identifier use: resolve through symbols.
    Ident(String),
}

impl LspServer {
    // ------------------------------------------------------------------
    // Synchronization
    // ------------------------------------------------------------------

    pub(crate) fn handle_did_open(&mut self, params: Option<Value>) -> Vec<(Priority, Event)> {
        let Some(params) = params else { return Vec::new() };
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            return Vec::new();
        };
        let text =
            params.pointer("/textDocument/text").and_then(Value::as_str).unwrap_or_default();
        let version =
            params.pointer("/textDocument/version").and_then(Value::as_i64).unwrap_or(0) as i32;

        self.store.open(uri, text.to_string(), version);
        tracing::debug!("didOpen {uri} v{version}");
        self.diagnostics_refresh(uri)
    }

    pub(crate) fn handle_did_change(&mut self, params: Option<Value>) -> Vec<(Priority, Event)> {
        let Some(params) = params else { return Vec::new() };
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            return Vec::new();
        };
        // Full sync: the last change carries the complete new text.
        let Some(text) = params
            .get("contentChanges")
            .and_then(Value::as_array)
            .and_then(|changes| changes.last())
            .and_then(|change| change.get("text"))
            .and_then(Value::as_str)
        else {
            return Vec::new();
        };
        let version =
            params.pointer("/textDocument/version").and_then(Value::as_i64).unwrap_or(0) as i32;

        self.store.update(uri, text.to_string(), version);
        tracing::debug!("didChange {uri} v{version}");
        self.diagnostics_refresh(uri)
    }

    pub(crate) fn handle_did_close(&mut self, params: Option<Value>) -> Vec<(Priority, Event)> {
        let Some(params) = params else { return Vec::new() };
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            return Vec::new();
        };

        let retain = match self.config.master_file.clone() {
            Some(master) => {
                let map = self.store.closure_of(&master, &self.config.namespace_paths);
                map.contains(uri)
            }
            None => false,
        };

        self.store.close(uri, retain);
        tracing::debug!("didClose {uri} (retained: {retain})");
        if retain { vec![self.publish_diagnostics_event(uri)] } else { Vec::new() }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub(crate) fn handle_definition(
        &mut self,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        let (uri, point) = parse_text_document_position(&params)?;

        let at_point = {
            let doc = self
                .store
                .get(&uri)
                .ok_or_else(|| internal_error("No definition found"))?;
            let tree = doc.tree.as_ref().ok_or_else(|| internal_error("No definition found"))?;
            let root = tree.root_node();
            let node = root.descendant_for_point(point);

            let in_require = node.kind() == "string_literal"
                && node.parent().is_some_and(|p| p.kind() == "require");
            if in_require {
                let namespace = node
                    .parent()
                    .and_then(|req| req.children().find(|c| c.kind() == "from"))
                    .and_then(|f| f.child_by_field_name("id"))
                    .map(|id| id.text(&doc.text).to_string());
                AtPoint::Require {
                    namespace,
                    filename: node.text(&doc.text).trim_matches('"').to_string(),
                }
            } else {
                let ident = identifier_at_point(root, point)
                    .ok_or_else(|| internal_error("No definition found"))?;
                AtPoint::Ident(ident.text(&doc.text).to_string())
            }
        };

        match at_point {
            AtPoint::Require { namespace, filename } => {
                let base_dir =
                    uri_dir(&uri).ok_or_else(|| internal_error("No definition found"))?;
                let path = resolve_require(
                    &base_dir,
                    namespace.as_deref(),
                    &filename,
                    &self.config.namespace_paths,
                )
                .ok_or_else(|| internal_error("No definition found"))?;
                let target = jasmin_analysis::uri::path_to_uri(&path)
                    .ok_or_else(|| internal_error("No definition found"))?;
                Ok(file_start_location(&target))
            }
            AtPoint::Ident(name) => {
                // Scope-aware search in the current file first.
                let local = {
                    let doc = self
                        .store
                        .get(&uri)
                        .ok_or_else(|| internal_error("No definition found"))?;
                    doc.tree.as_ref().and_then(|tree| {
                        let symbols = extract_symbols(tree, &doc.text, &uri);
                        find_definition_at_position(&symbols, &name, point).cloned()
                    })
                };
                if let Some(symbol) = local {
                    return Ok(location(&symbol.uri, &symbol.selection));
                }

                // Then the dependency closure, open or loaded on demand.
                let map = self.relevant_files_for(&uri);
                let mut uris: Vec<&String> =
                    map.uris().filter(|u| u.as_str() != uri).collect();
                uris.sort();
                for file_uri in uris {
                    let Some(entry) = map.get(file_uri) else { continue };
                    let Some(tree) = &entry.tree else { continue };
                    let symbols = extract_symbols(tree, &entry.text, file_uri);
                    if let Some(symbol) = symbols.iter().find(|s| s.name == name) {
                        return Ok(location(&symbol.uri, &symbol.selection));
                    }
                }
                Err(internal_error("No definition found"))
            }
        }
    }

    pub(crate) fn handle_references(
        &mut self,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        let (uri, point) = parse_text_document_position(&params)?;

        let name = match self.identifier_name_at(&uri, point) {
            Some(name) => name,
            None => return Ok(json!([])),
        };

        let map = self.relevant_files_for(&uri);
        let mut uris: Vec<&String> = map.uris().collect();
        uris.sort();

        let mut seen: FxHashSet<(String, usize, usize)> = FxHashSet::default();
        let mut locations = Vec::new();
        for file_uri in uris {
            let Some(entry) = map.get(file_uri) else { continue };
            let Some(tree) = &entry.tree else { continue };
            for reference in extract_references(tree, &entry.text, file_uri) {
                if reference.name != name {
                    continue;
                }
                let key =
                    (file_uri.clone(), reference.range.start_byte, reference.range.end_byte);
                if seen.insert(key) {
                    locations.push(location(file_uri, &reference.range));
                }
            }
        }
        Ok(Value::Array(locations))
    }

    pub(crate) fn handle_hover(&mut self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let (uri, point) = parse_text_document_position(&params)?;

        let word = {
            let Some(doc) = self.store.get(&uri) else { return Ok(Value::Null) };
            let Some(tree) = doc.tree.as_ref() else { return Ok(Value::Null) };
            let root = tree.root_node();
            let node = root.descendant_for_point(point);

            // Keyword tokens are leaves; composite kinds like `require`
            // share names with keywords and must not match here.
            if node.child_count() == 0 {
                if let Some(blurb) = keyword_hover(node.kind()) {
                    return Ok(hover_markdown(blurb.to_string()));
                }
            }
            match identifier_at_point(root, point) {
                Some(ident) => ident.text(&doc.text).to_string(),
                None => return Ok(Value::Null),
            }
        };

        let map = self.relevant_files_for(&uri);
        let constants = evaluate_constants(&map);

        // Current file first, then the rest of the closure in stable order.
        let mut uris: Vec<&String> = map.uris().filter(|u| u.as_str() != uri).collect();
        uris.sort();
        let mut ordered: Vec<&str> = vec![uri.as_str()];
        ordered.extend(uris.iter().map(|u| u.as_str()));

        for file_uri in ordered {
            let Some(entry) = map.get(file_uri) else { continue };
            let Some(tree) = &entry.tree else { continue };
            let symbols = extract_symbols(tree, &entry.text, file_uri);
            if let Some(symbol) = symbols.iter().find(|s| s.name == word) {
                return Ok(hover_markdown(format_symbol_hover(symbol, &constants)));
            }
        }
        Ok(Value::Null)
    }

    pub(crate) fn handle_document_symbol(
        &mut self,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        let uri = params
            .as_ref()
            .and_then(|p| p.pointer("/textDocument/uri"))
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_params("missing textDocument.uri"))?;

        let Some(doc) = self.store.get(uri) else { return Ok(json!([])) };
        let Some(tree) = doc.tree.as_ref() else { return Ok(json!([])) };

        let symbols: Vec<Value> = extract_symbols(tree, &doc.text, uri)
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "detail": s.detail,
                    "kind": lsp_symbol_kind(s.kind),
                    "range": range_to_lsp(&s.range),
                    "selectionRange": range_to_lsp(&s.selection),
                })
            })
            .collect();
        Ok(Value::Array(symbols))
    }

    pub(crate) fn handle_rename(&mut self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let (uri, point) = parse_text_document_position(&params)?;
        let new_name = params
            .as_ref()
            .and_then(|p| p.get("newName"))
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_params("missing newName"))?
            .to_string();

        let name = self
            .identifier_name_at(&uri, point)
            .ok_or_else(|| internal_error("Cannot rename this element"))?;

        let Some(doc) = self.store.get(&uri) else {
            return Err(internal_error("Cannot rename this element"));
        };
        let Some(tree) = doc.tree.as_ref() else {
            return Err(internal_error("Cannot rename this element"));
        };

        let edits: Vec<Value> = extract_references(tree, &doc.text, &uri)
            .iter()
            .filter(|r| r.name == name)
            .map(|r| json!({ "range": range_to_lsp(&r.range), "newText": new_name }))
            .collect();

        Ok(json!({ "changes": { uri: edits } }))
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    /// The request-scoped source map for a request on `uri`.
    pub(crate) fn relevant_files_for(&mut self, uri: &str) -> SourceMap {
        let master = self.config.master_file.clone();
        self.store.relevant_files(uri, master.as_deref(), &self.config.namespace_paths)
    }

    fn identifier_name_at(&self, uri: &str, point: jasmin_cst::Point) -> Option<String> {
        let doc = self.store.get(uri)?;
        let tree = doc.tree.as_ref()?;
        let ident = identifier_at_point(tree.root_node(), point)?;
        Some(ident.text(&doc.text).to_string())
    }
}

fn hover_markdown(value: String) -> Value {
    json!({ "contents": { "kind": "markdown", "value": value } })
}

/// LSP `SymbolKind` numbers for the wire.
pub(crate) fn lsp_symbol_kind(kind: SymbolKind) -> u32 {
    match kind {
        SymbolKind::Function => 12,
        SymbolKind::Variable | SymbolKind::Parameter => 13,
        SymbolKind::Constant => 14,
        SymbolKind::Type => 23,
    }
}

fn format_symbol_hover(symbol: &Symbol, constants: &FxHashMap<String, i64>) -> String {
    let mut value = match symbol.kind {
        SymbolKind::Function => {
            let signature = symbol.detail.as_deref().unwrap_or(&symbol.name);
            format!("```jasmin\n{signature}\n```")
        }
        SymbolKind::Variable | SymbolKind::Parameter => {
            let ty = symbol.detail.as_deref().unwrap_or("?");
            format!("```jasmin\n{}: {}\n```", symbol.name, ty)
        }
        SymbolKind::Type => format!("```jasmin\ntype {}\n```", symbol.name),
        SymbolKind::Constant => {
            let detail = symbol.detail.as_deref().unwrap_or("int = ?");
            let (ty, declared) = detail.split_once(" = ").unwrap_or(("int", detail));
            let mut text = format!("```jasmin\nparam {}: {} = {}\n```", symbol.name, ty, declared);
            if let Some(computed) = constants.get(&symbol.name) {
                if computed.to_string() != declared.trim() {
                    text.push_str(&format!(
                        "\n<details><summary>Computed</summary>\n\n`{computed}`\n\n</details>"
                    ));
                }
            }
            text
        }
    };

    if let Some(docs) = &symbol.documentation {
        value.push_str("\n\n---\n\n");
        value.push_str(docs);
    }
    value
}
