//! Document state management.
//!
//! Maps URIs to their text, version, and cached parse. Content is replaced
//! wholesale on change (full sync); the parse tree's lifetime is bounded by
//! the document. A single parser instance is shared across all documents;
//! the loop is single-threaded, so this is safe.

use jasmin_analysis::source_map::{DocumentProvider, SourceMap, all_relevant_files, closure};
use jasmin_analysis::uri::uri_to_path;
use jasmin_cst::{Parser, Tree};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;

/// One resident file: its text, client version, and cached parse.
#[derive(Debug)]
pub struct Document {
    pub text: String,
    pub version: i32,
    /// `None` when the parser refused the source; the text is kept either way.
    pub tree: Option<Tree>,
}

/// URI → [`Document`] store with open/loaded lifecycle.
///
/// "Open" tracks what the client has open in an editor; documents loaded
/// for the master-file closure are resident without being open.
pub struct DocumentStore {
    documents: FxHashMap<String, Document>,
    open: FxHashSet<String>,
    parser: Parser,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: FxHashMap::default(),
            open: FxHashSet::default(),
            parser: Parser::new(),
        }
    }

    /// Open a document with client-provided text.
    pub fn open(&mut self, uri: &str, text: String, version: i32) {
        let tree = self.parser.parse(&text);
        self.documents.insert(uri.to_string(), Document { text, version, tree });
        self.open.insert(uri.to_string());
    }

    /// Replace a document's content (full reparse). Behaves like [`open`]
    /// when the URI was not previously resident.
    ///
    /// [`open`]: DocumentStore::open
    pub fn update(&mut self, uri: &str, text: String, version: i32) {
        self.open(uri, text, version);
    }

    /// Make a file resident without marking it open.
    pub fn insert_loaded(&mut self, uri: &str, text: String) {
        if self.documents.contains_key(uri) {
            return;
        }
        let tree = self.parser.parse(&text);
        self.documents.insert(uri.to_string(), Document { text, version: 0, tree });
    }

    /// Close a document. Retained documents stay resident (and parseable)
    /// for dependency-closure queries; others are dropped entirely.
    pub fn close(&mut self, uri: &str, retain: bool) {
        self.open.remove(uri);
        if !retain {
            self.documents.remove(uri);
        }
    }

    /// Re-read a resident document from disk, bumping its version.
    /// Returns false when the URI is not resident or unreadable.
    pub fn reload_from_disk(&mut self, uri: &str) -> bool {
        let Some(path) = uri_to_path(uri) else { return false };
        let Ok(text) = std::fs::read_to_string(&path) else { return false };
        let Some(doc) = self.documents.get_mut(uri) else { return false };
        doc.version += 1;
        doc.tree = self.parser.parse(&text);
        doc.text = text;
        true
    }

    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn text(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|d| d.text.as_str())
    }

    pub fn tree(&self, uri: &str) -> Option<&Tree> {
        self.documents.get(uri).and_then(|d| d.tree.as_ref())
    }

    pub fn version(&self, uri: &str) -> Option<i32> {
        self.documents.get(uri).map(|d| d.version)
    }

    pub fn is_open(&self, uri: &str) -> bool {
        self.open.contains(uri)
    }

    pub fn all_uris(&self) -> Vec<String> {
        let mut uris: Vec<String> = self.documents.keys().cloned().collect();
        uris.sort();
        uris
    }

    /// Client-open URIs, sorted for deterministic iteration.
    pub fn open_uris(&self) -> Vec<String> {
        let mut uris: Vec<String> = self.open.iter().cloned().collect();
        uris.sort();
        uris
    }

    /// Parse text with the shared parser without storing anything.
    pub fn parse(&mut self, text: &str) -> Option<Tree> {
        self.parser.parse(text)
    }

    /// Transitive require closure of `root_uri` (see the dependency walker).
    pub fn closure_of(
        &mut self,
        root_uri: &str,
        namespace_paths: &FxHashMap<String, PathBuf>,
    ) -> SourceMap {
        let DocumentStore { documents, parser, .. } = self;
        closure(root_uri, &StoreProvider(documents), parser, namespace_paths)
    }

    /// The files relevant to a request on `current_uri`.
    pub fn relevant_files(
        &mut self,
        current_uri: &str,
        master_uri: Option<&str>,
        namespace_paths: &FxHashMap<String, PathBuf>,
    ) -> SourceMap {
        let open_uris = self.open_uris();
        let DocumentStore { documents, parser, .. } = self;
        all_relevant_files(
            current_uri,
            master_uri,
            &open_uris,
            &StoreProvider(documents),
            parser,
            namespace_paths,
        )
    }
}

struct StoreProvider<'a>(&'a FxHashMap<String, Document>);

impl DocumentProvider for StoreProvider<'_> {
    fn document(&self, uri: &str) -> Option<(&str, Option<&Tree>)> {
        self.0.get(uri).map(|d| (d.text.as_str(), d.tree.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_update_close() {
        let mut store = DocumentStore::new();
        store.open("file:///a.jazz", "fn f() { }".to_string(), 1);
        assert!(store.is_open("file:///a.jazz"));
        assert!(store.tree("file:///a.jazz").is_some());

        store.update("file:///a.jazz", "fn g() { }".to_string(), 2);
        assert_eq!(store.version("file:///a.jazz"), Some(2));
        assert!(store.text("file:///a.jazz").unwrap().contains("g"));

        store.close("file:///a.jazz", false);
        assert!(!store.is_open("file:///a.jazz"));
        assert!(store.get("file:///a.jazz").is_none());
    }

    #[test]
    fn test_close_with_retain_keeps_document() {
        let mut store = DocumentStore::new();
        store.open("file:///m.jazz", "fn f() { }".to_string(), 1);
        store.close("file:///m.jazz", true);
        assert!(!store.is_open("file:///m.jazz"));
        assert!(store.get("file:///m.jazz").is_some());
        assert!(store.tree("file:///m.jazz").is_some());
    }

    #[test]
    fn test_update_of_unopened_uri_behaves_like_open() {
        let mut store = DocumentStore::new();
        store.update("file:///new.jazz", "param int N = 1;".to_string(), 7);
        assert!(store.is_open("file:///new.jazz"));
        assert_eq!(store.version("file:///new.jazz"), Some(7));
    }

    #[test]
    fn test_loaded_documents_are_resident_but_not_open() {
        let mut store = DocumentStore::new();
        store.insert_loaded("file:///dep.jinc", "param int A = 1;".to_string());
        assert!(!store.is_open("file:///dep.jinc"));
        assert!(store.tree("file:///dep.jinc").is_some());
        // Loading never clobbers an open document.
        store.open("file:///dep.jinc", "param int A = 2;".to_string(), 3);
        store.insert_loaded("file:///dep.jinc", "stale".to_string());
        assert!(store.text("file:///dep.jinc").unwrap().contains('2'));
    }
}
