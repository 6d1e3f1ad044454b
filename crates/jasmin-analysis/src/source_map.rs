//! Request-scoped source maps and the dependency walker.
//!
//! A [`SourceMap`] holds the `(text, tree)` pairs a single request works
//! over: open documents are snapshotted from the provider, and files that
//! are only reachable through `require` edges are loaded from disk on
//! demand. The map is dropped when the request handler returns; on-demand
//! loads are never added to the document store.

use crate::require::{extract_requires, resolve_require};
use crate::uri::{path_to_uri, uri_dir, uri_to_path};
use jasmin_cst::{Parser, Tree};
use rustc_hash::FxHashMap;
use std::path::PathBuf;

/// Source of open-document state, implemented by the server's store.
pub trait DocumentProvider {
    /// Text and cached tree for `uri` if it is resident, else `None`.
    fn document(&self, uri: &str) -> Option<(&str, Option<&Tree>)>;
}

/// One file's text and parse in a request-scoped map.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub text: String,
    pub tree: Option<Tree>,
}

/// The set of files a request works over, keyed by URI.
#[derive(Debug, Default)]
pub struct SourceMap {
    pub files: FxHashMap<String, SourceEntry>,
}

impl SourceMap {
    pub fn get(&self, uri: &str) -> Option<&SourceEntry> {
        self.files.get(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.files.contains_key(uri)
    }

    pub fn uris(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Transitive `require` closure of `root_uri`, including the root itself.
///
/// Cycles are handled with the map itself as the visited set, so every URI
/// appears at most once and the walk terminates on any graph.
pub fn closure<P: DocumentProvider>(
    root_uri: &str,
    provider: &P,
    parser: &mut Parser,
    namespace_paths: &FxHashMap<String, PathBuf>,
) -> SourceMap {
    let mut map = SourceMap::default();
    closure_into(&mut map, root_uri, provider, parser, namespace_paths);
    map
}

/// The files relevant to a request on `current_uri`: the master file's
/// closure when a master is set, otherwise the union of the closures of
/// every open URI; the current file is always included.
pub fn all_relevant_files<P: DocumentProvider>(
    current_uri: &str,
    master_uri: Option<&str>,
    open_uris: &[String],
    provider: &P,
    parser: &mut Parser,
    namespace_paths: &FxHashMap<String, PathBuf>,
) -> SourceMap {
    let mut map = SourceMap::default();
    match master_uri {
        Some(master) => closure_into(&mut map, master, provider, parser, namespace_paths),
        None => {
            for uri in open_uris {
                closure_into(&mut map, uri, provider, parser, namespace_paths);
            }
        }
    }
    closure_into(&mut map, current_uri, provider, parser, namespace_paths);
    map
}

fn closure_into<P: DocumentProvider>(
    map: &mut SourceMap,
    root_uri: &str,
    provider: &P,
    parser: &mut Parser,
    namespace_paths: &FxHashMap<String, PathBuf>,
) {
    let mut stack = vec![root_uri.to_string()];
    while let Some(uri) = stack.pop() {
        if map.contains(&uri) {
            continue;
        }
        let Some(entry) = load(&uri, provider, parser) else { continue };

        let mut targets = Vec::new();
        if let Some(tree) = &entry.tree {
            targets = extract_requires(tree, &entry.text);
        }
        let base_dir = uri_dir(&uri);
        map.files.insert(uri, entry);

        let Some(base_dir) = base_dir else { continue };
        for target in targets {
            let resolved = resolve_require(
                &base_dir,
                target.namespace.as_deref(),
                &target.filename,
                namespace_paths,
            );
            if let Some(path) = resolved {
                if let Some(target_uri) = path_to_uri(&path) {
                    if !map.contains(&target_uri) {
                        stack.push(target_uri);
                    }
                }
            }
        }
    }
}

fn load<P: DocumentProvider>(uri: &str, provider: &P, parser: &mut Parser) -> Option<SourceEntry> {
    if let Some((text, tree)) = provider.document(uri) {
        return Some(SourceEntry { text: text.to_string(), tree: tree.cloned() });
    }
    let path = uri_to_path(uri)?;
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            let tree = parser.parse(&text);
            Some(SourceEntry { text, tree })
        }
        Err(e) => {
            tracing::debug!("on-demand load failed for {uri}: {e}");
            None
        }
    }
}

/// A provider with no resident documents; every file comes from disk.
pub struct NoOpenDocuments;

impl DocumentProvider for NoOpenDocuments {
    fn document(&self, _uri: &str) -> Option<(&str, Option<&Tree>)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &std::path::Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path_to_uri(&fs::canonicalize(&path).unwrap()).unwrap()
    }

    #[test]
    fn test_closure_follows_transitive_requires() {
        let dir = tempfile::tempdir().unwrap();
        let base = write(dir.path(), "base.jinc", "param int BASE = 10 + 5;");
        let middle = write(dir.path(), "middle.jinc", "require \"base.jinc\"");
        let top = write(dir.path(), "top.jazz", "require \"middle.jinc\"");

        let mut parser = Parser::new();
        let map = closure(&top, &NoOpenDocuments, &mut parser, &FxHashMap::default());
        assert_eq!(map.len(), 3);
        for uri in [&top, &middle, &base] {
            assert!(map.contains(uri), "missing {uri}");
        }
    }

    #[test]
    fn test_cyclic_requires_terminate() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.jinc", "require \"b.jinc\"");
        write(dir.path(), "b.jinc", "require \"a.jinc\"");
        let a = path_to_uri(&fs::canonicalize(dir.path().join("a.jinc")).unwrap()).unwrap();

        let mut parser = Parser::new();
        let map = closure(&a, &NoOpenDocuments, &mut parser, &FxHashMap::default());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_missing_target_yields_no_edge() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.jazz", "require \"nowhere.jinc\"\nfn f() { }");

        let mut parser = Parser::new();
        let map = closure(&root, &NoOpenDocuments, &mut parser, &FxHashMap::default());
        assert_eq!(map.len(), 1);
        assert!(map.contains(&root));
    }

    #[test]
    fn test_unreadable_root_yields_empty_map() {
        let mut parser = Parser::new();
        let map = closure(
            "file:///definitely/not/here.jazz",
            &NoOpenDocuments,
            &mut parser,
            &FxHashMap::default(),
        );
        assert!(map.is_empty());
    }
}
