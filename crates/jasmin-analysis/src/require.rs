//! `require` directive extraction and filesystem resolution.
//!
//! A `require` node carries one or more string-literal filenames and an
//! optional `from` child naming a namespace. Resolution tries an explicit
//! namespace → directory mapping first, then a fixed directory ladder
//! around the requiring file. Misses resolve to no edge.

use jasmin_cst::{Node, Range, Tree};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// One `(namespace, filename)` pair from a `require` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireTarget {
    pub namespace: Option<String>,
    /// Filename with the surrounding quotes stripped.
    pub filename: String,
    /// Range of the string literal in the requiring file.
    pub literal_range: Range,
}

/// Extract every require target from a parsed file.
pub fn extract_requires(tree: &Tree, source: &str) -> Vec<RequireTarget> {
    let mut out = Vec::new();
    collect(tree.root_node(), source, &mut out);
    out
}

fn collect(node: Node<'_>, source: &str, out: &mut Vec<RequireTarget>) {
    if node.kind() == "require" {
        let namespace = node
            .children()
            .find(|c| c.kind() == "from")
            .and_then(|f| f.child_by_field_name("id"))
            .map(|id| id.text(source).to_string())
            .filter(|ns| !ns.is_empty());
        for child in node.children() {
            if child.kind() == "string_literal" && !child.is_missing() {
                let raw = child.text(source);
                let filename = raw.trim_matches('"').to_string();
                if !filename.is_empty() {
                    out.push(RequireTarget {
                        namespace: namespace.clone(),
                        filename,
                        literal_range: child.range(),
                    });
                }
            }
        }
    }
    for child in node.children() {
        collect(child, source, out);
    }
}

/// Resolve one require target to an existing file on disk.
///
/// With a namespace, an explicit namespace-path mapping takes precedence;
/// otherwise a six-step ladder is tried around `base_dir` (the directory of
/// the requiring file): each of `base_dir`, its parent, and its grandparent
/// joined with the namespace as written and then lowercased. Without a
/// namespace the filename is resolved relative to `base_dir`. Returns
/// `None` when nothing exists, which callers treat as no edge.
pub fn resolve_require(
    base_dir: &Path,
    namespace: Option<&str>,
    filename: &str,
    namespace_paths: &FxHashMap<String, PathBuf>,
) -> Option<PathBuf> {
    let found = match namespace {
        Some(ns) => resolve_namespaced(base_dir, ns, filename, namespace_paths),
        None => existing(base_dir.join(filename)),
    };
    if found.is_none() {
        tracing::debug!(
            "require resolution miss: {:?} {} (from {})",
            namespace,
            filename,
            base_dir.display()
        );
    }
    found
}

fn resolve_namespaced(
    base_dir: &Path,
    namespace: &str,
    filename: &str,
    namespace_paths: &FxHashMap<String, PathBuf>,
) -> Option<PathBuf> {
    if let Some(mapped) = namespace_paths.get(namespace) {
        if let Some(path) = existing(mapped.join(filename)) {
            return Some(path);
        }
    }

    let lowered = namespace.to_lowercase();
    let mut dir = Some(base_dir.to_path_buf());
    for _ in 0..3 {
        let d = dir?;
        for ns in [namespace, lowered.as_str()] {
            if let Some(path) = existing(d.join(ns).join(filename)) {
                return Some(path);
            }
        }
        dir = d.parent().map(Path::to_path_buf);
    }
    None
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.is_file() { Some(std::fs::canonicalize(&path).unwrap_or(path)) } else { None }
}
