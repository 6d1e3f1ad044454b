//! Syntax-error diagnostics from error and missing nodes.
//!
//! The walk visits all children, not just named ones, since error nodes
//! can be anonymous tokens. One diagnostic is produced per offending node;
//! the subtree under an error region is not reported again.

use jasmin_cst::{Node, Range, Tree};

/// One syntax problem with its source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub range: Range,
    pub message: String,
}

/// Collect a diagnostic for every error or missing node in the tree.
pub fn collect_syntax_errors(tree: &Tree) -> Vec<SyntaxDiagnostic> {
    let mut out = Vec::new();
    walk(tree.root_node(), &mut out);
    out
}

fn walk(node: Node<'_>, out: &mut Vec<SyntaxDiagnostic>) {
    if node.is_missing() {
        out.push(SyntaxDiagnostic {
            range: node.range(),
            message: format!("Missing: {}", node.kind()),
        });
        return;
    }
    if node.is_error() {
        out.push(SyntaxDiagnostic { range: node.range(), message: "Syntax error".to_string() });
        return;
    }
    for child in node.children() {
        walk(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jasmin_cst::Parser;

    fn errors(source: &str) -> Vec<SyntaxDiagnostic> {
        let mut parser = Parser::new();
        let tree = parser.parse(source).unwrap();
        collect_syntax_errors(&tree)
    }

    #[test]
    fn test_clean_source_has_no_diagnostics() {
        assert!(errors("fn f(reg u64 x) -> reg u64 { return x; }").is_empty());
    }

    #[test]
    fn test_malformed_parameter_list() {
        let diags = errors("fn f( { }");
        assert!(!diags.is_empty());
        assert!(diags.iter().any(|d| d.message == "Missing: )"), "got {diags:?}");
    }

    #[test]
    fn test_garbage_reports_syntax_error() {
        let diags = errors("fn f() { } ???");
        assert!(diags.iter().any(|d| d.message == "Syntax error"));
    }

    #[test]
    fn test_error_region_reported_once() {
        let diags = errors("? ? ?\nfn f() { }");
        assert_eq!(diags.len(), 1);
    }
}
