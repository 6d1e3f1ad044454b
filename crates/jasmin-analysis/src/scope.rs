//! Scope-aware definition lookup.
//!
//! Finds the innermost identifier at a point and picks the declaration a
//! use at that point actually refers to: locals and parameters only count
//! when they are declared inside the containing function, and a parameter
//! masks a same-named local seen elsewhere in the file.

use crate::symbols::{Symbol, SymbolKind};
use jasmin_cst::{Node, Point, Range};

/// The innermost `identifier` or `variable` node containing `point`.
///
/// Returns `None` when the point sits on punctuation, keywords, or
/// whitespace.
pub fn identifier_at_point<'t>(root: Node<'t>, point: Point) -> Option<Node<'t>> {
    let node = root.descendant_for_point(point);
    if matches!(node.kind(), "identifier" | "variable") { Some(node) } else { None }
}

fn contains(range: &Range, point: Point) -> bool {
    range.start_point <= point && point <= range.end_point
}

/// Choose the declaration of `name` visible at `point`.
///
/// Inside a function, variable and parameter candidates are restricted to
/// declarations whose row falls within the function's row range; other
/// kinds stay unrestricted. Among what remains, a parameter is preferred
/// over a variable, and a variable over anything else.
pub fn find_definition_at_position<'a>(
    symbols: &'a [Symbol],
    name: &str,
    point: Point,
) -> Option<&'a Symbol> {
    let containing_function = symbols
        .iter()
        .find(|s| s.kind == SymbolKind::Function && contains(&s.range, point));

    let mut candidates: Vec<&Symbol> =
        symbols.iter().filter(|s| s.name == name).collect();

    if let Some(function) = containing_function {
        let first_row = function.range.start_point.row;
        let last_row = function.range.end_point.row;
        candidates.retain(|s| {
            if matches!(s.kind, SymbolKind::Variable | SymbolKind::Parameter) {
                let row = s.selection.start_point.row;
                first_row <= row && row <= last_row
            } else {
                true
            }
        });
    }

    candidates
        .iter()
        .find(|s| s.kind == SymbolKind::Parameter)
        .or_else(|| candidates.iter().find(|s| s.kind == SymbolKind::Variable))
        .copied()
        .or_else(|| candidates.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::extract_symbols;
    use jasmin_cst::Parser;
    use pretty_assertions::assert_eq;

    fn symbols_of(source: &str) -> Vec<Symbol> {
        let mut parser = Parser::new();
        let tree = parser.parse(source).unwrap();
        extract_symbols(&tree, source, "file:///test.jazz")
    }

    #[test]
    fn test_identifier_at_point() {
        let src = "fn f(reg u64 x) -> reg u64 { reg u64 y; y = x; return y; }";
        let mut parser = Parser::new();
        let tree = parser.parse(src).unwrap();
        let root = tree.root_node();

        let x_use = src.find("y = x").map(|i| i + 4).unwrap();
        let node = identifier_at_point(root, tree.point_at(x_use)).unwrap();
        assert_eq!(node.text(src), "x");
        assert_eq!(node.kind(), "identifier");

        // Whitespace and keywords yield nothing.
        assert!(identifier_at_point(root, tree.point_at(src.find("{ ").unwrap() + 1)).is_none());
        assert!(identifier_at_point(root, tree.point_at(src.find("return").unwrap())).is_none());
    }

    #[test]
    fn test_parameter_masks_same_named_local_elsewhere() {
        let src = "\
fn other() { reg u64 x; x = 1; }
fn f(reg u64 x) -> reg u64 { return x; }
";
        let syms = symbols_of(src);
        let point = Point::new(1, src.lines().nth(1).unwrap().find("return x").unwrap() + 7);
        let def = find_definition_at_position(&syms, "x", point).unwrap();
        assert_eq!(def.kind, SymbolKind::Parameter);
        assert_eq!(def.selection.start_point.row, 1);
    }

    #[test]
    fn test_locals_outside_containing_function_are_rejected() {
        let src = "\
fn a() { reg u64 v; v = 1; }
fn b() { reg u64 w; w = v; }
";
        let syms = symbols_of(src);
        // Inside b, the only `v` candidate is a's local: out of scope.
        let point = Point::new(1, src.lines().nth(1).unwrap().find("= v").unwrap() + 2);
        assert!(find_definition_at_position(&syms, "v", point).is_none());
    }

    #[test]
    fn test_constants_visible_inside_functions() {
        let src = "param int N = 4;\nfn f() { reg u64 v; v = N; }\n";
        let syms = symbols_of(src);
        let point = Point::new(1, src.lines().nth(1).unwrap().find("= N").unwrap() + 2);
        let def = find_definition_at_position(&syms, "N", point).unwrap();
        assert_eq!(def.kind, SymbolKind::Constant);
    }
}
