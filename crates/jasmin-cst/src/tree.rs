//! Tree storage and borrowed node views.
//!
//! A [`Tree`] owns a flat arena of nodes; a [`Node`] is a `Copy` handle
//! borrowing the tree, so node views cannot outlive the parse they came
//! from. Points are derived lazily from a line-start index built at parse
//! time, keeping per-node storage to byte offsets only.

use std::fmt;

/// A row/column position, zero-based, with byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Point { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Byte and point extent of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_point: Point,
    pub end_point: Point,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: &'static str,
    pub named: bool,
    pub missing: bool,
    pub start: usize,
    pub end: usize,
    pub parent: Option<u32>,
    pub field: Option<&'static str>,
    pub children: Vec<u32>,
}

/// A parsed concrete syntax tree.
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: u32,
    pub(crate) line_starts: Vec<usize>,
}

impl Tree {
    /// The root node of the tree, of kind `source_file`.
    pub fn root_node(&self) -> Node<'_> {
        Node { tree: self, id: self.root }
    }

    /// Convert a byte offset into a point using the line index.
    pub fn point_at(&self, byte: usize) -> Point {
        let row = match self.line_starts.binary_search(&byte) {
            Ok(r) => r,
            Err(r) => r.saturating_sub(1),
        };
        let line_start = self.line_starts.get(row).copied().unwrap_or(0);
        Point { row, column: byte.saturating_sub(line_start) }
    }

    /// Convert a point into a byte offset, clamped to the source length.
    pub fn byte_at(&self, point: Point) -> usize {
        let line_start = match self.line_starts.get(point.row) {
            Some(s) => *s,
            None => return self.nodes.get(self.root as usize).map(|n| n.end).unwrap_or(0),
        };
        let line_end = self
            .line_starts
            .get(point.row + 1)
            .map(|s| s.saturating_sub(1))
            .unwrap_or_else(|| self.nodes.get(self.root as usize).map(|n| n.end).unwrap_or(0));
        (line_start + point.column).min(line_end)
    }

    pub(crate) fn build_line_starts(source: &str) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        starts
    }
}

/// A borrowed view of one node in a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: u32,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        // The id is only ever minted by the owning tree.
        &self.tree.nodes[self.id as usize]
    }

    /// The node's kind name, e.g. `"function_definition"` or `"("`.
    pub fn kind(&self) -> &'static str {
        self.data().kind
    }

    /// Whether the node is a named grammar node rather than an anonymous
    /// token such as a keyword or a piece of punctuation.
    pub fn is_named(&self) -> bool {
        self.data().named
    }

    /// Whether this node represents a syntax error region.
    pub fn is_error(&self) -> bool {
        self.data().kind == "ERROR"
    }

    /// Whether this is a zero-width node inserted for a required token
    /// absent from the source.
    pub fn is_missing(&self) -> bool {
        self.data().missing
    }

    pub fn start_byte(&self) -> usize {
        self.data().start
    }

    pub fn end_byte(&self) -> usize {
        self.data().end
    }

    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.data().start..self.data().end
    }

    pub fn start_point(&self) -> Point {
        self.tree.point_at(self.data().start)
    }

    pub fn end_point(&self) -> Point {
        self.tree.point_at(self.data().end)
    }

    /// The full byte/point extent of this node.
    pub fn range(&self) -> Range {
        Range {
            start_byte: self.start_byte(),
            end_byte: self.end_byte(),
            start_point: self.start_point(),
            end_point: self.end_point(),
        }
    }

    /// The node's text within `source`, which must be the string the tree
    /// was parsed from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.data().start..self.data().end).unwrap_or("")
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, i: usize) -> Option<Node<'t>> {
        self.data().children.get(i).map(|id| Node { tree: self.tree, id: *id })
    }

    /// All children, anonymous tokens included. Takes the handle by value
    /// (it is `Copy`), so the iterator borrows the tree, not the handle.
    pub fn children(self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |id| Node { tree, id: *id })
    }

    pub fn named_child_count(&self) -> usize {
        self.children().filter(|c| c.is_named()).count()
    }

    pub fn named_child(&self, i: usize) -> Option<Node<'t>> {
        self.children().filter(|c| c.is_named()).nth(i)
    }

    pub fn named_children(self) -> impl Iterator<Item = Node<'t>> + 't {
        self.children().filter(|c| c.is_named())
    }

    /// The first child attached under the given field name.
    pub fn child_by_field_name(&self, field: &str) -> Option<Node<'t>> {
        self.children().find(|c| c.data().field == Some(field))
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| Node { tree: self.tree, id })
    }

    /// The innermost node whose byte range contains `byte`.
    pub fn descendant_for_byte(&self, byte: usize) -> Node<'t> {
        let mut current = *self;
        'descend: loop {
            for child in current.children() {
                let d = child.data();
                if d.start <= byte && byte < d.end {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// The innermost node whose range contains `point`.
    pub fn descendant_for_point(&self, point: Point) -> Node<'t> {
        self.descendant_for_byte(self.tree.byte_at(point))
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {{ kind: {:?}, range: {}..{} }}",
            self.kind(),
            self.start_byte(),
            self.end_byte()
        )
    }
}
