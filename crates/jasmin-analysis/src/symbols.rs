//! Declared-symbol and reference extraction over concrete syntax trees.
//!
//! One pre-order traversal yields every declaration in a file: functions,
//! variables, parameters, `param` constants, globals, and type definitions.
//! Identifier *uses* are extracted by a separate traversal
//! ([`extract_references`]); a standalone identifier is never a declaration.

use jasmin_cst::{Node, Range, Tree};

/// The declaration kinds the extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Variable,
    Parameter,
    Type,
    Constant,
}

/// A declared symbol with its full and selection ranges.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Full extent of the declaration.
    pub range: Range,
    /// Extent of the declared identifier only.
    pub selection: Range,
    /// URI of the file the symbol is declared in.
    pub uri: String,
    /// Kind-dependent detail: a signature, a type, or `type = value`.
    pub detail: Option<String>,
    /// Documentation comment preceding the declaration, if any.
    pub documentation: Option<String>,
}

/// A use of a name.
#[derive(Debug, Clone)]
pub struct Reference {
    pub name: String,
    pub range: Range,
    pub uri: String,
}

/// Extract every declared symbol from a parsed file.
pub fn extract_symbols(tree: &Tree, source: &str, uri: &str) -> Vec<Symbol> {
    let mut out = Vec::new();
    visit(tree.root_node(), source, uri, &mut out);
    out
}

fn visit(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    match node.kind() {
        "function_definition" => function_symbol(node, source, uri, out),
        "variable_declaration" => variable_symbols(node, source, uri, out),
        "parameter" => parameter_symbol(node, source, uri, out),
        "param_decl" => param_decl_symbols(node, source, uri, out),
        "param" => constant_symbol(node, source, uri, out),
        "global" => global_symbol(node, source, uri, out),
        "type_definition" => type_symbol(node, source, uri, out),
        _ => {}
    }
    for child in node.children() {
        visit(child, source, uri, out);
    }
}

fn named_field<'t>(node: Node<'t>, field: &str, source: &str) -> Option<(Node<'t>, String)> {
    let name_node = node.child_by_field_name(field)?;
    let name = name_node.text(source).to_string();
    if name.is_empty() { None } else { Some((name_node, name)) }
}

fn function_symbol(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let Some((name_node, name)) = named_field(node, "name", source) else { return };
    // Signature is the function text up to the body, whitespace-collapsed.
    let sig_end = node
        .child_by_field_name("body")
        .map(|b| b.start_byte())
        .unwrap_or_else(|| node.end_byte());
    let raw = source.get(node.start_byte()..sig_end).unwrap_or("");
    let detail = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    out.push(Symbol {
        name,
        kind: SymbolKind::Function,
        range: node.range(),
        selection: name_node.range(),
        uri: uri.to_string(),
        detail: Some(detail),
        documentation: documentation_above(source, node.start_point().row),
    });
}

fn variable_symbols(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let names: Vec<Node<'_>> = node.children().filter(|c| c.kind() == "variable").collect();
    let Some(first) = names.first() else { return };
    let prefix =
        source.get(node.start_byte()..first.start_byte()).unwrap_or("").trim().to_string();
    for name_node in names {
        let name = name_node.text(source).to_string();
        if name.is_empty() {
            continue;
        }
        out.push(Symbol {
            name,
            kind: SymbolKind::Variable,
            range: node.range(),
            selection: name_node.range(),
            uri: uri.to_string(),
            detail: Some(prefix.clone()),
            documentation: None,
        });
    }
}

fn parameter_symbol(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let Some((name_node, name)) = named_field(node, "name", source) else { return };
    let detail = node.child_by_field_name("type").map(|t| t.text(source).to_string());
    out.push(Symbol {
        name,
        kind: SymbolKind::Parameter,
        range: node.range(),
        selection: name_node.range(),
        uri: uri.to_string(),
        detail,
        documentation: None,
    });
}

fn param_decl_symbols(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let names: Vec<Node<'_>> = node.children().filter(|c| c.kind() == "parameter").collect();
    let Some(first) = names.first() else { return };
    let prefix =
        source.get(node.start_byte()..first.start_byte()).unwrap_or("").trim().to_string();
    for name_node in names {
        let name = name_node.text(source).to_string();
        if name.is_empty() {
            continue;
        }
        out.push(Symbol {
            name,
            kind: SymbolKind::Parameter,
            range: node.range(),
            selection: name_node.range(),
            uri: uri.to_string(),
            detail: Some(prefix.clone()),
            documentation: None,
        });
    }
}

fn constant_symbol(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let Some((name_node, name)) = named_field(node, "name", source) else { return };
    let ty = node.child_by_field_name("type").map(|t| t.text(source)).unwrap_or("int");
    let value = node.child_by_field_name("value").map(|v| v.text(source)).unwrap_or("");
    out.push(Symbol {
        name,
        kind: SymbolKind::Constant,
        range: node.range(),
        selection: name_node.range(),
        uri: uri.to_string(),
        detail: Some(format!("{ty} = {value}")),
        documentation: documentation_above(source, node.start_point().row),
    });
}

fn global_symbol(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let Some((name_node, name)) = named_field(node, "name", source) else { return };
    let detail = node
        .child_by_field_name("type")
        .map(|t| t.text(source).to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "global".to_string());
    out.push(Symbol {
        name,
        kind: SymbolKind::Variable,
        range: node.range(),
        selection: name_node.range(),
        uri: uri.to_string(),
        detail: Some(detail),
        documentation: documentation_above(source, node.start_point().row),
    });
}

fn type_symbol(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Symbol>) {
    let Some((name_node, name)) = named_field(node, "name", source) else { return };
    out.push(Symbol {
        name,
        kind: SymbolKind::Type,
        range: node.range(),
        selection: name_node.range(),
        uri: uri.to_string(),
        detail: Some("type".to_string()),
        documentation: documentation_above(source, node.start_point().row),
    });
}

/// Extract every identifier use from a parsed file.
///
/// Declaration names (a function's name, a declared variable, a `from`
/// namespace id) are excluded; they are covered by [`extract_symbols`].
pub fn extract_references(tree: &Tree, source: &str, uri: &str) -> Vec<Reference> {
    let mut out = Vec::new();
    collect_refs(tree.root_node(), source, uri, &mut out);
    out
}

fn collect_refs(node: Node<'_>, source: &str, uri: &str, out: &mut Vec<Reference>) {
    if node.kind() == "identifier" && !is_declaration_name(node) {
        let name = node.text(source).to_string();
        if !name.is_empty() {
            out.push(Reference { name, range: node.range(), uri: uri.to_string() });
        }
    }
    for child in node.children() {
        collect_refs(child, source, uri, out);
    }
}

fn is_declaration_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else { return false };
    match parent.kind() {
        "function_definition" | "parameter" | "param" | "global" | "type_definition" => {
            parent.child_by_field_name("name") == Some(node)
        }
        "from" => parent.child_by_field_name("id") == Some(node),
        _ => false,
    }
}

/// Recover the documentation comment immediately preceding `row`.
///
/// Runs of `//` lines are merged top-to-bottom, tolerating one intervening
/// blank line; a `/* … */` block is captured verbatim with the markers
/// stripped.
pub fn documentation_above(source: &str, row: usize) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    if row == 0 || row > lines.len() {
        return None;
    }

    let mut collected: Vec<&str> = Vec::new();
    let mut i = row;
    let mut blank_skipped = false;
    while i > 0 {
        let line = lines[i - 1].trim();
        if let Some(stripped) = line.strip_prefix("//") {
            collected.push(stripped.trim());
            i -= 1;
        } else if line.is_empty() && !blank_skipped {
            blank_skipped = true;
            i -= 1;
        } else {
            break;
        }
    }
    if !collected.is_empty() {
        collected.reverse();
        return Some(collected.join("\n"));
    }

    // Block comment directly above the declaration.
    let mut i = row;
    if i > 0 && lines[i - 1].trim().is_empty() {
        i -= 1;
    }
    if i == 0 || !lines[i - 1].trim_end().ends_with("*/") {
        return None;
    }
    let end = i - 1;
    let start = (0..=end).rev().find(|j| lines[*j].trim_start().starts_with("/*"))?;
    let block = lines[start..=end].join("\n");
    let stripped = block.trim().trim_start_matches("/*").trim_end_matches("*/").trim();
    if stripped.is_empty() { None } else { Some(stripped.to_string()) }
}
