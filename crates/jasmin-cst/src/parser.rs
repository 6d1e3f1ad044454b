//! Recursive-descent grammar for Jasmin with panic-mode recovery.
//!
//! The parser never fails: unexpected tokens are collected under `ERROR`
//! nodes with resynchronization at statement and item boundaries, and
//! required-but-absent tokens become zero-width missing nodes. Every loop
//! guarantees token progress, so parsing terminates on arbitrary input.

use crate::lexer::{Token, TokenKind, tokenize};
use crate::tree::{NodeData, Tree};

type Child = (Option<&'static str>, u32);

const TYPE_KEYWORDS: &[&str] = &["int", "bool", "u8", "u16", "u32", "u64", "u128", "u256"];
const STORAGE_KEYWORDS: &[&str] = &["reg", "stack", "const", "inline"];

pub(crate) fn parse(source: &str) -> Tree {
    let mut p = P { src: source, toks: tokenize(source), pos: 0, nodes: Vec::new() };
    let root = p.parse_source_file();
    Tree { nodes: p.nodes, root, line_starts: Tree::build_line_starts(source) }
}

struct P<'s> {
    src: &'s str,
    toks: Vec<Token>,
    pos: usize,
    nodes: Vec<NodeData>,
}

impl P<'_> {
    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Token> {
        self.toks.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<Token> {
        self.toks.get(self.pos + n).copied()
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn at_kw(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Keyword(k), .. }) if k == kw)
    }

    fn at_punct(&self, p: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Punct(q), .. }) if q == p)
    }

    fn at_ident(&self) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Ident, .. }))
    }

    fn at_type_start(&self) -> bool {
        match self.peek() {
            Some(Token { kind: TokenKind::Keyword(k), .. }) => TYPE_KEYWORDS.contains(&k),
            Some(Token { kind: TokenKind::Ident, .. }) => true,
            _ => false,
        }
    }

    fn at_storage(&self) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Keyword(k), .. })
            if STORAGE_KEYWORDS.contains(&k))
    }

    /// Byte offset of the current token, or end of input.
    fn offset(&self) -> usize {
        self.peek().map(|t| t.start).unwrap_or(self.src.len())
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    fn push_leaf(&mut self, kind: &'static str, named: bool, start: usize, end: usize) -> u32 {
        let id = self.nodes.len() as u32;
        self.nodes.push(NodeData {
            kind,
            named,
            missing: false,
            start,
            end,
            parent: None,
            field: None,
            children: Vec::new(),
        });
        id
    }

    fn missing(&mut self, kind: &'static str, named: bool) -> u32 {
        let at = self.offset();
        let id = self.nodes.len() as u32;
        self.nodes.push(NodeData {
            kind,
            named,
            missing: true,
            start: at,
            end: at,
            parent: None,
            field: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&mut self, kind: &'static str, children: Vec<Child>) -> u32 {
        let id = self.nodes.len() as u32;
        let mut start = usize::MAX;
        let mut end = 0;
        for (_, c) in &children {
            let d = &self.nodes[*c as usize];
            start = start.min(d.start);
            end = end.max(d.end);
        }
        if children.is_empty() {
            start = self.offset();
            end = start;
        }
        for (field, c) in &children {
            self.nodes[*c as usize].parent = Some(id);
            self.nodes[*c as usize].field = *field;
        }
        self.nodes.push(NodeData {
            kind,
            named: true,
            missing: false,
            start,
            end,
            parent: None,
            field: None,
            children: children.into_iter().map(|(_, c)| c).collect(),
        });
        id
    }

    /// Consume the current token as a leaf with its natural kind.
    fn bump(&mut self) -> u32 {
        match self.peek() {
            Some(tok) => {
                self.pos += 1;
                let (kind, named): (&'static str, bool) = match tok.kind {
                    TokenKind::Ident => ("identifier", true),
                    TokenKind::Int => ("int_literal", true),
                    TokenKind::Str => ("string_literal", true),
                    TokenKind::Keyword(k) => (k, false),
                    TokenKind::Punct(p) => (p, false),
                    TokenKind::Unknown => ("ERROR", true),
                };
                self.push_leaf(kind, named, tok.start, tok.end)
            }
            None => self.missing("identifier", true),
        }
    }

    /// Consume the current token as a leaf with an overriding kind.
    fn bump_as(&mut self, kind: &'static str, named: bool) -> u32 {
        match self.peek() {
            Some(tok) => {
                self.pos += 1;
                self.push_leaf(kind, named, tok.start, tok.end)
            }
            None => self.missing(kind, named),
        }
    }

    fn expect_punct(&mut self, p: &'static str) -> u32 {
        if self.at_punct(p) { self.bump() } else { self.missing(p, false) }
    }

    fn expect_kw(&mut self, k: &'static str) -> u32 {
        if self.at_kw(k) { self.bump() } else { self.missing(k, false) }
    }

    fn expect_identifier(&mut self) -> u32 {
        if self.at_ident() { self.bump() } else { self.missing("identifier", true) }
    }

    /// Wrap the current token in a single-token `ERROR` node.
    fn error_token(&mut self) -> u32 {
        let tok = self.bump();
        self.node("ERROR", vec![(None, tok)])
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    fn parse_source_file(&mut self) -> u32 {
        let mut items: Vec<Child> = Vec::new();
        while !self.at_eof() {
            let item = if self.at_punct("#") {
                self.parse_annotation()
            } else if self.at_kw("require") || self.at_kw("from") {
                self.parse_require()
            } else if self.at_kw("param") {
                self.parse_param()
            } else if self.at_kw("type") {
                self.parse_type_definition()
            } else if self.at_kw("fn") || self.at_kw("export") || self.at_kw("inline") {
                self.parse_function()
            } else if self.at_type_start() {
                self.parse_global()
            } else {
                self.error_item()
            };
            items.push((None, item));
        }
        self.node("source_file", items)
    }

    /// `#[key="value", …]` or a bare `#word`. The bracket contents are kept
    /// as unnamed leaves so annotation keys never count as identifier uses.
    fn parse_annotation(&mut self) -> u32 {
        let mut kids: Vec<Child> = vec![(None, self.bump())];
        if self.at_punct("[") {
            kids.push((None, self.bump()));
            while !self.at_eof() && !self.at_punct("]") {
                kids.push((None, self.bump_as("annotation_item", false)));
            }
            kids.push((None, self.expect_punct("]")));
        } else if self.at_ident() {
            kids.push((None, self.bump_as("annotation_item", false)));
        }
        self.node("annotation", kids)
    }

    /// Consume tokens until the next plausible item start.
    fn error_item(&mut self) -> u32 {
        let mut kids: Vec<Child> = vec![(None, self.bump())];
        while !self.at_eof() && !self.at_item_start() {
            kids.push((None, self.bump()));
        }
        self.node("ERROR", kids)
    }

    fn at_item_start(&self) -> bool {
        match self.peek() {
            Some(Token { kind: TokenKind::Keyword(k), .. }) => {
                matches!(k, "require" | "from" | "param" | "type" | "fn" | "export" | "inline")
                    || TYPE_KEYWORDS.contains(&k)
            }
            _ => false,
        }
    }

    fn parse_require(&mut self) -> u32 {
        let mut kids: Vec<Child> = Vec::new();
        if self.at_kw("from") {
            let from_kw = self.bump();
            let id = self.expect_identifier();
            let from = self.node("from", vec![(None, from_kw), (Some("id"), id)]);
            kids.push((None, from));
        }
        kids.push((None, self.expect_kw("require")));
        let mut saw_file = false;
        while matches!(self.peek(), Some(Token { kind: TokenKind::Str, .. })) {
            kids.push((None, self.bump()));
            saw_file = true;
        }
        if !saw_file {
            let miss = self.missing("string_literal", true);
            kids.push((None, miss));
        }
        self.node("require", kids)
    }

    fn parse_param(&mut self) -> u32 {
        let kw = self.bump();
        let ty = if self.at_type_start() {
            self.parse_type()
        } else {
            self.missing("type", true)
        };
        let name = self.expect_identifier();
        let eq = self.expect_punct("=");
        let value = self.parse_expression();
        let semi = self.expect_punct(";");
        self.node(
            "param",
            vec![
                (None, kw),
                (Some("type"), ty),
                (Some("name"), name),
                (None, eq),
                (Some("value"), value),
                (None, semi),
            ],
        )
    }

    fn parse_type_definition(&mut self) -> u32 {
        let kw = self.bump();
        let name = self.expect_identifier();
        let eq = self.expect_punct("=");
        let ty = if self.at_type_start() {
            self.parse_type()
        } else {
            self.missing("type", true)
        };
        let semi = self.expect_punct(";");
        self.node(
            "type_definition",
            vec![(None, kw), (Some("name"), name), (None, eq), (None, ty), (None, semi)],
        )
    }

    fn parse_global(&mut self) -> u32 {
        let ty = self.parse_type();
        let name = self.expect_identifier();
        let eq = self.expect_punct("=");
        let value = if self.at_punct("{") {
            self.parse_array_literal()
        } else {
            self.parse_expression()
        };
        let semi = self.expect_punct(";");
        self.node(
            "global",
            vec![
                (Some("type"), ty),
                (Some("name"), name),
                (None, eq),
                (Some("value"), value),
                (None, semi),
            ],
        )
    }

    fn parse_type(&mut self) -> u32 {
        let base = self.bump();
        let mut kids: Vec<Child> = vec![(None, base)];
        if self.at_punct("[") {
            kids.push((None, self.bump()));
            let len = self.parse_expression();
            kids.push((None, len));
            kids.push((None, self.expect_punct("]")));
        }
        self.node("type", kids)
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn parse_function(&mut self) -> u32 {
        let mut kids: Vec<Child> = Vec::new();
        while self.at_kw("export") || self.at_kw("inline") {
            kids.push((None, self.bump()));
        }
        kids.push((None, self.expect_kw("fn")));
        let name = self.expect_identifier();
        kids.push((Some("name"), name));
        let params = self.parse_parameter_list();
        kids.push((Some("parameters"), params));
        if self.at_punct("->") {
            let ret = self.parse_return_type();
            kids.push((None, ret));
        }
        let body = if self.at_punct("{") {
            self.parse_block()
        } else {
            self.missing("block", true)
        };
        kids.push((Some("body"), body));
        self.node("function_definition", kids)
    }

    fn parse_parameter_list(&mut self) -> u32 {
        let mut kids: Vec<Child> = vec![(None, self.expect_punct("("))];
        loop {
            if self.at_eof() || self.at_punct(")") || self.at_punct("{") || self.at_punct("->") {
                break;
            }
            if self.at_punct(",") {
                kids.push((None, self.bump()));
                continue;
            }
            if self.at_storage() || self.at_type_start() {
                let group = self.parse_parameter_group();
                kids.push((None, group));
            } else {
                kids.push((None, self.error_token()));
            }
        }
        kids.push((None, self.expect_punct(")")));
        self.node("parameter_list", kids)
    }

    /// One comma-separated group: `storage? type name+`.
    ///
    /// A single name yields a `parameter` node with `name`/`type` fields; a
    /// shared type across several names yields a `param_decl` node whose
    /// names are `parameter` leaves.
    fn parse_parameter_group(&mut self) -> u32 {
        let mut pre: Vec<Child> = Vec::new();
        if self.at_storage() {
            pre.push((None, self.bump()));
        }
        let ty = if self.at_type_start() {
            self.parse_type()
        } else {
            self.missing("type", true)
        };
        let mut names: Vec<Token> = Vec::new();
        while self.at_ident() {
            if let Some(tok) = self.peek() {
                names.push(tok);
                self.pos += 1;
            }
        }
        if names.len() > 1 {
            let mut kids = pre;
            kids.push((Some("type"), ty));
            for tok in names {
                let leaf = self.push_leaf("parameter", true, tok.start, tok.end);
                kids.push((None, leaf));
            }
            self.node("param_decl", kids)
        } else {
            let name = match names.first() {
                Some(tok) => self.push_leaf("identifier", true, tok.start, tok.end),
                None => self.missing("identifier", true),
            };
            let mut kids = pre;
            kids.push((Some("type"), ty));
            kids.push((Some("name"), name));
            self.node("parameter", kids)
        }
    }

    fn parse_return_type(&mut self) -> u32 {
        let mut kids: Vec<Child> = vec![(None, self.bump())];
        loop {
            if self.at_storage() {
                kids.push((None, self.bump()));
            }
            if self.at_type_start() {
                let ty = self.parse_type();
                kids.push((None, ty));
            } else {
                let miss = self.missing("type", true);
                kids.push((None, miss));
            }
            if self.at_punct(",") {
                kids.push((None, self.bump()));
            } else {
                break;
            }
        }
        self.node("return_type", kids)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_block(&mut self) -> u32 {
        let mut kids: Vec<Child> = vec![(None, self.expect_punct("{"))];
        while !self.at_eof() && !self.at_punct("}") {
            let stmt = self.parse_statement();
            kids.push((None, stmt));
        }
        kids.push((None, self.expect_punct("}")));
        self.node("block", kids)
    }

    fn parse_statement(&mut self) -> u32 {
        if self.at_punct("#") {
            return self.parse_annotation();
        }
        if self.at_storage() {
            return self.parse_variable_declaration();
        }
        match self.peek() {
            Some(Token { kind: TokenKind::Keyword(k), .. }) if TYPE_KEYWORDS.contains(&k) => {
                return self.parse_variable_declaration();
            }
            _ => {}
        }
        if self.at_kw("if") {
            return self.parse_if();
        }
        if self.at_kw("while") {
            return self.parse_while();
        }
        if self.at_kw("for") {
            return self.parse_for();
        }
        if self.at_kw("return") {
            return self.parse_return();
        }
        if self.at_ident()
            || self.at_punct("(")
            || matches!(self.peek(), Some(Token { kind: TokenKind::Int, .. }))
            || self.at_punct("-")
            || self.at_punct("!")
            || self.at_punct("~")
        {
            return self.parse_expression_statement();
        }
        self.error_token()
    }

    fn parse_variable_declaration(&mut self) -> u32 {
        let mut kids: Vec<Child> = Vec::new();
        if self.at_storage() {
            kids.push((None, self.bump()));
        }
        let ty = if self.at_type_start() {
            self.parse_type()
        } else {
            self.missing("type", true)
        };
        kids.push((Some("type"), ty));
        let mut saw_name = false;
        loop {
            if self.at_ident() {
                kids.push((None, self.bump_as("variable", true)));
                saw_name = true;
            } else {
                break;
            }
            if self.at_punct(",") {
                kids.push((None, self.bump()));
            }
        }
        if !saw_name {
            let miss = self.missing("variable", true);
            kids.push((None, miss));
        }
        if self.at_punct("=") {
            kids.push((None, self.bump()));
            let init = self.parse_expression();
            kids.push((None, init));
        }
        kids.push((None, self.expect_punct(";")));
        self.node("variable_declaration", kids)
    }

    fn parse_if(&mut self) -> u32 {
        let kw = self.bump();
        let cond = self.parse_expression();
        let body = if self.at_punct("{") {
            self.parse_block()
        } else {
            self.missing("block", true)
        };
        let mut kids: Vec<Child> =
            vec![(None, kw), (Some("condition"), cond), (Some("consequence"), body)];
        if self.at_kw("else") {
            kids.push((None, self.bump()));
            let alt = if self.at_kw("if") {
                self.parse_if()
            } else if self.at_punct("{") {
                self.parse_block()
            } else {
                self.missing("block", true)
            };
            kids.push((Some("alternative"), alt));
        }
        self.node("if_statement", kids)
    }

    fn parse_while(&mut self) -> u32 {
        let kw = self.bump();
        let cond = self.parse_expression();
        let body = if self.at_punct("{") {
            self.parse_block()
        } else {
            self.missing("block", true)
        };
        self.node(
            "while_statement",
            vec![(None, kw), (Some("condition"), cond), (Some("body"), body)],
        )
    }

    fn parse_for(&mut self) -> u32 {
        let kw = self.bump();
        let var = self.expect_identifier();
        let eq = self.expect_punct("=");
        let lo = self.parse_expression();
        let dir = if self.at_kw("to") || self.at_kw("downto") {
            self.bump()
        } else {
            self.missing("to", false)
        };
        let hi = self.parse_expression();
        let body = if self.at_punct("{") {
            self.parse_block()
        } else {
            self.missing("block", true)
        };
        self.node(
            "for_statement",
            vec![
                (None, kw),
                (Some("variable"), var),
                (None, eq),
                (Some("from"), lo),
                (None, dir),
                (Some("to"), hi),
                (Some("body"), body),
            ],
        )
    }

    fn parse_return(&mut self) -> u32 {
        let kw = self.bump();
        let mut kids: Vec<Child> = vec![(None, kw)];
        if !self.at_punct(";") && !self.at_punct("}") && !self.at_eof() {
            let first = self.parse_expression();
            kids.push((None, first));
            while self.at_punct(",") {
                kids.push((None, self.bump()));
                let next = self.parse_expression();
                kids.push((None, next));
            }
        }
        kids.push((None, self.expect_punct(";")));
        self.node("return_statement", kids)
    }

    const ASSIGN_OPS: &'static [&'static str] =
        &["=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>="];

    fn parse_expression_statement(&mut self) -> u32 {
        let lhs = self.parse_expression();
        let at_assign = match self.peek() {
            Some(Token { kind: TokenKind::Punct(p), .. }) => Self::ASSIGN_OPS.contains(&p),
            _ => false,
        };
        if at_assign {
            let op = self.bump();
            let rhs = self.parse_expression();
            let semi = self.expect_punct(";");
            self.node(
                "assignment",
                vec![(Some("left"), lhs), (None, op), (Some("right"), rhs), (None, semi)],
            )
        } else {
            let semi = self.expect_punct(";");
            self.node("expression_statement", vec![(None, lhs), (None, semi)])
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> u32 {
        self.parse_binary(1)
    }

    fn binary_precedence(&self) -> Option<u8> {
        let p = match self.peek() {
            Some(Token { kind: TokenKind::Punct(p), .. }) => p,
            _ => return None,
        };
        let prec = match p {
            "||" => 1,
            "&&" => 2,
            "|" => 3,
            "^" => 4,
            "&" => 5,
            "==" | "!=" => 6,
            "<" | "<=" | ">" | ">=" => 7,
            "<<" | ">>" => 8,
            "+" | "-" => 9,
            "*" | "/" | "%" => 10,
            _ => return None,
        };
        Some(prec)
    }

    fn parse_binary(&mut self, min_prec: u8) -> u32 {
        let mut lhs = self.parse_unary();
        while let Some(prec) = self.binary_precedence() {
            if prec < min_prec {
                break;
            }
            let op = self.bump();
            let rhs = self.parse_binary(prec + 1);
            lhs = self.node(
                "binary_expression",
                vec![(Some("left"), lhs), (Some("operator"), op), (Some("right"), rhs)],
            );
        }
        lhs
    }

    fn parse_unary(&mut self) -> u32 {
        if self.at_punct("-") || self.at_punct("+") || self.at_punct("!") || self.at_punct("~") {
            let op = self.bump();
            let arg = self.parse_unary();
            return self.node(
                "unary_expression",
                vec![(Some("operator"), op), (Some("argument"), arg)],
            );
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> u32 {
        let mut expr = self.parse_primary();
        loop {
            if self.at_punct("(") {
                let mut kids: Vec<Child> = vec![(Some("function"), expr), (None, self.bump())];
                loop {
                    if self.at_eof() || self.at_punct(")") {
                        break;
                    }
                    let arg = self.parse_expression();
                    kids.push((None, arg));
                    if self.at_punct(",") {
                        kids.push((None, self.bump()));
                    } else {
                        break;
                    }
                }
                kids.push((None, self.expect_punct(")")));
                expr = self.node("call_expression", kids);
            } else if self.at_punct("[") {
                let open = self.bump();
                let index = self.parse_expression();
                let mut kids: Vec<Child> =
                    vec![(Some("value"), expr), (None, open), (Some("index"), index)];
                // Array slice `a[lo:len]`.
                if self.at_punct(":") {
                    kids.push((None, self.bump()));
                    let len = self.parse_expression();
                    kids.push((Some("length"), len));
                }
                kids.push((None, self.expect_punct("]")));
                expr = self.node("index_expression", kids);
            } else {
                return expr;
            }
        }
    }

    fn parse_primary(&mut self) -> u32 {
        match self.peek() {
            Some(Token { kind: TokenKind::Int, .. }) => self.bump(),
            Some(Token { kind: TokenKind::Ident, .. }) => self.bump(),
            Some(Token { kind: TokenKind::Str, .. }) => self.bump(),
            Some(Token { kind: TokenKind::Punct("("), .. }) => {
                if self.at_cast() {
                    let open = self.bump();
                    let ty = self.parse_type();
                    let close = self.expect_punct(")");
                    let value = self.parse_unary();
                    self.node(
                        "cast_expression",
                        vec![(None, open), (Some("type"), ty), (None, close), (Some("value"), value)],
                    )
                } else {
                    let open = self.bump();
                    let inner = self.parse_expression();
                    let close = self.expect_punct(")");
                    self.node(
                        "parenthesized_expression",
                        vec![(None, open), (None, inner), (None, close)],
                    )
                }
            }
            _ => self.missing("expression", true),
        }
    }

    /// `( <type-keyword> )` ahead means a cast rather than grouping.
    fn at_cast(&self) -> bool {
        let ty = match self.peek_at(1) {
            Some(Token { kind: TokenKind::Keyword(k), .. }) => TYPE_KEYWORDS.contains(&k),
            _ => false,
        };
        ty && matches!(self.peek_at(2), Some(Token { kind: TokenKind::Punct(")"), .. }))
    }

    fn parse_array_literal(&mut self) -> u32 {
        let mut kids: Vec<Child> = vec![(None, self.bump())];
        loop {
            if self.at_eof() || self.at_punct("}") {
                break;
            }
            let elem = self.parse_expression();
            kids.push((None, elem));
            if self.at_punct(",") {
                kids.push((None, self.bump()));
            } else {
                break;
            }
        }
        kids.push((None, self.expect_punct("}")));
        self.node("array_literal", kids)
    }
}
