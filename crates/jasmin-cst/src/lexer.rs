//! Tokenizer for Jasmin source text.
//!
//! Produces a flat token stream with byte offsets. Whitespace and comments
//! are skipped; documentation recovery works over raw source lines, not the
//! token stream, so nothing is lost by dropping them here.

/// The token classes the parser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Int,
    Str,
    Keyword(&'static str),
    Punct(&'static str),
    /// A byte sequence the lexer could not classify.
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

const KEYWORDS: &[&str] = &[
    "fn", "inline", "export", "return", "if", "else", "while", "for", "to", "downto", "require",
    "from", "param", "global", "reg", "stack", "const", "type", "int", "bool", "u8", "u16", "u32",
    "u64", "u128", "u256",
];

// Longest match first.
const PUNCTUATION: &[&str] = &[
    "<<=", ">>=", "->", "<<", ">>", "==", "!=", "<=", ">=", "&&", "||", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "<", ">", "=", "(",
    ")", "{", "}", "[", "]", ";", ",", ":", "?", ".", "#",
];

pub(crate) fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];

        // Whitespace
        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Line comment
        if b == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        // Block comment (unterminated runs to end of input)
        if b == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            pos += 2;
            while pos < bytes.len() {
                if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
                    pos += 2;
                    break;
                }
                pos += 1;
            }
            continue;
        }

        // String literal (unterminated runs to end of line)
        if b == b'"' {
            let start = pos;
            pos += 1;
            while pos < bytes.len() && bytes[pos] != b'"' && bytes[pos] != b'\n' {
                if bytes[pos] == b'\\' && pos + 1 < bytes.len() {
                    pos += 1;
                }
                pos += 1;
            }
            if pos < bytes.len() && bytes[pos] == b'"' {
                pos += 1;
            }
            tokens.push(Token { kind: TokenKind::Str, start, end: pos });
            continue;
        }

        // Number
        if b.is_ascii_digit() {
            let start = pos;
            pos += 1;
            if b == b'0' && matches!(bytes.get(pos), Some(b'x') | Some(b'X')) {
                pos += 1;
                while pos < bytes.len() && (bytes[pos].is_ascii_hexdigit() || bytes[pos] == b'_') {
                    pos += 1;
                }
            } else if b == b'0' && matches!(bytes.get(pos), Some(b'b') | Some(b'B')) {
                pos += 1;
                while pos < bytes.len() && matches!(bytes[pos], b'0' | b'1' | b'_') {
                    pos += 1;
                }
            } else {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'_') {
                    pos += 1;
                }
            }
            tokens.push(Token { kind: TokenKind::Int, start, end: pos });
            continue;
        }

        // Identifier or keyword
        if b.is_ascii_alphabetic() || b == b'_' {
            let start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            let text = &source[start..pos];
            let kind = match KEYWORDS.iter().find(|k| **k == text) {
                Some(k) => TokenKind::Keyword(k),
                None => TokenKind::Ident,
            };
            tokens.push(Token { kind, start, end: pos });
            continue;
        }

        // Punctuation, longest match first
        let rest = &source[pos..];
        if let Some(p) = PUNCTUATION.iter().find(|p| rest.starts_with(**p)) {
            tokens.push(Token { kind: TokenKind::Punct(p), start: pos, end: pos + p.len() });
            pos += p.len();
            continue;
        }

        // Skip over a full UTF-8 scalar so we never split a code point.
        let ch_len = source[pos..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
        tokens.push(Token { kind: TokenKind::Unknown, start: pos, end: pos + ch_len });
        pos += ch_len;
    }

    tokens
}
