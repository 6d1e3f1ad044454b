//! Corpus-style parser tests: realistic programs parse without error
//! nodes, and arbitrary damage to them never breaks termination.

use jasmin_cst::{Node, Parser, Tree};

const CORPUS: &str = r#"// Round count.
param int ROUNDS = 24;

u64 iv = 0x0123456789abcdef;

type word = u64;

#[returnaddress="stack"]
export fn mix(reg u64 state) -> reg u64 {
  reg u64 acc tmp;
  stack u64[4] buf;
  acc = state;
  buf[0] = acc;
  for i = 0 to ROUNDS {
    tmp = acc << 1;
    acc = acc ^ tmp;
    if acc == 0 {
      acc = iv;
    } else {
      acc = rotate(acc, 3);
    }
  }
  while acc > 0 { acc = acc - 1; }
  return acc;
}

inline fn rotate(reg u64 x, reg u64 n) -> reg u64 {
  reg u64 r;
  r = (x << n) | (x >> (64 - n));
  return r;
}
"#;

fn parse(source: &str) -> Tree {
    let mut parser = Parser::new();
    parser.parse(source).unwrap()
}

fn collect_problems(node: Node<'_>, out: &mut Vec<String>) {
    if node.is_error() || node.is_missing() {
        out.push(format!("{}@{}..{}", node.kind(), node.start_byte(), node.end_byte()));
    }
    for child in node.children() {
        collect_problems(child, out);
    }
}

fn problems(source: &str) -> Vec<String> {
    let tree = parse(source);
    let mut out = Vec::new();
    collect_problems(tree.root_node(), &mut out);
    out
}

#[test]
fn test_corpus_parses_cleanly() {
    assert_eq!(problems(CORPUS), Vec::<String>::new());
}

#[test]
fn test_corpus_item_shapes() {
    let tree = parse(CORPUS);
    let kinds: Vec<&str> = tree.root_node().named_children().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "param",
            "global",
            "type_definition",
            "annotation",
            "function_definition",
            "function_definition",
        ]
    );
}

#[test]
fn test_annotation_contents_are_not_identifiers() {
    let tree = parse(CORPUS);
    let annotation = tree
        .root_node()
        .named_children()
        .find(|c| c.kind() == "annotation")
        .unwrap();
    assert!(annotation.children().all(|c| c.kind() != "identifier"));
}

#[test]
fn test_array_slice_expression() {
    let src = "fn f() { reg u64 x; x = t[0:4]; }";
    assert_eq!(problems(src), Vec::<String>::new());
    let tree = parse(src);
    let f = tree.root_node().named_child(0).unwrap();
    let body = f.child_by_field_name("body").unwrap();
    let assign = body.named_child(1).unwrap();
    let rhs = assign.child_by_field_name("right").unwrap();
    assert_eq!(rhs.kind(), "index_expression");
    assert!(rhs.child_by_field_name("length").is_some());
}

#[test]
fn test_every_prefix_of_the_corpus_terminates() {
    for (i, _) in CORPUS.char_indices() {
        let tree = parse(&CORPUS[..i]);
        assert_eq!(tree.root_node().kind(), "source_file");
    }
}

#[test]
fn test_token_soup_terminates_with_error_nodes() {
    let soups = [
        "{{{{{{",
        "))))((((",
        "fn fn fn fn",
        "= = = = ;",
        "require require require",
        "param param param",
        "\" unterminated",
        "#[#[#[",
    ];
    for soup in soups {
        let tree = parse(soup);
        assert_eq!(tree.root_node().kind(), "source_file", "hung on {soup:?}");
    }
}

#[test]
fn test_node_ranges_nest_within_parents() {
    let tree = parse(CORPUS);
    fn check(node: Node<'_>) {
        for child in node.children() {
            assert!(child.start_byte() >= node.start_byte());
            assert!(child.end_byte() <= node.end_byte());
            check(child);
        }
    }
    check(tree.root_node());
}
