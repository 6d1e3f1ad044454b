//! Multi-file scenarios over on-disk fixtures: closure walking, the
//! require resolution ladder, and the cross-file constant fixpoint.

use jasmin_analysis::require::resolve_require;
use jasmin_analysis::source_map::{NoOpenDocuments, closure};
use jasmin_analysis::uri::path_to_uri;
use jasmin_analysis::{evaluate_constants, extract_references};
use jasmin_cst::Parser;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

fn write(path: &Path, body: &str) -> String {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
    path_to_uri(&fs::canonicalize(path).unwrap()).unwrap()
}

#[test]
fn test_diamond_dependency_is_walked_once() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path().join("shared.jinc").as_path(), "param int S = 1;");
    write(dir.path().join("a.jinc").as_path(), "require \"shared.jinc\"");
    write(dir.path().join("b.jinc").as_path(), "require \"shared.jinc\"");
    let top = write(
        dir.path().join("top.jazz").as_path(),
        "require \"a.jinc\" \"b.jinc\"\nfn f() { }",
    );

    let mut parser = Parser::new();
    let map = closure(&top, &NoOpenDocuments, &mut parser, &FxHashMap::default());
    assert_eq!(map.len(), 4);
}

#[test]
fn test_deep_require_chain() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path().join("f0.jinc").as_path(), "param int END = 0;");
    for i in 1..8 {
        write(
            dir.path().join(format!("f{i}.jinc")).as_path(),
            &format!("require \"f{}.jinc\"", i - 1),
        );
    }
    let root = write(dir.path().join("root.jazz").as_path(), "require \"f7.jinc\"");

    let mut parser = Parser::new();
    let map = closure(&root, &NoOpenDocuments, &mut parser, &FxHashMap::default());
    assert_eq!(map.len(), 9);
}

#[test]
fn test_resolution_ladder_every_rung() {
    // Each case places the target at one rung of the search ladder and
    // expects resolution from `base` to land on it.
    let cases: &[&[&str]] = &[
        &["base", "NS"],
        &["base", "ns"],
        &["NS"],
        &["ns"],
        &["up", "base"], // target at grandparent/NS with base two levels down
    ];
    for (i, segments) in cases.iter().enumerate() {
        let dir = tempfile::tempdir().unwrap();
        let (target_dir, base): (std::path::PathBuf, std::path::PathBuf) = if i == 4 {
            // grandparent case: base = <tmp>/up/base, target = <tmp>/NS
            let base = dir.path().join("up").join("base");
            fs::create_dir_all(&base).unwrap();
            (dir.path().join("NS"), base)
        } else {
            let base = dir.path().join("base");
            fs::create_dir_all(&base).unwrap();
            let mut t = dir.path().to_path_buf();
            for seg in *segments {
                t = t.join(seg);
            }
            // For the parent-rung cases the namespace dir sits beside base.
            (t, base)
        };
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(target_dir.join("x.jinc"), "").unwrap();

        let resolved = resolve_require(&base, Some("NS"), "x.jinc", &FxHashMap::default());
        assert!(resolved.is_some(), "case {i} ({segments:?}) did not resolve");
        assert!(resolved.unwrap().ends_with("x.jinc"));
    }
}

#[test]
fn test_fixpoint_across_files_in_any_order() {
    let dir = tempfile::tempdir().unwrap();
    // A chain of constants spread over files, required in reverse order.
    write(dir.path().join("c0.jinc").as_path(), "param int K0 = 1;");
    for i in 1..6 {
        write(
            dir.path().join(format!("c{i}.jinc")).as_path(),
            &format!("require \"c{}.jinc\"\nparam int K{i} = K{} * 2;", i - 1, i - 1),
        );
    }
    let root = write(dir.path().join("root.jazz").as_path(), "require \"c5.jinc\"");

    let mut parser = Parser::new();
    let map = closure(&root, &NoOpenDocuments, &mut parser, &FxHashMap::default());
    let env = evaluate_constants(&map);
    for i in 0..6 {
        assert_eq!(env.get(&format!("K{i}")), Some(&(1i64 << i)), "K{i}");
    }
}

#[test]
fn test_namespace_ids_are_not_references() {
    let src = "from Common require \"types.jinc\"\nfn f() { reg u64 v; v = Common; }";
    let mut parser = Parser::new();
    let tree = parser.parse(src).unwrap();
    let refs = extract_references(&tree, src, "file:///t.jazz");
    // Only the expression use counts, not the `from` id.
    assert_eq!(refs.iter().filter(|r| r.name == "Common").count(), 1);
}

#[test]
fn test_closure_prefers_provider_content_over_disk() {
    use jasmin_analysis::source_map::DocumentProvider;
    use jasmin_cst::Tree;

    let dir = tempfile::tempdir().unwrap();
    let root = write(dir.path().join("root.jazz").as_path(), "param int N = 1;");

    struct OneDoc {
        uri: String,
        text: String,
        tree: Option<Tree>,
    }
    impl DocumentProvider for OneDoc {
        fn document(&self, uri: &str) -> Option<(&str, Option<&Tree>)> {
            (uri == self.uri).then_some((self.text.as_str(), self.tree.as_ref()))
        }
    }

    let mut parser = Parser::new();
    let edited = "param int N = 2;".to_string();
    let provider =
        OneDoc { uri: root.clone(), tree: parser.parse(&edited), text: edited };

    let map = closure(&root, &provider, &mut parser, &FxHashMap::default());
    let env = evaluate_constants(&map);
    // The unsaved editor content wins over what is on disk.
    assert_eq!(env.get("N"), Some(&2));
}
