use walkdir::WalkDir;

#[test]
fn testdata_corpus_parses_clean() {
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata");
    let mut total = 0usize;

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("lark") {
            continue;
        }

        total += 1;
        let src = std::fs::read(path).unwrap();
        let parsed = lark_parser::parse(&src);

        if !parsed.errors.is_empty() {
            for err in parsed.errors.iter().take(8) {
                eprintln!("  {}:{}: {}", err.pos.line + 1, err.pos.column + 1, err.message);
            }
            panic!("FAILED: {}", path.display());
        }
        assert!(!parsed.file.nodes.is_empty() || src.is_empty(), "{}", path.display());
    }

    assert!(total >= 3, "expected at least 3 corpus files, found {total}");
}
