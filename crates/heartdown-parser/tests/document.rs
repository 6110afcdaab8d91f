use heartdown_parser::{
    BlockAggregator, BlockKind, ContextResolver, DirLoader, ErrorCode, process_definitions,
    split_front_matter,
};
use indexmap::IndexMap;

const DOCUMENT: &str = "---
title: Least squares
---
# Least squares

❤: lsq
The residual ❤r = A x - b❤ is minimized, where
<span class=\"def:A\">the design matrix $ A $</span> is given.

```iheartla
r = A x - b
A ∈ ℝ^(m×n)
```

❤: other
Unrelated ❤q = 1❤.
";

#[test]
fn test_document_passes() {
    let document = split_front_matter(DOCUMENT).expect("Failed to split front matter");
    assert_eq!(
        document.front_matter.get("title").and_then(|v| v.as_str()),
        Some("Least squares")
    );

    let text = ContextResolver::contextualize(document.body);
    assert!(text.contains("❤ lsq:r = A x - b❤"));
    assert!(text.contains("```iheartla(lsq)\n"));
    assert!(text.contains("<span class=\"def:lsq:A\">"));

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let loader = DirLoader::new(dir.path());
    let modules = BlockAggregator::new(&loader)
        .aggregate(&text)
        .expect("Failed to aggregate");

    let names: Vec<_> = modules.keys().map(String::as_str).collect();
    assert_eq!(names, ["lsq", "other"]);

    let kinds: Vec<_> = modules["lsq"]
        .occurrences()
        .iter()
        .map(|occurrence| occurrence.kind())
        .collect();
    assert_eq!(kinds, [BlockKind::Inline, BlockKind::Fenced]);
    assert_eq!(
        modules["lsq"].source(),
        "r = A x - b\nr = A x - b\nA ∈ ℝ^(m×n)\n"
    );

    let (text, descriptions) = process_definitions(&text);
    assert_eq!(
        descriptions.descriptions("lsq").collect::<Vec<_>>(),
        [("A", " the design matrix $ A $ ")]
    );
    assert!(text.contains(r"$ {\prosedeflabel{lsq}{{A}}} $"));

    let symbols: IndexMap<String, Vec<String>> =
        IndexMap::from([("lsq".to_string(), vec!["A".to_string(), "x".to_string()])]);
    let annotated = ContextResolver::annotate(&text, &symbols);
    assert!(!annotated.contains("❤: lsq"));
    assert!(!annotated.contains("❤: other"));
}

#[test]
fn test_crlf_document() {
    let text = ContextResolver::contextualize("❤: m\r\n```iheartla\r\nx = 1\r\n```\r\n");
    assert!(text.contains("```iheartla(m)\r\n"));

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let loader = DirLoader::new(dir.path());
    let modules = BlockAggregator::new(&loader)
        .aggregate(&text)
        .expect("Failed to aggregate");

    let names: Vec<_> = modules.keys().map(String::as_str).collect();
    assert_eq!(names, ["m"]);
    assert_eq!(modules["m"].source(), "x = 1\r\n");
}

#[test]
fn test_missing_module_file_is_reported() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let loader = DirLoader::new(dir.path());

    let err = BlockAggregator::new(&loader)
        .aggregate("```iheartla(missing.ihla)\n```\n")
        .unwrap_err();

    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E200));
    assert_eq!(diagnostic.labels()[0].span().start(), 0);
}

#[test]
fn test_demo_document() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos/least_squares.md");
    let source = std::fs::read_to_string(&path).expect("Failed to read demo document");

    let document = split_front_matter(&source).expect("Failed to split front matter");
    let text = ContextResolver::contextualize(document.body);
    let loader = DirLoader::new(path.parent().expect("Demo has a parent directory"));
    let modules = BlockAggregator::new(&loader)
        .aggregate(&text)
        .expect("Failed to aggregate");

    let names: Vec<_> = modules.keys().map(String::as_str).collect();
    assert_eq!(names, ["lsq", "ridge"]);
    assert_eq!(modules["lsq"].occurrences().len(), 3);
    assert_eq!(modules["ridge"].occurrences().len(), 1);
}
