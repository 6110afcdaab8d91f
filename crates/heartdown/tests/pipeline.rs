use std::{cell::RefCell, fs};

use heartdown::{
    DocumentProcessor, HeartdownError,
    artifacts::ArtifactWriter,
    compiler::{CompileError, EquationCompiler},
    config::{AppConfig, ColoringConfig, CompilerConfig, DocumentConfig, OutputConfig},
    equation::{CompileOptions, CompiledUnit, Dialect, EquationRecord, Frame},
};
use heartdown_parser::DirLoader;
use serde_json::{Value, json};

/// Compiles every module into the same symbols and maps each known
/// statement to a marker.
#[derive(Default)]
struct FakeCompiler {
    calls: RefCell<Vec<(String, String)>>,
}

impl EquationCompiler for FakeCompiler {
    fn compile(
        &self,
        module: &str,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompiledUnit, CompileError> {
        self.calls
            .borrow_mut()
            .push((module.to_string(), source.to_string()));
        if source.contains("fail") {
            return Err(CompileError::Rejected("unknown symbol `fail`".to_string()));
        }

        let record = EquationRecord::new("ignored")
            .with_parameter("A", json!({"type": "matrix"}))
            .with_parameter("x", json!({"type": "vector"}))
            .with_parameter("b", json!({"type": "vector"}))
            .with_definition("r", json!({"type": "vector"}))
            .with_description("b", "the target")
            .with_expression("r = A x - b", ["r", "A", "x", "b"])
            .with_descriptor_field("parameters", json!(["A", "x", "b"]));

        let mut unit = CompiledUnit::new(record).with_wrapping("<", ">");
        for (raw, compiled) in [("r = A x - b", "R"), ("A ∈ ℝ^(m×n)", "DEF")] {
            if source.contains(raw) {
                unit = unit.with_fragment(raw, compiled);
            }
        }
        if options.requests(Dialect::Numpy) {
            unit = unit.with_frame(Frame::new(
                Dialect::Numpy,
                "import numpy as np\n",
                format!("class {module}: pass"),
            ));
        }
        Ok(unit)
    }
}

const DOCUMENT: &str = "---
title: Demo
---
❤: lsq
Minimize ❤r = A x - b❤ where
<span class=\"def:A\">the matrix $ A $</span> is known and $ x $ is free.

```iheartla
r = A x - b
where
A ∈ ℝ^(m×n)
```
";

fn config(dialects: Vec<Dialect>, append_references: bool) -> AppConfig {
    AppConfig::new(
        CompilerConfig::new("unused", Vec::new(), dialects),
        OutputConfig::default(),
        ColoringConfig::default(),
        DocumentConfig::new(append_references),
    )
}

#[test]
fn test_process_document() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let compiler = FakeCompiler::default();
    let loader = DirLoader::new(dir.path());
    let processor = DocumentProcessor::new(
        config(vec![Dialect::Numpy], true),
        &compiler,
        &loader,
        ArtifactWriter::new(dir.path()),
    );

    let document = processor.process(DOCUMENT).expect("Failed to process");
    let rendered = document.render();

    assert_eq!(
        document.front_matter().get("title"),
        Some(&Value::from("Demo"))
    );
    assert!(rendered.starts_with("\nMinimize <span class='equation' code_block=\"lsq\">$<R>$</span> where"));
    assert!(rendered.contains(
        "<span sym='A' context='lsq'>  the matrix $ {\\prosedeflabel{lsq}{{A}}} $  </span>"
    ));
    assert!(rendered.contains("and $ {\\proselabel{lsq}{{x}}} $ is free."));
    assert!(rendered.contains(
        "\n<div class='equation' code_block=\"lsq\">\n$$<DEF>$$</div>\n"
    ));
    assert!(!rendered.contains("❤"));
    assert!(rendered.ends_with("\n# REFERENCE\n"));
    assert_eq!(document.substitutions().len(), 2);

    let calls = compiler.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "r = A x - b\nr = A x - b\nwhere\nA ∈ ℝ^(m×n)\n");

    let record = &document.records()[0];
    assert_eq!(record.name(), "lsq");
    assert_eq!(record.description("A"), Some(" the matrix $ A $ "));
    assert_eq!(record.description("b"), Some("the target"));

    let colors: Vec<_> = document
        .symbols()
        .iter()
        .filter_map(|symbol| symbol.color().map(|color| color.name().to_string()))
        .collect();
    assert_eq!(colors.len(), 4);
    let mut distinct = colors.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 4);

    let source = fs::read_to_string(dir.path().join("lsq.ihla")).expect("Missing module source");
    assert_eq!(source, calls[0].1);
    let library = fs::read_to_string(dir.path().join("lib.py")).expect("Missing library");
    assert_eq!(library, "import numpy as np\nclass lsq: pass\n");
    assert!(!dir.path().join("lib.h").exists());

    let sym_data: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("sym_data.json")).expect("Missing sym_data.json"),
    )
    .expect("Invalid sym_data.json");
    assert_eq!(sym_data["A"][0]["desc"], json!(" the matrix $ A $ "));
    assert_eq!(sym_data["r"][0]["is_defined"], json!(true));

    let data: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("data.json")).expect("Missing data.json"),
    )
    .expect("Invalid data.json");
    assert_eq!(
        data,
        json!({"equations": [{"name": "lsq", "parameters": ["A", "x", "b"]}]})
    );
}

#[test]
fn test_full_paper_false_skips_references() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let compiler = FakeCompiler::default();
    let loader = DirLoader::new(dir.path());
    let processor = DocumentProcessor::new(
        config(Vec::new(), true),
        &compiler,
        &loader,
        ArtifactWriter::new(dir.path()),
    );

    let document = processor
        .process("---\nfull_paper: false\n---\nText.\n")
        .expect("Failed to process");

    assert_eq!(document.render(), "Text.\n");
    assert!(document.records().is_empty());
}

#[test]
fn test_module_loaded_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("model.ihla"), "A ∈ ℝ^(m×n)").expect("Failed to write module");
    let compiler = FakeCompiler::default();
    let loader = DirLoader::new(dir.path());
    let processor = DocumentProcessor::new(
        config(Vec::new(), false),
        &compiler,
        &loader,
        ArtifactWriter::new(dir.path()),
    );

    let document = processor
        .process("```iheartla(model.ihla)\n```\n")
        .expect("Failed to process");

    assert_eq!(
        document.render(),
        "\n<div class='equation' code_block=\"model.ihla\">\n$$<DEF>$$</div>\n\n"
    );
    assert!(dir.path().join("model.ihla.ihla").exists());
}

#[test]
fn test_crlf_document() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let compiler = FakeCompiler::default();
    let loader = DirLoader::new(dir.path());
    let processor = DocumentProcessor::new(
        config(Vec::new(), false),
        &compiler,
        &loader,
        ArtifactWriter::new(dir.path()),
    );

    let document = processor
        .process("❤: lsq\r\n```iheartla\r\nA ∈ ℝ^(m×n)\r\n```\r\n")
        .expect("Failed to process");

    assert_eq!(
        document.render(),
        "\n\n<div class='equation' code_block=\"lsq\">\n$$<DEF>$$</div>\n\n"
    );
    assert_eq!(compiler.calls.borrow()[0].1, "A ∈ ℝ^(m×n)\n");
}

#[test]
fn test_compile_failure() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let compiler = FakeCompiler::default();
    let loader = DirLoader::new(dir.path());
    let processor = DocumentProcessor::new(
        config(Vec::new(), true),
        &compiler,
        &loader,
        ArtifactWriter::new(dir.path()),
    );

    let err = processor
        .process("❤: m\n❤fail❤\n")
        .expect_err("Compilation should fail");

    match err {
        HeartdownError::Compile { module, message } => {
            assert_eq!(module, "m");
            assert_eq!(message, "unknown symbol `fail`");
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_palette() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let compiler = FakeCompiler::default();
    let loader = DirLoader::new(dir.path());
    let config = AppConfig::new(
        CompilerConfig::default(),
        OutputConfig::default(),
        ColoringConfig::new(Some(vec!["no-such-color".to_string()])),
        DocumentConfig::default(),
    );
    let processor =
        DocumentProcessor::new(config, &compiler, &loader, ArtifactWriter::new(dir.path()));

    assert!(matches!(
        processor.process("text"),
        Err(HeartdownError::Config(_))
    ));
}
