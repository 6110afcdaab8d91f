//! CLI logic for the Heartdown document processor.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::info;

use heartdown::{
    DocumentProcessor, HeartdownError, artifacts::ArtifactWriter, compiler::CommandCompiler,
};
use heartdown_parser::DirLoader;

/// Run the Heartdown CLI application
///
/// Processes the input document and writes the rendered Markdown to the
/// output file, or to standard output when none is given. Module files are
/// resolved relative to the input's directory.
///
/// # Errors
///
/// Returns `HeartdownError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Front matter and module source errors
/// - Compiler failures
pub fn run(args: &Args) -> Result<(), HeartdownError> {
    info!(input_path = args.input, output_path:? = args.output; "Processing document");

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let input_dir = input_dir(Path::new(&args.input));
    let artifact_dir = args
        .artifacts
        .as_ref()
        .map_or_else(|| input_dir.clone(), PathBuf::from);

    let compiler = CommandCompiler::new(
        app_config.compiler().program(),
        app_config.compiler().args().to_vec(),
    );
    let loader = DirLoader::new(input_dir);
    let processor =
        DocumentProcessor::new(app_config, &compiler, &loader, ArtifactWriter::new(artifact_dir));

    let document = processor.process(&source)?;
    let rendered = document.render();

    match &args.output {
        Some(output) => {
            fs::write(output, rendered)?;
            info!(output_file = output; "Document written");
        }
        None => io::stdout().lock().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
