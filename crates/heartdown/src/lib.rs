//! Heartdown - Markdown documents with live equations.
//!
//! Heartdown processes Markdown that embeds equation blocks. Blocks are
//! grouped by module and compiled by an external equation compiler, the
//! compiled markup replaces the blocks, prose mentioning equation symbols is
//! labeled, and every symbol gets a color distinct from the symbols it shares
//! an equation with.

pub mod artifacts;
pub mod compiler;
pub mod config;
pub mod library;
pub mod metadata;
pub mod splice;
pub mod stash;

mod error;

pub use heartdown_core::{color, coloring, equation, graph, symbol};
pub use heartdown_parser::{FrontMatter, SourceLoader};

pub use error::HeartdownError;

use indexmap::IndexMap;
use log::{debug, info};

use heartdown_core::{coloring::GraphColorer, equation::EquationRecord, symbol::SymbolTable};
use heartdown_parser::{
    BlockAggregator, ContextResolver, Span, process_definitions,
    references::append_references_heading, split_front_matter,
};

use artifacts::ArtifactWriter;
use compiler::EquationCompiler;
use config::AppConfig;
use metadata::{DATA_FILE, MetadataSerializer, SYM_DATA_FILE};
use splice::Substitution;
use stash::Stash;

/// Runs the document pipeline.
///
/// # Examples
///
/// ```rust,no_run
/// use heartdown::{
///     DocumentProcessor, artifacts::ArtifactWriter, compiler::CommandCompiler,
///     config::AppConfig,
/// };
/// use heartdown_parser::DirLoader;
///
/// let config = AppConfig::default();
/// let compiler = CommandCompiler::new(config.compiler().program(), config.compiler().args().to_vec());
/// let loader = DirLoader::new("docs");
///
/// let processor = DocumentProcessor::new(config, &compiler, &loader, ArtifactWriter::new("docs"));
/// let document = processor
///     .process("❤: model\nwhere ❤y = A x❤\n")
///     .expect("Failed to process");
///
/// println!("{}", document.render());
/// ```
pub struct DocumentProcessor<'a> {
    config: AppConfig,
    compiler: &'a dyn EquationCompiler,
    loader: &'a dyn SourceLoader,
    artifacts: ArtifactWriter,
}

impl<'a> DocumentProcessor<'a> {
    /// Create a processor.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `compiler` - Compiles the code of each module
    /// * `loader` - Resolves blocks that refer to module files
    /// * `artifacts` - Receives module sources, library files and metadata
    pub fn new(
        config: AppConfig,
        compiler: &'a dyn EquationCompiler,
        loader: &'a dyn SourceLoader,
        artifacts: ArtifactWriter,
    ) -> Self {
        Self {
            config,
            compiler,
            loader,
            artifacts,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Process a document.
    ///
    /// Line endings are normalized to `\n` first.
    ///
    /// Artifacts are written as the pipeline reaches them, so a failing run
    /// may leave the ones written before the failure behind.
    ///
    /// # Errors
    ///
    /// Returns `HeartdownError` for invalid front matter, unloadable module
    /// files, compiler failures, an invalid palette, or artifact I/O errors.
    pub fn process(&self, source: &str) -> Result<ProcessedDocument, HeartdownError> {
        info!(bytes = source.len(); "Processing document");
        let source = normalize_line_endings(source);
        let source = source.as_str();
        let palette = self
            .config
            .coloring()
            .palette()
            .map_err(|err| HeartdownError::Config(err.to_string()))?;

        let document =
            split_front_matter(source).map_err(|err| HeartdownError::new_parse_error(err, source))?;

        let mut text = ContextResolver::contextualize(document.body);
        if self.config.document().append_references()
            && document.front_matter.full_paper()
            && append_references_heading(&mut text)
        {
            debug!("References heading appended");
        }

        let modules = BlockAggregator::new(self.loader)
            .aggregate(&text)
            .map_err(|err| HeartdownError::new_parse_error(err, text.as_str()))?;

        let extension = self.config.output().source_extension();
        for (name, module) in &modules {
            self.artifacts.write_source(name, extension, &module.source())?;
        }

        let options = self.config.compiler().compile_options();
        let mut units = IndexMap::with_capacity(modules.len());
        for (name, module) in &modules {
            let mut unit = self
                .compiler
                .compile(name, &module.source(), &options)
                .map_err(|err| HeartdownError::Compile {
                    module: name.clone(),
                    message: err.to_string(),
                })?;
            unit.record_mut().set_name(name.as_str());
            units.insert(name.clone(), unit);
        }
        info!(modules = units.len(); "Modules compiled");

        for file in library::library_files(units.values(), &options) {
            self.artifacts.write(file.name, &file.content)?;
        }

        let mut stash = Stash::new();
        let spliced = splice::splice(&text, &modules, &units, &mut stash);

        let (text, descriptions) = process_definitions(&spliced.text);
        for context in descriptions.contexts() {
            if let Some(unit) = units.get_mut(context) {
                let added = unit
                    .record_mut()
                    .merge_descriptions(descriptions.descriptions(context));
                debug!(module = context, added; "Span descriptions merged");
            }
        }

        let records: Vec<EquationRecord> =
            units.into_values().map(|unit| unit.into_record()).collect();
        let mut symbols = SymbolTable::build(&records);
        let coloring = GraphColorer::new(palette).color(symbols.graph());
        symbols.apply_coloring(&coloring);

        self.artifacts
            .write(SYM_DATA_FILE, &MetadataSerializer::sym_data(&symbols)?)?;
        self.artifacts
            .write(DATA_FILE, &MetadataSerializer::equation_data(&records)?)?;

        let lookup: IndexMap<String, Vec<String>> = records
            .iter()
            .map(|record| {
                let names = record.symbols().into_iter().map(str::to_string).collect();
                (record.name().to_string(), names)
            })
            .collect();
        let text = ContextResolver::annotate(&text, &lookup);

        info!(symbols = symbols.len(), colors = coloring.distinct_colors(); "Document processed");
        Ok(ProcessedDocument {
            text,
            stash,
            substitutions: spliced.substitutions,
            front_matter: document.front_matter,
            symbols,
            records,
        })
    }
}

/// Turns `\r\n` and lone `\r` line endings into `\n`.
fn normalize_line_endings(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// The result of [`DocumentProcessor::process`].
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    text: String,
    stash: Stash,
    substitutions: IndexMap<Span, Substitution>,
    front_matter: FrontMatter,
    symbols: SymbolTable,
    records: Vec<EquationRecord>,
}

impl ProcessedDocument {
    /// Returns the processed text with equation placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the processed text with the spliced equations restored.
    pub fn render(&self) -> String {
        self.stash.restore(&self.text)
    }

    /// Returns the stash holding the spliced equations.
    pub fn stash(&self) -> &Stash {
        &self.stash
    }

    /// Returns the replaced blocks, keyed by their span in the
    /// contextualized document.
    pub fn substitutions(&self) -> &IndexMap<Span, Substitution> {
        &self.substitutions
    }

    /// Returns the document's front matter.
    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    /// Returns the colored symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Returns the equation record of every module, in compile order.
    pub fn records(&self) -> &[EquationRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
