//! Grouping equation blocks into modules.
//!
//! Every block names the module it contributes to. Blocks of one module are
//! compiled together, so their code is collected in document order. A block
//! with a file-like module name and no code pulls its code from that file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info};
use thiserror::Error;

use crate::{
    blocks::{BlockKind, RawBlock, scan_blocks},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Error returned by a [`SourceLoader`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{0}` is not a loadable source")]
    Unsupported(String),
}

/// Loads the code of blocks that refer to a source file.
pub trait SourceLoader {
    /// Returns the content of `reference`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the reference cannot be read.
    fn load(&self, reference: &str) -> Result<String, LoadError>;
}

/// Resolves references relative to a directory.
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceLoader for DirLoader {
    fn load(&self, reference: &str) -> Result<String, LoadError> {
        let path = self.root.join(reference);
        debug!(path:? = path; "Loading module source");
        fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
    }
}

/// One block contributing to a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOccurrence {
    raw: String,
    payload: String,
    kind: BlockKind,
    span: Span,
    payload_offset: Option<usize>,
}

impl BlockOccurrence {
    /// Returns the block as written in the document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the code the block contributes.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Returns the span of the block in the document.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the document offset of the payload, or `None` if it was
    /// loaded from a file.
    pub fn payload_offset(&self) -> Option<usize> {
        self.payload_offset
    }
}

/// The blocks of one module, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    occurrences: Vec<BlockOccurrence>,
}

impl Module {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            occurrences: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn occurrences(&self) -> &[BlockOccurrence] {
        &self.occurrences
    }

    /// Returns the compilation source: the payloads joined by newlines.
    pub fn source(&self) -> String {
        self.occurrences
            .iter()
            .map(BlockOccurrence::payload)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Groups the equation blocks of a document by module.
pub struct BlockAggregator<'l> {
    loader: &'l dyn SourceLoader,
}

impl<'l> BlockAggregator<'l> {
    pub fn new(loader: &'l dyn SourceLoader) -> Self {
        Self { loader }
    }

    /// Scans `text` for equation blocks and groups them by module, in
    /// first-seen order.
    ///
    /// Blocks without a module or without code are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] with an [`ErrorCode::E200`] diagnostic for
    /// every block whose source file cannot be loaded. A file that failed
    /// before is not loaded again, and its diagnostic points back at the
    /// first block that referenced it.
    pub fn aggregate(&self, text: &str) -> Result<IndexMap<String, Module>, ParseError> {
        let mut collector = DiagnosticCollector::new();
        let mut modules: IndexMap<String, Module> = IndexMap::new();
        let mut failed: IndexMap<&str, Span> = IndexMap::new();

        for block in scan_blocks(text) {
            if let Some(occurrence) = self.occurrence(text, &block, &mut failed, &mut collector) {
                modules
                    .entry(block.module.to_string())
                    .or_insert_with(|| Module::new(block.module))
                    .occurrences
                    .push(occurrence);
            }
        }
        collector.finish()?;

        info!(modules = modules.len(); "Equation blocks aggregated");
        Ok(modules)
    }

    fn occurrence<'a>(
        &self,
        text: &str,
        block: &RawBlock<'a>,
        failed: &mut IndexMap<&'a str, Span>,
        collector: &mut DiagnosticCollector,
    ) -> Option<BlockOccurrence> {
        if block.module.is_empty() {
            collector.emit(
                Diagnostic::warning(format!("{} block without a module is skipped", block.kind))
                    .with_code(ErrorCode::E201)
                    .with_label(block.span, "no module")
                    .with_help("name the module or place the block after a context marker"),
            );
            return None;
        }

        let (payload, payload_offset) = if is_file_reference(block) {
            if let Some(&first) = failed.get(block.module) {
                collector.emit(
                    Diagnostic::error(format!("cannot load module `{}`", block.module))
                        .with_code(ErrorCode::E200)
                        .with_label(block.span, "unreadable module file")
                        .with_secondary_label(first, "first referenced here"),
                );
                return None;
            }

            match self.loader.load(block.module) {
                Ok(source) => (source, None),
                Err(err) => {
                    failed.insert(block.module, block.span);
                    collector.emit(
                        Diagnostic::error(format!("cannot load module `{}`", block.module))
                            .with_code(ErrorCode::E200)
                            .with_label(block.span, err.to_string()),
                    );
                    return None;
                }
            }
        } else {
            (block.code.to_string(), Some(block.code_span.start()))
        };

        if payload.is_empty() {
            collector.emit(
                Diagnostic::warning(format!("block of module `{}` has no code", block.module))
                    .with_code(ErrorCode::E202)
                    .with_label(block.span, "empty block"),
            );
            return None;
        }

        Some(BlockOccurrence {
            raw: text[block.span.range()].to_string(),
            payload,
            kind: block.kind,
            span: block.span,
            payload_offset,
        })
    }
}

fn is_file_reference(block: &RawBlock<'_>) -> bool {
    (block.module.contains('.') || block.module.contains('/')) && block.code.trim().is_empty()
}
