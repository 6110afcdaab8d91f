//! Configuration types for Heartdown document processing.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs the settings it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`CompilerConfig`] - The external equation compiler and requested dialects.
//! - [`OutputConfig`] - Naming of generated artifacts.
//! - [`ColoringConfig`] - The palette used to color symbols.
//! - [`DocumentConfig`] - Document-level rewrites.
//!
//! # Example
//!
//! ```
//! # use heartdown::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.output().source_extension(), "ihla");
//! assert!(config.coloring().palette().is_ok());
//! ```

use serde::Deserialize;

use heartdown_core::{
    color::{Palette, PaletteError},
    equation::{CompileOptions, Dialect},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    compiler: CompilerConfig,

    #[serde(default)]
    output: OutputConfig,

    #[serde(default)]
    coloring: ColoringConfig,

    #[serde(default)]
    document: DocumentConfig,
}

impl AppConfig {
    /// Creates a configuration from its sections.
    pub fn new(
        compiler: CompilerConfig,
        output: OutputConfig,
        coloring: ColoringConfig,
        document: DocumentConfig,
    ) -> Self {
        Self {
            compiler,
            output,
            coloring,
            document,
        }
    }

    /// Returns the compiler configuration.
    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the coloring configuration.
    pub fn coloring(&self) -> &ColoringConfig {
        &self.coloring
    }

    /// Returns the document configuration.
    pub fn document(&self) -> &DocumentConfig {
        &self.document
    }
}

/// The external equation compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Program run once per module.
    program: String,

    /// Arguments passed to `program`.
    args: Vec<String>,

    /// Code dialects to generate library files for.
    dialects: Vec<Dialect>,
}

impl CompilerConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>, dialects: Vec<Dialect>) -> Self {
        Self {
            program: program.into(),
            args,
            dialects,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dialects(&self) -> &[Dialect] {
        &self.dialects
    }

    /// Returns the options every module is compiled with.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::new(self.dialects.iter().copied())
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "iheartla".to_string(),
            args: vec!["--json".to_string()],
            dialects: Vec::new(),
        }
    }
}

/// Naming of generated artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of the per-module source files.
    source_extension: String,
}

impl OutputConfig {
    pub fn new(source_extension: impl Into<String>) -> Self {
        Self {
            source_extension: source_extension.into(),
        }
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new("ihla")
    }
}

/// Symbol coloring.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ColoringConfig {
    /// CSS color names, in the order they are introduced.
    #[serde(default)]
    palette: Option<Vec<String>>,
}

impl ColoringConfig {
    pub fn new(palette: Option<Vec<String>>) -> Self {
        Self { palette }
    }

    /// Returns the configured palette, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured palette is empty or names a
    /// color that is not a CSS color.
    pub fn palette(&self) -> Result<Palette, PaletteError> {
        match &self.palette {
            Some(names) => Palette::new(names.iter().cloned()),
            None => Ok(Palette::default()),
        }
    }
}

/// Document-level rewrites.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Append a references heading to documents that lack one.
    append_references: bool,
}

impl DocumentConfig {
    pub fn new(append_references: bool) -> Self {
        Self { append_references }
    }

    pub fn append_references(&self) -> bool {
        self.append_references
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self::new(true)
    }
}
