//! Equation compiler data model.
//!
//! The equation compiler itself is an external collaborator. This module
//! defines the shape of what it returns for one module: a [`CompiledUnit`]
//! holding per-dialect [`Frame`]s, the raw-source to compiled-fragment map, and
//! the module's [`EquationRecord`].
//!
//! All types implement [`serde::Deserialize`] so that a compiler running as a
//! separate process can hand its result back as JSON.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output code dialects an equation compiler can produce.
///
/// The declaration order is the order frames are requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Numpy,
    Eigen,
    Latex,
    Mathjax,
    Mathml,
    Matlab,
    MacroMathjax,
}

impl Dialect {
    /// Returns the configuration name of this dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Numpy => "numpy",
            Dialect::Eigen => "eigen",
            Dialect::Latex => "latex",
            Dialect::Mathjax => "mathjax",
            Dialect::Mathml => "mathml",
            Dialect::Matlab => "matlab",
            Dialect::MacroMathjax => "macro_mathjax",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options passed to the equation compiler for every module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileOptions {
    dialects: Vec<Dialect>,
}

impl CompileOptions {
    /// Creates options for the requested dialects.
    ///
    /// [`Dialect::MacroMathjax`] is always included since the spliced document
    /// output is produced in that dialect. Dialects are sorted and deduplicated.
    ///
    /// # Examples
    ///
    /// ```
    /// use heartdown_core::equation::{CompileOptions, Dialect};
    ///
    /// let options = CompileOptions::new([Dialect::Eigen, Dialect::Numpy, Dialect::Eigen]);
    /// assert_eq!(
    ///     options.dialects(),
    ///     [Dialect::Numpy, Dialect::Eigen, Dialect::MacroMathjax]
    /// );
    /// ```
    pub fn new(dialects: impl IntoIterator<Item = Dialect>) -> Self {
        let mut dialects: Vec<Dialect> = dialects.into_iter().collect();
        dialects.push(Dialect::MacroMathjax);
        dialects.sort();
        dialects.dedup();
        Self { dialects }
    }

    /// Returns the requested dialects in request order.
    pub fn dialects(&self) -> &[Dialect] {
        &self.dialects
    }

    /// Returns `true` if `dialect` was requested.
    pub fn requests(&self, dialect: Dialect) -> bool {
        self.dialects.contains(&dialect)
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new([])
    }
}

/// Generated code for one module in one dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    dialect: Option<Dialect>,
    /// Library prelude (includes, imports) emitted once per library file.
    prelude: String,
    /// The module's generated definitions.
    definitions: String,
}

impl Frame {
    /// Creates a frame for `dialect`.
    pub fn new(dialect: Dialect, prelude: impl Into<String>, definitions: impl Into<String>) -> Self {
        Self {
            dialect: Some(dialect),
            prelude: prelude.into(),
            definitions: definitions.into(),
        }
    }

    /// Returns the dialect of this frame, if the compiler reported one.
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }

    /// Returns the library prelude.
    pub fn prelude(&self) -> &str {
        &self.prelude
    }

    /// Returns the generated definitions.
    pub fn definitions(&self) -> &str {
        &self.definitions
    }
}

/// An import of named symbols from another module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// The module the symbols are imported from.
    pub module: String,
    /// The imported symbol names.
    pub names: Vec<String>,
}

impl Dependency {
    /// Creates a dependency on `names` from `module`.
    pub fn new<I, S>(module: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Symbol table and metadata of one compiled module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquationRecord {
    name: String,
    parameters: Vec<String>,
    definitions: Vec<String>,
    /// Local function name to its parameter names.
    local_functions: IndexMap<String, Vec<String>>,
    /// Symbol name to its type information, opaque to this crate.
    symtable: IndexMap<String, Value>,
    descriptions: IndexMap<String, String>,
    dependencies: Vec<Dependency>,
    /// Expression key to the symbols that expression references together.
    expressions: IndexMap<String, Vec<String>>,
    /// Compiled descriptor emitted verbatim into `data.json`.
    descriptor: Map<String, Value>,
}

impl EquationRecord {
    /// Creates an empty record for module `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a parameter with its type information.
    pub fn with_parameter(mut self, name: impl Into<String>, type_info: Value) -> Self {
        let name = name.into();
        self.symtable.insert(name.clone(), type_info);
        self.parameters.push(name);
        self
    }

    /// Adds a locally defined symbol with its type information.
    pub fn with_definition(mut self, name: impl Into<String>, type_info: Value) -> Self {
        let name = name.into();
        self.symtable.insert(name.clone(), type_info);
        self.definitions.push(name);
        self
    }

    /// Adds a local function with its parameter names and type information.
    pub fn with_local_function<I, S>(
        mut self,
        name: impl Into<String>,
        params: I,
        type_info: Value,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        self.symtable.insert(name.clone(), type_info);
        self.local_functions
            .insert(name, params.into_iter().map(Into::into).collect());
        self
    }

    /// Adds an expression referencing `symbols` together.
    pub fn with_expression<I, S>(mut self, key: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expressions
            .insert(key.into(), symbols.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a dependency on another module.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Sets the description of `symbol`.
    pub fn with_description(mut self, symbol: impl Into<String>, text: impl Into<String>) -> Self {
        self.descriptions.insert(symbol.into(), text.into());
        self
    }

    /// Adds a field to the compiled descriptor.
    pub fn with_descriptor_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.descriptor.insert(key.into(), value);
        self
    }

    /// Returns the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the record. The pipeline names records after the module they
    /// were compiled from, whatever the compiler reported.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the parameter names.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns the locally defined symbol names.
    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }

    /// Returns the local function names and their parameters.
    pub fn local_functions(&self) -> &IndexMap<String, Vec<String>> {
        &self.local_functions
    }

    /// Returns the type information of `symbol`, if known.
    pub fn type_info(&self, symbol: &str) -> Option<&Value> {
        self.symtable.get(symbol)
    }

    /// Returns the description of `symbol`, if any.
    pub fn description(&self, symbol: &str) -> Option<&str> {
        self.descriptions.get(symbol).map(String::as_str)
    }

    /// Returns the declared module dependencies.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Returns the symbol lists of every expression.
    pub fn expressions(&self) -> impl Iterator<Item = &[String]> {
        self.expressions.values().map(Vec::as_slice)
    }

    /// Returns the compiled descriptor.
    pub fn descriptor(&self) -> &Map<String, Value> {
        &self.descriptor
    }

    /// Returns every symbol of the module: parameters, then definitions, then
    /// local functions, without duplicates.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        let all = self
            .parameters
            .iter()
            .chain(&self.definitions)
            .chain(self.local_functions.keys());
        for symbol in all {
            if !symbols.contains(&symbol.as_str()) {
                symbols.push(symbol);
            }
        }
        symbols
    }

    /// Adds descriptions for symbols that have none yet.
    ///
    /// Existing descriptions are never overridden. Returns the number of
    /// descriptions added.
    pub fn merge_descriptions<'a>(
        &mut self,
        descriptions: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> usize {
        let mut added = 0;
        for (symbol, text) in descriptions {
            if !self.descriptions.contains_key(symbol) {
                self.descriptions.insert(symbol.to_string(), text.to_string());
                added += 1;
            }
        }
        added
    }
}

/// Everything the equation compiler returns for one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompiledUnit {
    frames: Vec<Frame>,
    /// Raw source substring to its compiled fragment, in compiler order.
    fragments: IndexMap<String, String>,
    /// Text emitted before the fragments of every spliced occurrence.
    pre: String,
    /// Text emitted after the fragments of every spliced occurrence.
    post: String,
    record: EquationRecord,
}

impl CompiledUnit {
    /// Creates a unit around `record` with no frames or fragments.
    pub fn new(record: EquationRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    /// Adds a dialect frame.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Adds a raw source to compiled fragment mapping.
    pub fn with_fragment(mut self, raw: impl Into<String>, compiled: impl Into<String>) -> Self {
        self.fragments.insert(raw.into(), compiled.into());
        self
    }

    /// Sets the text wrapped around spliced fragments.
    pub fn with_wrapping(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre = pre.into();
        self.post = post.into();
        self
    }

    /// Returns the dialect frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the frame produced for `dialect`, if any.
    pub fn frame(&self, dialect: Dialect) -> Option<&Frame> {
        self.frames
            .iter()
            .find(|frame| frame.dialect() == Some(dialect))
    }

    /// Returns the raw to compiled fragment map.
    pub fn fragments(&self) -> &IndexMap<String, String> {
        &self.fragments
    }

    /// Returns the text emitted before spliced fragments.
    pub fn pre(&self) -> &str {
        &self.pre
    }

    /// Returns the text emitted after spliced fragments.
    pub fn post(&self) -> &str {
        &self.post
    }

    /// Returns the module's equation record.
    pub fn record(&self) -> &EquationRecord {
        &self.record
    }

    /// Returns the module's equation record for modification.
    pub fn record_mut(&mut self) -> &mut EquationRecord {
        &mut self.record
    }

    /// Consumes the unit, returning its equation record.
    pub fn into_record(self) -> EquationRecord {
        self.record
    }
}
