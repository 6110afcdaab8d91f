//! Cross-module symbol table.
//!
//! [`SymbolTable::build`] collects every parameter, definition, and local
//! function from a set of [`EquationRecord`]s, builds the co-occurrence
//! [`SymbolGraph`], and records which modules import each symbol from its
//! defining module.

use indexmap::{IndexMap, map::Entry};
use log::{debug, warn};
use serde_json::Value;

use crate::{
    coloring::Coloring,
    color::SymbolColor,
    equation::EquationRecord,
    graph::SymbolGraph,
};

/// The role a symbol plays in a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolRole {
    /// An input of the module.
    Parameter,
    /// A symbol defined by the module.
    Definition,
    /// A function defined locally in the module.
    LocalFunction,
}

impl SymbolRole {
    /// Returns `true` for roles that define the symbol in the module.
    pub fn is_defined(&self) -> bool {
        !matches!(self, SymbolRole::Parameter)
    }
}

/// One (symbol, module, role) entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SymEquationData {
    type_info: Value,
    description: Option<String>,
    module: String,
    role: SymbolRole,
    used_by: Vec<String>,
}

impl SymEquationData {
    fn new(record: &EquationRecord, symbol: &str, role: SymbolRole) -> Self {
        Self {
            type_info: record.type_info(symbol).cloned().unwrap_or(Value::Null),
            description: record.description(symbol).map(str::to_string),
            module: record.name().to_string(),
            role,
            used_by: Vec::new(),
        }
    }

    /// Returns the compiler's type information for the symbol.
    pub fn type_info(&self) -> &Value {
        &self.type_info
    }

    /// Returns the symbol description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the module this entry belongs to.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the role of the symbol in the module.
    pub fn role(&self) -> SymbolRole {
        self.role
    }

    /// Returns `true` if the module defines the symbol rather than taking it
    /// as a parameter.
    pub fn is_defined(&self) -> bool {
        self.role.is_defined()
    }

    /// Returns the modules importing this symbol from [`Self::module`].
    pub fn used_by(&self) -> &[String] {
        &self.used_by
    }
}

/// Everything known about one symbol name across all modules.
#[derive(Debug, Clone, PartialEq)]
pub struct SymData {
    name: String,
    equations: Vec<SymEquationData>,
    color: Option<SymbolColor>,
}

impl SymData {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            equations: Vec::new(),
            color: None,
        }
    }

    /// Returns the symbol name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the per-module entries in discovery order.
    pub fn equations(&self) -> &[SymEquationData] {
        &self.equations
    }

    /// Returns the assigned color, once the table has been colored.
    pub fn color(&self) -> Option<&SymbolColor> {
        self.color.as_ref()
    }
}

/// Symbol table and co-occurrence graph over a set of modules.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, SymData>,
    graph: SymbolGraph,
}

impl SymbolTable {
    /// Builds the table from `records`, in record order.
    ///
    /// # Examples
    ///
    /// ```
    /// use heartdown_core::{equation::EquationRecord, symbol::SymbolTable};
    /// use serde_json::json;
    ///
    /// let record = EquationRecord::new("m")
    ///     .with_parameter("a", json!("scalar"))
    ///     .with_definition("b", json!("scalar"))
    ///     .with_expression("b = a", ["b", "a"]);
    ///
    /// let table = SymbolTable::build([&record]);
    /// assert!(table.graph().contains_edge("a", "b"));
    /// ```
    pub fn build<'a>(records: impl IntoIterator<Item = &'a EquationRecord> + Clone) -> Self {
        let mut table = Self::default();

        for record in records.clone() {
            for parameter in record.parameters() {
                table.insert(record, parameter, SymbolRole::Parameter);
            }
            for definition in record.definitions() {
                table.insert(record, definition, SymbolRole::Definition);
            }
            for function in record.local_functions().keys() {
                table.insert(record, function, SymbolRole::LocalFunction);
            }
            for symbols in record.expressions() {
                table.graph.add_clique(symbols);
            }
        }

        // Usage bookkeeping only; imports never add edges.
        for record in records {
            for dependency in record.dependencies() {
                for name in &dependency.names {
                    let Some(data) = table.symbols.get_mut(name) else {
                        warn!(
                            symbol = name.as_str(),
                            module = record.name(),
                            source = dependency.module.as_str();
                            "Imported symbol is unknown"
                        );
                        continue;
                    };
                    data.equations
                        .iter_mut()
                        .filter(|entry| entry.module == dependency.module)
                        .for_each(|entry| entry.used_by.push(record.name().to_string()));
                }
            }
        }

        debug!(
            symbols = table.symbols.len(),
            nodes = table.graph.len();
            "Symbol table built"
        );
        table
    }

    fn insert(&mut self, record: &EquationRecord, symbol: &str, role: SymbolRole) {
        let entry = SymEquationData::new(record, symbol, role);
        match self.symbols.entry(symbol.to_string()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().equations.push(entry),
            Entry::Vacant(vacant) => {
                vacant.insert(SymData::new(symbol)).equations.push(entry);
            }
        }
        self.graph.add_node(symbol);
    }

    /// Returns the co-occurrence graph.
    pub fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    /// Stores the colors of `coloring` on the matching symbols.
    pub fn apply_coloring(&mut self, coloring: &Coloring) {
        for (name, color) in coloring.iter() {
            if let Some(data) = self.symbols.get_mut(name) {
                data.color = Some(color.clone());
            }
        }
    }

    /// Returns the data of `name`, if known.
    pub fn get(&self, name: &str) -> Option<&SymData> {
        self.symbols.get(name)
    }

    /// Returns every symbol in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SymData> {
        self.symbols.values()
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbol was found.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
