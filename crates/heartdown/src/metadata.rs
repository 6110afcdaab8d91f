//! Symbol and equation metadata for the renderer.
//!
//! Two JSON files accompany the processed document: `sym_data.json` maps each
//! symbol to the modules it appears in, and `data.json` lists the compiled
//! descriptor of every module.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use heartdown_core::{equation::EquationRecord, symbol::SymbolTable};

/// File name of the symbol metadata.
pub const SYM_DATA_FILE: &str = "sym_data.json";

/// File name of the equation metadata.
pub const DATA_FILE: &str = "data.json";

/// Strips backticks and doubles backslashes.
///
/// ```
/// use heartdown::metadata::escape;
///
/// assert_eq!(escape(r"`\alpha`"), r"\\alpha");
/// ```
pub fn escape(text: &str) -> String {
    text.replace('`', "").replace('\\', "\\\\")
}

#[derive(Debug, Serialize)]
struct SymRecord<'a> {
    desc: Option<String>,
    type_info: &'a Value,
    def_module: &'a str,
    is_defined: bool,
    used_equations: &'a [String],
    color: Option<String>,
}

/// Serializes symbol tables and equation records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataSerializer;

impl MetadataSerializer {
    /// Renders `sym_data.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized.
    pub fn sym_data(table: &SymbolTable) -> Result<String, serde_json::Error> {
        let symbols: IndexMap<String, Vec<SymRecord<'_>>> = table
            .iter()
            .map(|symbol| {
                let color = symbol.color().map(|color| color.to_css());
                let records = symbol
                    .equations()
                    .iter()
                    .map(|equation| SymRecord {
                        desc: equation.description().map(escape),
                        type_info: equation.type_info(),
                        def_module: equation.module(),
                        is_defined: equation.is_defined(),
                        used_equations: equation.used_by(),
                        color: color.clone(),
                    })
                    .collect();
                (escape(symbol.name()), records)
            })
            .collect();

        serde_json::to_string(&symbols)
    }

    /// Renders `data.json`.
    ///
    /// Each entry starts with the module name followed by the fields of the
    /// module's descriptor. A descriptor field called `name` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized.
    pub fn equation_data<'a>(
        records: impl IntoIterator<Item = &'a EquationRecord>,
    ) -> Result<String, serde_json::Error> {
        let equations: Vec<Value> = records
            .into_iter()
            .map(|record| {
                let mut entry = Map::new();
                entry.insert("name".to_string(), Value::from(record.name()));
                for (key, value) in record.descriptor() {
                    if key != "name" {
                        entry.insert(key.clone(), value.clone());
                    }
                }
                Value::Object(entry)
            })
            .collect();

        let mut root = Map::new();
        root.insert("equations".to_string(), Value::Array(equations));
        serde_json::to_string(&root)
    }
}

#[cfg(test)]
mod tests {
    use heartdown_core::{
        coloring::GraphColorer,
        equation::{Dependency, EquationRecord},
    };
    use serde_json::json;

    use super::*;

    fn table(records: &[EquationRecord]) -> SymbolTable {
        let mut table = SymbolTable::build(records);
        let coloring = GraphColorer::default().color(table.graph());
        table.apply_coloring(&coloring);
        table
    }

    #[test]
    fn test_sym_data() {
        let records = [
            EquationRecord::new("base")
                .with_parameter(r"\alpha", json!({"type": "scalar"}))
                .with_definition("y", json!({"type": "vector"}))
                .with_description(r"\alpha", "step `size`")
                .with_expression("e", [r"\alpha", "y"]),
            EquationRecord::new("user")
                .with_parameter("y", json!(null))
                .with_dependency(Dependency::new("base", ["y"])),
        ];

        let json: Value = serde_json::from_str(&MetadataSerializer::sym_data(&table(&records)).unwrap())
            .unwrap();

        assert_eq!(
            json[r"\\alpha"],
            json!([{
                "desc": "step size",
                "type_info": {"type": "scalar"},
                "def_module": "base",
                "is_defined": false,
                "used_equations": [],
                "color": "red",
            }])
        );
        assert_eq!(json["y"][0]["used_equations"], json!(["user"]));
        assert_eq!(json["y"][1]["desc"], Value::Null);
        assert_eq!(json["y"][0]["color"], json!("YellowGreen"));
    }

    #[test]
    fn test_sym_data_keeps_discovery_order() {
        let records = [EquationRecord::new("m")
            .with_parameter("b", json!(null))
            .with_parameter("a", json!(null))];

        let text = MetadataSerializer::sym_data(&table(&records)).unwrap();

        assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn test_equation_data() {
        let records = [
            EquationRecord::new("first").with_descriptor_field("parameters", json!(["x"])),
            EquationRecord::new("second").with_descriptor_field("name", json!("ignored")),
        ];

        let text = MetadataSerializer::equation_data(&records).unwrap();

        assert_eq!(
            text,
            r#"{"equations":[{"name":"first","parameters":["x"]},{"name":"second"}]}"#
        );
    }
}
