//! YAML front matter.
//!
//! A document may start with a `---` line followed by YAML and a closing
//! `---` or `...` line. The YAML is converted to JSON values so that the rest
//! of the pipeline handles metadata uniformly.

use log::debug;
use serde_json::{Map, Value};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Parsed front matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Map<String, Value>,
}

impl FrontMatter {
    /// Returns the value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns all fields in document order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns `true` unless the document opts out with a falsy `full_paper`:
    /// `false`, `null`, zero, or an empty string, sequence or mapping.
    pub fn full_paper(&self) -> bool {
        self.get("full_paper").is_none_or(is_truthy)
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// A document split into front matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
    /// Byte offset of the body in the full text.
    pub body_offset: usize,
}

/// Splits the front matter off `text`.
///
/// Text without a leading `---` line, or without a closing line, has no
/// front matter and is returned whole as the body.
///
/// # Errors
///
/// Returns a [`ParseError`] with [`ErrorCode::E100`] when the YAML is invalid.
///
/// ```
/// use heartdown_parser::front_matter::split_front_matter;
///
/// let doc = split_front_matter("---\ntitle: Notes\nfull_paper: false\n---\n# Body\n").unwrap();
/// assert_eq!(doc.body, "# Body\n");
/// assert!(!doc.front_matter.full_paper());
/// ```
pub fn split_front_matter(text: &str) -> Result<Document<'_>, ParseError> {
    let Some((yaml_span, body_offset)) = locate(text) else {
        return Ok(Document {
            front_matter: FrontMatter::default(),
            body: text,
            body_offset: 0,
        });
    };

    let yaml = &text[yaml_span.range()];
    let mut collector = DiagnosticCollector::new();
    let parsed = if yaml.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_yaml::from_str::<Value>(yaml)
    };
    let fields = match parsed {
        Ok(Value::Object(fields)) => fields,
        Ok(Value::Null) => Map::new(),
        Ok(_) => {
            collector.emit(
                Diagnostic::warning("front matter is not a mapping and is ignored")
                    .with_code(ErrorCode::E101)
                    .with_label(yaml_span, "expected `key: value` lines"),
            );
            Map::new()
        }
        Err(err) => {
            collector.emit(
                Diagnostic::error("invalid front matter")
                    .with_code(ErrorCode::E100)
                    .with_label(yaml_span, err.to_string())
                    .with_help("the block between the leading `---` lines must be YAML"),
            );
            Map::new()
        }
    };
    collector.finish()?;

    debug!(fields = fields.len(); "Front matter parsed");
    Ok(Document {
        front_matter: FrontMatter { fields },
        body: &text[body_offset..],
        body_offset,
    })
}

/// Returns the span of the YAML and the offset of the body.
fn locate(text: &str) -> Option<(Span, usize)> {
    let text_start = text.strip_prefix('\u{feff}').map_or(0, |_| '\u{feff}'.len_utf8());
    let mut lines = text[text_start..].split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = text_start + first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((Span::new(yaml_start..offset), offset + line.len()));
        }
        offset += line.len();
    }
    None
}
