//! Definition spans.
//!
//! Prose may describe symbols with a highlighted span:
//! `<span class="def:ctx:a;b">description</span>`. The context part may be
//! left out by the author, in which case it is filled in from the enclosing
//! segment. Once every span carries a context, the descriptions are collected
//! per context and each span is rewritten into the
//! `<span sym='a;b' context='ctx'> description </span>` form consumed by the
//! renderer, with the described symbols labeled as definitions in the math
//! of the description.

use indexmap::IndexMap;
use log::debug;
use winnow::{
    Parser as _,
    combinator::{fail, opt, preceded},
    token::{literal, one_of, take_until, take_while},
};

use crate::{
    label::{LabelKind, label_math},
    scan::{IResult, Input, anywhere, find_all, replace_found},
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawDefinition<'a> {
    context: Option<&'a str>,
    symbols: &'a str,
    description: &'a str,
}

impl RawDefinition<'_> {
    fn symbol_list(&self) -> Vec<&str> {
        self.symbols.split(';').collect()
    }
}

fn is_symbol_list_char(c: char) -> bool {
    !matches!(c, ':' | '>' | '\'' | '"')
}

fn is_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// `<span class="def:[ctx:]syms">description</span>`, either quote style.
fn definition_span<'a>(input: &mut Input<'a>) -> IResult<RawDefinition<'a>> {
    literal("<span class=").parse_next(input)?;
    let mut quote = one_of(['"', '\'']).parse_next(input)?;
    literal("def:").parse_next(input)?;
    let first = take_while(0.., is_symbol_list_char).parse_next(input)?;
    let second = opt(preceded(':', take_while(0.., is_symbol_list_char))).parse_next(input)?;
    quote.parse_next(input)?;
    '>'.parse_next(input)?;
    let description = take_until(0.., "</span>").parse_next(input)?;
    literal("</span>").parse_next(input)?;

    match second {
        Some(symbols) if is_word(first) => Ok(RawDefinition {
            context: Some(first),
            symbols,
            description,
        }),
        Some(_) => fail.parse_next(input),
        None => Ok(RawDefinition {
            context: None,
            symbols: first,
            description,
        }),
    }
}

/// Gives every definition span of `text` without a context the context
/// `context`.
///
/// Spans in the global (empty) context are left as written.
pub fn contextualize_definitions(text: &str, context: &str) -> String {
    if context.is_empty() {
        return text.to_string();
    }

    let found: Vec<_> = find_all(text, anywhere, definition_span)
        .into_iter()
        .filter(|found| found.value.context.is_none())
        .collect();

    replace_found(text, &found, |_, definition| {
        format!(
            "<span class=\"def:{context}:{}\"> {} </span>",
            definition.symbols, definition.description
        )
    })
}

/// Symbol descriptions collected from definition spans, per context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanDescriptions {
    contexts: IndexMap<String, IndexMap<String, String>>,
}

impl SpanDescriptions {
    /// Returns the `(symbol, description)` pairs of `context`, in document
    /// order. A later span for the same symbol replaces the earlier one.
    pub fn descriptions(&self, context: &str) -> impl Iterator<Item = (&str, &str)> {
        self.contexts
            .get(context)
            .into_iter()
            .flat_map(|symbols| symbols.iter())
            .map(|(symbol, description)| (symbol.as_str(), description.as_str()))
    }

    /// Returns the contexts that have descriptions.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    /// Returns `true` if no span was found.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    fn insert(&mut self, context: &str, symbol: &str, description: &str) {
        self.contexts
            .entry(context.to_string())
            .or_default()
            .insert(symbol.to_string(), description.to_string());
    }
}

/// Collects the descriptions of every contextualized definition span of
/// `text` and rewrites the spans for rendering.
///
/// ```
/// use heartdown_parser::definition::process_definitions;
///
/// let text = r#"<span class="def:m:x">the input $ x $</span>"#;
/// let (out, descriptions) = process_definitions(text);
///
/// assert_eq!(
///     out,
///     r"<span sym='x' context='m'> the input $ {\prosedeflabel{m}{{x}}} $ </span>"
/// );
/// assert_eq!(
///     descriptions.descriptions("m").collect::<Vec<_>>(),
///     [("x", "the input $ x $")]
/// );
/// ```
pub fn process_definitions(text: &str) -> (String, SpanDescriptions) {
    let found: Vec<_> = find_all(text, anywhere, definition_span)
        .into_iter()
        .filter(|found| found.value.context.is_some())
        .collect();

    let mut descriptions = SpanDescriptions::default();
    let out = replace_found(text, &found, |_, definition| {
        let context = definition.context.unwrap_or_default();
        let symbols = definition.symbol_list();
        for symbol in &symbols {
            descriptions.insert(context, symbol, definition.description);
        }

        let description = label_math(
            definition.description,
            context,
            &symbols,
            LabelKind::Definition,
        );
        format!(
            "<span sym='{}' context='{context}'> {description} </span>",
            definition.symbols.replace('\\', "\\\\")
        )
    });

    debug!(spans = found.len(); "Definition spans processed");
    (out, descriptions)
}
