//! Prose labels.
//!
//! A label ties a symbol written in prose to its definition in a context:
//! `{\proselabel{ctx}{{sym}}}` refers to a symbol, `{\prosedeflabel{ctx}{{sym}}}`
//! marks the sentence that defines it. Authors may write the short form
//! `\proselabel{sym}`, which is expanded with the context of the surrounding
//! segment, and symbols that appear as tokens inside math spans are labeled
//! automatically.

use std::fmt;

use log::trace;
use winnow::{
    Parser as _,
    combinator::{not, opt},
    token::{literal, take_while},
};

use crate::{
    math::math_spans,
    scan::{IResult, Input, anywhere, find_all, replace_found},
};

/// The two label commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// `\proselabel`: a reference to a symbol.
    Prose,
    /// `\prosedeflabel`: the definition of a symbol.
    Definition,
}

impl LabelKind {
    /// Returns the command name without the leading backslash.
    pub fn command(&self) -> &'static str {
        match self {
            LabelKind::Prose => "proselabel",
            LabelKind::Definition => "prosedeflabel",
        }
    }

    /// Renders the canonical label for `symbol` in `context`.
    ///
    /// ```
    /// use heartdown_parser::label::LabelKind;
    ///
    /// assert_eq!(
    ///     LabelKind::Prose.render("model", "x"),
    ///     r"{\proselabel{model}{{x}}}"
    /// );
    /// ```
    pub fn render(&self, context: &str, symbol: &str) -> String {
        format!("{{\\{}{{{context}}}{{{{{symbol}}}}}}}", self.command())
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.command())
    }
}

/// Short-form label: `\proselabel{X}` or `\prosedeflabel{X}` not followed by `{`.
fn short_label<'a>(input: &mut Input<'a>) -> IResult<(LabelKind, &'a str)> {
    literal("\\prose").parse_next(input)?;
    let kind = opt(literal("def"))
        .map(|def| match def {
            Some(_) => LabelKind::Definition,
            None => LabelKind::Prose,
        })
        .parse_next(input)?;
    literal("label{").parse_next(input)?;
    let symbol = take_while(0.., |c: char| !matches!(c, '{' | '}' | '$')).parse_next(input)?;
    '}'.parse_next(input)?;
    not('{').parse_next(input)?;
    Ok((kind, symbol))
}

/// Expands every short-form label of `text` into its canonical form in
/// `context`.
///
/// Canonical labels are left alone, so expansion is idempotent.
pub fn expand_short_labels(text: &str, context: &str) -> String {
    let found = find_all(text, anywhere, short_label);
    replace_found(text, &found, |_, (kind, symbol)| kind.render(context, symbol))
}

/// Labels every free token occurrence of `symbol` in `content`.
///
/// An occurrence is free when it is delimited by whitespace or the content
/// boundaries on both sides and does not sit inside a label. The first free
/// occurrence is wrapped and the content is scanned again, until none is left.
/// A wrapped symbol is preceded by `{`, so it is never free again.
pub fn label_symbol(content: &str, symbol: &str, context: &str, kind: LabelKind) -> String {
    if symbol.is_empty() {
        return content.to_string();
    }

    let mut content = content.to_string();
    while let Some(pos) = free_occurrence(&content, symbol) {
        trace!(symbol, pos; "Labeling symbol");
        content = format!(
            "{}{}{}",
            &content[..pos],
            kind.render(context, symbol),
            &content[pos + symbol.len()..]
        );
    }
    content
}

/// Labels the free occurrences of every symbol in every math span of `text`.
pub fn label_math<S: AsRef<str>>(
    text: &str,
    context: &str,
    symbols: &[S],
    kind: LabelKind,
) -> String {
    if symbols.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for math in math_spans(text) {
        let mut content = math.content(text).to_string();
        for symbol in symbols {
            content = label_symbol(&content, symbol.as_ref(), context, kind);
        }

        out.push_str(&text[last..math.span().start()]);
        out.push_str(math.delimiter());
        out.push_str(&content);
        out.push_str(math.delimiter());
        last = math.span().end();
    }
    out.push_str(&text[last..]);
    out
}

fn free_occurrence(content: &str, symbol: &str) -> Option<usize> {
    content
        .char_indices()
        .map(|(pos, _)| pos)
        .filter(|&pos| content[pos..].starts_with(symbol))
        .find(|&pos| is_token(content, pos, symbol.len()) && !inside_label(&content[..pos]))
}

fn is_token(content: &str, pos: usize, len: usize) -> bool {
    let before = content[..pos].chars().next_back();
    let after = content[pos + len..].chars().next();
    before.is_none_or(char::is_whitespace) && after.is_none_or(char::is_whitespace)
}

/// Returns `true` when `prefix` ends inside the arguments of the last label
/// command. The arguments are the brace groups directly following the
/// command, at most two of them.
fn inside_label(prefix: &str) -> bool {
    let Some(start) = prefix.rfind("\\prose") else {
        return false;
    };

    let mut chars = prefix[start..].chars().skip_while(|&c| c != '{').peekable();
    let mut depth = 0usize;
    let mut groups = 0;
    while let Some(c) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    groups += 1;
                    if groups == 2 || chars.peek() != Some(&'{') {
                        return false;
                    }
                }
            }
            _ => {}
        }
    }
    depth > 0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_expand_short_labels() {
        let text = r"see \proselabel{x} and \prosedeflabel{y}.";

        assert_eq!(
            expand_short_labels(text, "m"),
            r"see {\proselabel{m}{{x}}} and {\prosedeflabel{m}{{y}}}."
        );
    }

    #[test]
    fn test_expand_skips_canonical_labels() {
        let text = r"{\proselabel{m}{{x}}}";
        assert_eq!(expand_short_labels(text, "other"), text);
    }

    #[test]
    fn test_label_symbol_wraps_every_token() {
        let out = label_symbol(" x + x ", "x", "m", LabelKind::Prose);
        assert_eq!(out, r" {\proselabel{m}{{x}}} + {\proselabel{m}{{x}}} ");
    }

    #[test]
    fn test_label_symbol_requires_whole_token() {
        assert_eq!(label_symbol("xy + x2", "x", "m", LabelKind::Prose), "xy + x2");
        assert_eq!(label_symbol("x", "x", "m", LabelKind::Prose), r"{\proselabel{m}{{x}}}");
    }

    #[test]
    fn test_label_symbol_skips_labels() {
        let content = r"\proselabel{m}{{ x }}";
        assert_eq!(label_symbol(content, "x", "m", LabelKind::Prose), content);
    }

    #[test]
    fn test_braces_after_label_are_not_label_arguments() {
        let text = r"$ \proselabel{m}{{x}} + \frac{ y }{2} $";
        assert_eq!(
            label_math(text, "m", &["y"], LabelKind::Prose),
            r"$ \proselabel{m}{{x}} + \frac{ {\proselabel{m}{{y}}} }{2} $"
        );

        let out = label_math(r"$ \proselabel{x} \sqrt{ y } $", "m", &["y"], LabelKind::Prose);
        assert_eq!(out, r"$ \proselabel{x} \sqrt{ {\proselabel{m}{{y}}} } $");
    }

    #[test]
    fn test_label_math_only_touches_math() {
        let text = "x is $ x + y $ and $$ y $$";
        let out = label_math(text, "m", &["x", "y"], LabelKind::Prose);

        assert_eq!(
            out,
            r"x is $ {\proselabel{m}{{x}}} + {\proselabel{m}{{y}}} $ and $$ {\proselabel{m}{{y}}} $$"
        );
    }

    #[test]
    fn test_label_math_definition_kind() {
        let out = label_math("$ A $", "ctx", &["A"], LabelKind::Definition);
        assert_eq!(out, r"$ {\prosedeflabel{ctx}{{A}}} $");
    }

    #[test]
    fn test_symbol_inside_context_name() {
        let out = label_math("$ a $", "a", &["a"], LabelKind::Prose);
        assert_eq!(label_math(&out, "a", &["a"], LabelKind::Prose), out);
    }

    proptest! {
        #[test]
        fn prop_labeling_is_idempotent(
            tokens in prop::collection::vec(prop::sample::select(vec!["a", "b", "ab", "+", "="]), 0..12)
        ) {
            let text = format!("$ {} $", tokens.join(" "));
            let symbols = ["a", "b", "ab"];

            let once = label_math(&text, "m", &symbols, LabelKind::Prose);
            let twice = label_math(&once, "m", &symbols, LabelKind::Prose);

            prop_assert_eq!(once, twice);
        }
    }
}
