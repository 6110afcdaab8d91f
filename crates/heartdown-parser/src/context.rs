//! Context markers and the passes that depend on them.
//!
//! A marker line `❤: name` opens the context `name`, which lasts until the
//! next marker. Text before the first marker belongs to the global (empty)
//! context. Contexts and modules share one namespace: raw equation blocks are
//! given the module named like their context, and prose is labeled with the
//! symbols of that module.

use indexmap::IndexMap;
use log::debug;
use winnow::{
    Parser as _,
    combinator::{alt, peek},
    token::take_while,
};

use crate::{
    blocks::{contextualize_fenced, contextualize_inline},
    definition::contextualize_definitions,
    label::{LabelKind, expand_short_labels, label_math},
    scan::{IResult, Input, find_all, hspace0, line_start},
    span::Span,
};

/// A marker line that opens a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMarker<'a> {
    span: Span,
    context: &'a str,
}

impl<'a> ContextMarker<'a> {
    /// Returns the span of the marker, without its newline.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the context the marker opens.
    pub fn context(&self) -> &'a str {
        self.context
    }
}

/// A run of text in a single context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The marker that opens the segment; `None` for the leading segment.
    pub marker: Option<ContextMarker<'a>>,
    /// The text after the marker.
    pub text: &'a str,
    /// The span of `text`.
    pub span: Span,
}

impl<'a> Segment<'a> {
    pub fn context(&self) -> &'a str {
        self.marker.map_or("", |marker| marker.context)
    }
}

/// `❤ : name` on a line of its own.
fn marker<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    hspace0(input)?;
    '❤'.parse_next(input)?;
    hspace0(input)?;
    ':'.parse_next(input)?;
    hspace0(input)?;
    let context =
        take_while(0.., |c: char| !c.is_whitespace() && c != '❤').parse_next(input)?;
    hspace0(input)?;
    peek(alt(("\n", "\r\n"))).parse_next(input)?;
    Ok(context)
}

/// Splits documents by context and runs the context-aware passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextResolver;

impl ContextResolver {
    /// Splits `text` into segments, in document order.
    ///
    /// The first segment has no marker and may be empty. Concatenating the
    /// markers and segment texts gives back `text`.
    ///
    /// ```
    /// use heartdown_parser::context::ContextResolver;
    ///
    /// let segments = ContextResolver::segments("intro\n❤: model\nbody");
    /// let contexts: Vec<_> = segments.iter().map(|s| s.context()).collect();
    /// assert_eq!(contexts, ["", "model"]);
    /// assert_eq!(segments[1].text, "\nbody");
    /// ```
    pub fn segments(text: &str) -> Vec<Segment<'_>> {
        let markers = find_all(text, line_start, marker);

        let mut segments = Vec::with_capacity(markers.len() + 1);
        let mut open: Option<ContextMarker<'_>> = None;
        let mut start = 0;
        for found in markers {
            segments.push(segment(text, open, start, found.span.start()));
            open = Some(ContextMarker {
                span: found.span,
                context: found.value,
            });
            start = found.span.end();
        }
        segments.push(segment(text, open, start, text.len()));

        debug!(segments = segments.len(); "Document segmented");
        segments
    }

    /// Gives every raw equation block and definition span the context of its
    /// segment.
    ///
    /// Markers are kept, so the output segments like the input.
    pub fn contextualize(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in Self::segments(text) {
            if let Some(marker) = segment.marker {
                out.push_str(&text[marker.span.range()]);
            }

            let context = segment.context();
            let body = contextualize_fenced(segment.text, context);
            let body = contextualize_inline(&body, context);
            out.push_str(&contextualize_definitions(&body, context));
        }
        out
    }

    /// Labels prose with the symbols of each segment's context.
    ///
    /// `symbols` maps a context to the symbols its module defines. Short
    /// labels are expanded and symbols in math spans are labeled. Markers are
    /// dropped from the output.
    pub fn annotate(text: &str, symbols: &IndexMap<String, Vec<String>>) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in Self::segments(text) {
            let context = segment.context();
            let known = symbols.get(context).map(Vec::as_slice).unwrap_or_default();

            let body = expand_short_labels(segment.text, context);
            out.push_str(&label_math(&body, context, known, LabelKind::Prose));
        }
        out
    }
}

fn segment<'a>(
    text: &'a str,
    marker: Option<ContextMarker<'a>>,
    start: usize,
    end: usize,
) -> Segment<'a> {
    let span = Span::new(start..end);
    Segment {
        marker,
        text: &text[span.range()],
        span,
    }
}
