//! Equation block syntax.
//!
//! Two forms carry equation code:
//!
//! - fenced: a line-start fence (three or more backticks or tildes), the
//!   `iheartla` tag and a parenthesized module name, the code lines, and a
//!   closing line holding the identical fence;
//! - inline: `❤ module : code❤`, where the code stays on one line.
//!
//! Authors may omit the module. Those raw forms are rewritten with the
//! context of the enclosing segment before blocks are scanned.

use std::fmt;

use log::trace;
use winnow::{
    Parser as _,
    stream::{Location as _, Stream as _},
    token::{literal, take_till, take_while},
};

use crate::{
    scan::{
        Found, IResult, Input, anywhere, at_line_end, fence, find_all, hspace0, line_ending,
        line_start, replace_found, space0,
    },
    span::Span,
};

/// The syntactic form of an equation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `❤ module: code❤`
    Inline,
    /// A fenced `iheartla(module)` code block.
    Fenced,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Inline => write!(f, "inline"),
            BlockKind::Fenced => write!(f, "fenced"),
        }
    }
}

/// An equation block as written in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    pub kind: BlockKind,
    pub module: &'a str,
    pub code: &'a str,
    /// The whole block.
    pub span: Span,
    /// The code payload.
    pub code_span: Span,
}

struct Parsed<'a> {
    module: &'a str,
    code_start: usize,
    code_end: usize,
}

/// `❤ module : code❤`
fn inline_block<'a>(input: &mut Input<'a>) -> IResult<Parsed<'a>> {
    '❤'.parse_next(input)?;
    space0(input)?;
    let module =
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '.').parse_next(input)?;
    space0(input)?;
    ':'.parse_next(input)?;
    let code_start = input.current_token_start();
    take_till(0.., ['❤', '\n']).parse_next(input)?;
    let code_end = input.current_token_start();
    '❤'.parse_next(input)?;
    Ok(Parsed {
        module,
        code_start,
        code_end,
    })
}

/// A fenced block opener with a module, the code, and the closing fence.
fn fenced_block<'a>(input: &mut Input<'a>) -> IResult<Parsed<'a>> {
    let fence = fence(input)?;
    take_while(0.., ' ').parse_next(input)?;
    literal("iheartla").parse_next(input)?;
    hspace0(input)?;
    '('.parse_next(input)?;
    hspace0(input)?;
    let module = take_while(0.., |c: char| !c.is_whitespace() && c != '}' && c != ')')
        .parse_next(input)?;
    hspace0(input)?;
    ')'.parse_next(input)?;
    line_ending(input)?;

    let code_start = input.current_token_start();
    loop {
        let code_end = input.current_token_start();
        let checkpoint = input.checkpoint();
        if closing_fence(input, fence).is_ok() {
            return Ok(Parsed {
                module,
                code_start,
                code_end,
            });
        }
        input.reset(&checkpoint);
        (take_till(0.., '\n'), '\n').void().parse_next(input)?;
    }
}

fn closing_fence(input: &mut Input<'_>, fence: &str) -> IResult<()> {
    literal(fence).parse_next(input)?;
    take_while(0.., ' ').parse_next(input)?;
    at_line_end(input)
}

/// A fenced opener without a module: returns the fence and the line ending.
fn raw_fenced_opener<'a>(input: &mut Input<'a>) -> IResult<(&'a str, &'a str)> {
    let fence = fence(input)?;
    take_while(0.., ' ').parse_next(input)?;
    literal("iheartla").parse_next(input)?;
    hspace0(input)?;
    let ending = line_ending(input)?;
    Ok((fence, ending))
}

/// Any `❤…❤` pair.
fn raw_inline<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    '❤'.parse_next(input)?;
    let content = take_till(0.., '❤').parse_next(input)?;
    '❤'.parse_next(input)?;
    Ok(content)
}

/// Scans `text` for equation blocks.
///
/// Inline blocks come first, in document order, followed by fenced blocks in
/// document order. Inline syntax inside a fenced block is part of its code and
/// does not form a block of its own.
pub fn scan_blocks(text: &str) -> Vec<RawBlock<'_>> {
    let fenced: Vec<RawBlock<'_>> = find_all(text, line_start, fenced_block)
        .into_iter()
        .map(|found| to_block(text, BlockKind::Fenced, found))
        .collect();

    let inline = find_all(text, anywhere, inline_block)
        .into_iter()
        .map(|found| to_block(text, BlockKind::Inline, found))
        .filter(|block| {
            let nested = fenced.iter().any(|outer| outer.span.contains(block.span));
            if nested {
                trace!(span:% = block.span; "Ignoring inline block inside fenced block");
            }
            !nested
        });

    inline.chain(fenced.iter().cloned()).collect()
}

fn to_block<'a>(text: &'a str, kind: BlockKind, found: Found<Parsed<'a>>) -> RawBlock<'a> {
    let code_span = Span::new(found.value.code_start..found.value.code_end);
    RawBlock {
        kind,
        module: found.value.module,
        code: &text[code_span.range()],
        span: found.span,
        code_span,
    }
}

/// Gives every module-less fenced opener of `text` the module `context`.
pub fn contextualize_fenced(text: &str, context: &str) -> String {
    let found = find_all(text, line_start, raw_fenced_opener);
    replace_found(text, &found, |_, (fence, ending)| {
        format!("{fence}iheartla({context}){ending}")
    })
}

/// Gives every inline pair of `text` without an explicit module the module
/// `context`.
///
/// A pair whose module is empty (`❤: code❤`) counts as having none.
pub fn contextualize_inline(text: &str, context: &str) -> String {
    let found: Vec<_> = find_all(text, anywhere, raw_inline)
        .into_iter()
        .filter(|found| explicit_module(&text[found.span.range()]).is_none())
        .collect();

    replace_found(text, &found, |raw, content| {
        let code = empty_module_code(raw).unwrap_or(content);
        format!("❤ {context}:{code}❤")
    })
}

/// Returns the module of `raw` if it is a complete inline block with a
/// non-empty module.
fn explicit_module(raw: &str) -> Option<&str> {
    let mut input = Input::new(raw);
    let parsed = inline_block(&mut input).ok()?;
    (input.is_empty() && !parsed.module.is_empty()).then_some(parsed.module)
}

/// Returns the code of `raw` if it is a complete inline block with an empty
/// module.
fn empty_module_code(raw: &str) -> Option<&str> {
    let mut input = Input::new(raw);
    let parsed = inline_block(&mut input).ok()?;
    (input.is_empty() && parsed.module.is_empty()).then(|| &raw[parsed.code_start..parsed.code_end])
}
