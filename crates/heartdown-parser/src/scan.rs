//! Shared scanning machinery.
//!
//! Every document construct is recognized by a small winnow parser. The
//! [`find_all`] driver tries such a parser at each position of the text and
//! collects the non-overlapping matches in document order, the same way the
//! matches of a leftmost regular expression scan are produced.

use winnow::{
    Parser as _,
    combinator::{alt, eof, peek},
    error::{ContextError, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::take_while,
};

use crate::span::Span;

pub(crate) type Input<'a> = LocatingSlice<&'a str>;
pub(crate) type IResult<O> = ModalResult<O, ContextError>;

/// A match of a scanner: the matched span and the parser output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Found<O> {
    pub span: Span,
    pub value: O,
}

/// Runs `parser` at every position of `text` where `accept` holds.
///
/// After a successful non-empty match, scanning resumes right after it.
pub(crate) fn find_all<'a, O>(
    text: &'a str,
    accept: impl Fn(&str, usize) -> bool,
    mut parser: impl FnMut(&mut Input<'a>) -> IResult<O>,
) -> Vec<Found<O>> {
    let mut input = Input::new(text);
    let mut found = Vec::new();

    while !input.is_empty() {
        let start = input.current_token_start();
        if accept(text, start) {
            let checkpoint = input.checkpoint();
            if let Ok(value) = parser(&mut input) {
                let end = input.current_token_start();
                if end > start {
                    found.push(Found {
                        span: Span::new(start..end),
                        value,
                    });
                    continue;
                }
            }
            input.reset(&checkpoint);
        }
        input.next_token();
    }

    found
}

/// Accepts every position.
pub(crate) fn anywhere(_text: &str, _pos: usize) -> bool {
    true
}

/// Accepts positions at the start of a line.
pub(crate) fn line_start(text: &str, pos: usize) -> bool {
    pos == 0 || text[..pos].ends_with('\n')
}

/// Rebuilds `text` with every found span replaced by `replace`'s output.
pub(crate) fn replace_found<O>(
    text: &str,
    found: &[Found<O>],
    mut replace: impl FnMut(&str, &O) -> String,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for item in found {
        out.push_str(&text[last..item.span.start()]);
        out.push_str(&replace(&text[item.span.range()], &item.value));
        last = item.span.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Horizontal whitespace: spaces and tabs.
pub(crate) fn hspace0<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(0.., [' ', '\t']).parse_next(input)
}

/// Any whitespace, newlines included.
pub(crate) fn space0<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

/// A code fence: three or more backticks or tildes.
pub(crate) fn fence<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    alt((take_while(3.., '`'), take_while(3.., '~'))).parse_next(input)
}

/// A line ending, either `\n` or `\r\n`.
pub(crate) fn line_ending<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    alt(("\n", "\r\n")).parse_next(input)
}

/// A line ending, or the end of input, without consuming it.
pub(crate) fn at_line_end(input: &mut Input<'_>) -> IResult<()> {
    peek(alt(("\n".void(), "\r\n".void(), eof.void()))).parse_next(input)
}

#[cfg(test)]
mod tests {
    use winnow::token::literal;

    use super::*;

    fn keyword<'a>(word: &'static str) -> impl FnMut(&mut Input<'a>) -> IResult<&'a str> {
        move |input: &mut Input<'a>| literal(word).parse_next(input)
    }

    #[test]
    fn test_find_all_is_non_overlapping() {
        let found = find_all("aaaa", anywhere, keyword("aa"));

        let spans: Vec<_> = found.iter().map(|item| item.span).collect();
        assert_eq!(spans, [Span::new(0..2), Span::new(2..4)]);
    }

    #[test]
    fn test_find_all_handles_multibyte_text() {
        let found = find_all("❤x❤x", anywhere, keyword("x"));

        let starts: Vec<_> = found.iter().map(|item| item.span.start()).collect();
        assert_eq!(starts, [3, 7]);
    }

    #[test]
    fn test_line_start() {
        let text = "ab\ncd";
        assert!(line_start(text, 0));
        assert!(!line_start(text, 1));
        assert!(line_start(text, 3));
    }

    #[test]
    fn test_replace_found() {
        let text = "one two one";
        let found = find_all(text, anywhere, keyword("one"));

        let out = replace_found(text, &found, |raw, _| raw.to_uppercase());
        assert_eq!(out, "ONE two ONE");
    }
}
