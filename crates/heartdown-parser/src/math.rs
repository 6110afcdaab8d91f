//! Inline (`$…$`) and display (`$$…$$`) math spans.

use crate::span::Span;

/// A math span found in prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathSpan {
    span: Span,
    delimiter: &'static str,
}

impl MathSpan {
    /// Returns the span of the whole construct, delimiters included.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the delimiter, `$` or `$$`.
    pub fn delimiter(&self) -> &'static str {
        self.delimiter
    }

    /// Returns the span of the content between the delimiters.
    pub fn content_span(&self) -> Span {
        let width = self.delimiter.len();
        Span::new(self.span.start() + width..self.span.end() - width)
    }

    /// Returns the content of this span within `text`.
    pub fn content<'a>(&self, text: &'a str) -> &'a str {
        &text[self.content_span().range()]
    }
}

/// Finds every math span of `text`, in order, without overlaps.
///
/// A delimiter is `$` or `$$` that is neither escaped with `\` nor adjacent to
/// another `$` outside the delimiter itself. The span closes at the first
/// matching delimiter, which may be on a later line.
///
/// ```
/// use heartdown_parser::math::math_spans;
///
/// let text = r"cost \$5, with $x + y$ and $$\sum_i w_i$$";
/// let spans = math_spans(text);
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].content(text), "x + y");
/// assert_eq!(spans[1].delimiter(), "$$");
/// ```
pub fn math_spans(text: &str) -> Vec<MathSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if let Some(delimiter) = opening_delimiter(bytes, pos)
            && let Some(close) = closing_delimiter(bytes, pos + delimiter.len(), delimiter)
        {
            let end = close + delimiter.len();
            spans.push(MathSpan {
                span: Span::new(pos..end),
                delimiter,
            });
            pos = end;
            continue;
        }
        pos += 1;
    }

    spans
}

fn is_guard(byte: u8) -> bool {
    byte == b'\\' || byte == b'$'
}

fn delimiter_at(bytes: &[u8], pos: usize, delimiter: &str) -> bool {
    let width = delimiter.len();
    bytes[pos..].starts_with(delimiter.as_bytes())
        && (pos == 0 || !is_guard(bytes[pos - 1]))
        && bytes.get(pos + width) != Some(&b'$')
}

fn opening_delimiter(bytes: &[u8], pos: usize) -> Option<&'static str> {
    ["$$", "$"]
        .into_iter()
        .find(|delimiter| delimiter_at(bytes, pos, delimiter))
}

fn closing_delimiter(bytes: &[u8], from: usize, delimiter: &str) -> Option<usize> {
    (from..bytes.len()).find(|&pos| delimiter_at(bytes, pos, delimiter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(text: &str) -> Vec<&str> {
        math_spans(text)
            .iter()
            .map(|span| span.content(text))
            .collect()
    }

    #[test]
    fn test_inline_and_display() {
        assert_eq!(contents("a $x$ b $$y$$ c"), ["x", "y"]);
    }

    #[test]
    fn test_display_spans_lines() {
        assert_eq!(contents("$$\nA = B\n$$"), ["\nA = B\n"]);
    }

    #[test]
    fn test_escaped_dollar_is_not_a_delimiter() {
        assert_eq!(contents(r"price \$3 and \$4"), Vec::<&str>::new());
        assert_eq!(contents(r"$a \$ b$"), [r"a \$ b"]);
    }

    #[test]
    fn test_triple_dollar_is_not_a_delimiter() {
        assert!(math_spans("$$$ x $$$").is_empty());
    }

    #[test]
    fn test_unclosed_span() {
        assert!(math_spans("only $ one").is_empty());
    }

    #[test]
    fn test_multibyte_content() {
        let text = "see $θ = ❤$ here";
        assert_eq!(contents(text), ["θ = ❤"]);
    }
}
