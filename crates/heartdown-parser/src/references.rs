//! The references heading.

use winnow::{Parser as _, token::literal};

use crate::scan::{IResult, Input, anywhere, find_all, space0};

/// Appended to documents that have no references heading.
pub const REFERENCES_HEADING: &str = "\n# REFERENCE\n";

/// `#`, optional whitespace, `REFERENCES`.
fn references_heading(input: &mut Input<'_>) -> IResult<()> {
    '#'.parse_next(input)?;
    space0(input)?;
    literal("REFERENCES").void().parse_next(input)
}

/// Returns `true` if `text` contains a references heading.
pub fn has_references_heading(text: &str) -> bool {
    !find_all(text, anywhere, references_heading).is_empty()
}

/// Appends [`REFERENCES_HEADING`] to `text` unless it already has a
/// references heading.
///
/// Returns `true` if the heading was appended.
pub fn append_references_heading(text: &mut String) -> bool {
    if has_references_heading(text) {
        return false;
    }
    text.push_str(REFERENCES_HEADING);
    true
}
