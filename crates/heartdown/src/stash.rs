//! Placeholder storage for finished markup.
//!
//! Spliced equations must survive the later text passes untouched. They are
//! stored in a [`Stash`] and the document only carries a short placeholder
//! until [`Stash::restore`] puts the content back.

use log::warn;

const OPEN: &str = "\u{2}stash:";
const CLOSE: char = '\u{3}';

/// Stored content, addressed by placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stash {
    entries: Vec<String>,
}

impl Stash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` and returns its placeholder.
    ///
    /// ```
    /// use heartdown::stash::Stash;
    ///
    /// let mut stash = Stash::new();
    /// let placeholder = stash.store("<b>x</b>");
    /// assert_eq!(stash.restore(&format!("a {placeholder} b")), "a <b>x</b> b");
    /// ```
    pub fn store(&mut self, content: impl Into<String>) -> String {
        let placeholder = format!("{OPEN}{}{CLOSE}", self.entries.len());
        self.entries.push(content.into());
        placeholder
    }

    /// Returns the content stored under index `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every placeholder of `text` with its content.
    ///
    /// Text that merely looks like a placeholder but names no entry is kept.
    pub fn restore(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];

            let entry = after.split_once(CLOSE).and_then(|(index, tail)| {
                let content = self.get(index.parse().ok()?)?;
                Some((content, tail))
            });
            match entry {
                Some((content, tail)) => {
                    out.push_str(content);
                    rest = tail;
                }
                None => {
                    warn!(offset = text.len() - rest.len() + start; "Unknown stash placeholder");
                    out.push_str(OPEN);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_distinct() {
        let mut stash = Stash::new();

        let first = stash.store("one");
        let second = stash.store("one");

        assert_ne!(first, second);
        assert_eq!(stash.len(), 2);
    }

    #[test]
    fn test_restore_many() {
        let mut stash = Stash::new();
        let a = stash.store("A");
        let b = stash.store("B");

        assert_eq!(stash.restore(&format!("{b}-{a}-{b}")), "B-A-B");
    }

    #[test]
    fn test_restore_keeps_unknown_placeholders() {
        let stash = Stash::new();
        let text = "x \u{2}stash:7\u{3} y";

        assert_eq!(stash.restore(text), text);
    }
}
