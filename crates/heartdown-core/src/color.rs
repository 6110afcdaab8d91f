//! Color handling for symbol highlighting
//!
//! This module provides the [`Palette`] of named CSS colors used to highlight
//! symbols and the [`SymbolColor`] values handed out from it. Palette entries
//! are validated with the `color` crate so that every name is a valid CSS color.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use thiserror::Error;

/// The base palette, in the order colors are introduced.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "red",
    "YellowGreen",
    "DeepSkyBlue",
    "Gold",
    "HotPink",
    "Tomato",
    "Orange",
    "DarkRed",
    "LightCoral",
    "Khaki",
];

/// Errors raised while building a [`Palette`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette must contain at least one color")]
    Empty,

    #[error("invalid palette color `{name}`: {reason}")]
    InvalidColor { name: String, reason: String },
}

/// An ordered, non-empty list of CSS color names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    names: Vec<String>,
}

impl Palette {
    /// Create a palette from CSS color names.
    ///
    /// Names are matched case-insensitively against CSS colors, but are kept
    /// verbatim for output.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Empty`] for an empty list and
    /// [`PaletteError::InvalidColor`] for a name that is not a CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use heartdown_core::color::Palette;
    ///
    /// let palette = Palette::new(["red", "SteelBlue"]).unwrap();
    /// assert_eq!(palette.len(), 2);
    /// assert!(Palette::new(["not-a-color"]).is_err());
    /// ```
    pub fn new<I, S>(names: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(PaletteError::Empty);
        }

        for name in &names {
            parse_css(name).map_err(|reason| PaletteError::InvalidColor {
                name: name.clone(),
                reason,
            })?;
        }

        Ok(Self { names })
    }

    /// Returns the color names in introduction order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of base colors.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// A palette is never empty; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns every base color for the given recycle `cycle`, in order.
    pub(crate) fn cycle(&self, cycle: usize) -> impl Iterator<Item = SymbolColor> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(move |(slot, name)| SymbolColor::new(name.clone(), slot, cycle))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            names: DEFAULT_PALETTE.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// A color assigned to a symbol.
///
/// A color is identified by its palette slot and by the recycle cycle it was
/// drawn in. Once a palette is exhausted it is refilled from the start, so the
/// eleventh color drawn from the default palette is `red` again but in cycle
/// `1`; it compares unequal to the first `red`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolColor {
    name: String,
    slot: usize,
    cycle: usize,
}

impl SymbolColor {
    fn new(name: String, slot: usize, cycle: usize) -> Self {
        Self { name, slot, cycle }
    }

    /// Returns the palette name of this color.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the position of this color in its palette.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Returns how many times the palette had been refilled when this color
    /// was drawn.
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Returns a CSS representation of this color.
    ///
    /// First-cycle colors are emitted by name. Recycled colors are rendered
    /// with a reduced alpha so they remain visually distinguishable from their
    /// first-cycle counterpart.
    pub fn to_css(&self) -> String {
        if self.cycle == 0 {
            return self.name.clone();
        }

        let alpha = 1.0 / (self.cycle as f32 + 1.0);
        match parse_css(&self.name) {
            Ok(color) => color.with_alpha(alpha).to_string(),
            Err(_) => self.name.clone(),
        }
    }
}

impl fmt::Display for SymbolColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycle == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}#{}", self.name, self.cycle)
        }
    }
}

fn parse_css(name: &str) -> Result<DynamicColor, String> {
    DynamicColor::from_str(&name.to_ascii_lowercase()).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_is_valid() {
        let palette = Palette::new(DEFAULT_PALETTE).unwrap();
        assert_eq!(palette, Palette::default());
        assert_eq!(palette.len(), 10);
    }

    #[test]
    fn test_palette_rejects_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(Palette::new(empty), Err(PaletteError::Empty));
    }

    #[test]
    fn test_palette_rejects_unknown_color() {
        let err = Palette::new(["red", "blurple"]).unwrap_err();
        assert!(matches!(err, PaletteError::InvalidColor { name, .. } if name == "blurple"));
    }

    #[test]
    fn test_recycled_color_differs() {
        let palette = Palette::default();
        let first: Vec<_> = palette.cycle(0).collect();
        let second: Vec<_> = palette.cycle(1).collect();

        assert_eq!(first[0].name(), second[0].name());
        assert_ne!(first[0], second[0]);
        assert_eq!(second[0].to_string(), "red#1");
    }

    #[test]
    fn test_css_first_cycle_is_name() {
        let palette = Palette::default();
        let colors: Vec<_> = palette.cycle(0).collect();
        assert_eq!(colors[1].to_css(), "YellowGreen");
        assert_ne!(palette.cycle(1).next().unwrap().to_css(), "red");
    }
}
