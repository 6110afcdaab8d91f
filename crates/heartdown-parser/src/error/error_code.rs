//! Error codes for the Heartdown diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Front matter
//! - `E2xx` - Equation block aggregation
//! - `E3xx` - Fragment splicing

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Front Matter (E1xx)
    // =========================================================================
    /// Invalid front matter.
    ///
    /// The YAML block between the leading `---` lines could not be parsed.
    E100,

    /// Front matter is not a mapping.
    ///
    /// The front matter parsed as YAML but is not a key/value mapping; it is
    /// ignored.
    E101,

    // =========================================================================
    // Aggregation (E2xx)
    // =========================================================================
    /// Unresolvable module source.
    ///
    /// An equation block with an empty body names a module file that could
    /// not be read.
    E200,

    /// Equation block without a module name.
    ///
    /// The block is skipped. This happens for blocks in the global context.
    E201,

    /// Equation block without code.
    ///
    /// The block is skipped.
    E202,

    // =========================================================================
    // Splicing (E3xx)
    // =========================================================================
    /// Equation block without compiled output.
    ///
    /// None of the fragments returned by the compiler occur in the block, so
    /// the block is left untouched.
    E300,

    /// Compiled fragment without a block.
    ///
    /// A fragment returned by the compiler does not occur in any block of its
    /// module.
    E301,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "invalid front matter",
            ErrorCode::E101 => "front matter is not a mapping",
            ErrorCode::E200 => "unresolvable module source",
            ErrorCode::E201 => "equation block without module",
            ErrorCode::E202 => "equation block without code",
            ErrorCode::E300 => "equation block without compiled output",
            ErrorCode::E301 => "compiled fragment without block",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
