//! Error types for Heartdown operations.
//!
//! This module provides the main error type [`HeartdownError`] which wraps
//! the error conditions that can occur while processing a document.

use std::io;

use thiserror::Error;

use heartdown_parser::ParseError;

/// The main error type for Heartdown operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the diagnostics together with the text their
/// spans point into, so callers can render them with source snippets.
#[derive(Debug, Error)]
pub enum HeartdownError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("failed to compile module `{module}`: {message}")]
    Compile { module: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HeartdownError {
    /// Create a new `Parse` error with the text its spans refer to.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
