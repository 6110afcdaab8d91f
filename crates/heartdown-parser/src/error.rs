//! Error and diagnostic system for the Heartdown document parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, source locations,
//! and help text. Fatal diagnostics are wrapped in [`ParseError`] when a
//! document pass cannot complete.
//!
//! # Example
//!
//! ```
//! # use heartdown_parser::error::{Diagnostic, ErrorCode};
//! # use heartdown_parser::Span;
//!
//! let block = Span::new(100..120);
//!
//! let diag = Diagnostic::error("cannot load module source `model.ihla`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(block, "referenced here")
//!     .with_help("module files are resolved relative to the document");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
