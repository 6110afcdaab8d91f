//! # Heartdown Parser
//!
//! Document syntax for Heartdown: Markdown prose with embedded equation
//! blocks. This crate finds the constructs the pipeline rewrites and reports
//! problems as diagnostics with source spans.
//!
//! ## Usage
//!
//! ```
//! use heartdown_parser::{BlockAggregator, ContextResolver, DirLoader, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "❤: model\nwhere ❤y = A x❤ holds.\n";
//!
//!     let text = ContextResolver::contextualize(source);
//!     let loader = DirLoader::new(".");
//!     let modules = BlockAggregator::new(&loader).aggregate(&text)?;
//!
//!     assert_eq!(modules["model"].source(), "y = A x");
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod blocks;
pub mod context;
pub mod definition;
pub mod error;
pub mod front_matter;
pub mod label;
pub mod math;
pub mod references;
mod scan;
mod span;

pub use aggregate::{BlockAggregator, BlockOccurrence, DirLoader, LoadError, Module, SourceLoader};
pub use blocks::BlockKind;
pub use context::{ContextResolver, Segment};
pub use definition::{SpanDescriptions, process_definitions};
pub use error::{Diagnostic, ErrorCode, ParseError, Severity};
pub use front_matter::{Document, FrontMatter, split_front_matter};
pub use span::Span;
