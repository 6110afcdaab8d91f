//! Command-line argument definitions for the Heartdown CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input document, where the rendered
//! Markdown and the artifacts go, configuration file selection, and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the Heartdown document processor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Markdown document
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the rendered Markdown file, standard output if omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory receiving module sources, library files and metadata.
    /// Defaults to the directory of the input file.
    #[arg(short, long)]
    pub artifacts: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
