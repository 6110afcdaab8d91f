//! The equation compiler seam.
//!
//! Compiling equation code is delegated to an [`EquationCompiler`]. The
//! [`CommandCompiler`] runs an external program per module, writing a JSON
//! request to its standard input and reading a [`CompiledUnit`] back from its
//! standard output.

use std::{
    io::{self, Write as _},
    process::{ChildStdin, Command, ExitStatus, Stdio},
    thread,
};

use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;

use heartdown_core::equation::{CompileOptions, CompiledUnit, Dialect};

/// Errors raised while compiling a module.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while talking to the compiler: {0}")]
    Io(#[from] io::Error),

    #[error("compiler exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("invalid compiler output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Compiles the aggregated source of one module.
pub trait EquationCompiler {
    /// Compiles `source`, the code of module `module`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the source cannot be compiled.
    fn compile(
        &self,
        module: &str,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompiledUnit, CompileError>;
}

#[derive(Debug, Serialize)]
struct CompileRequest<'a> {
    module: &'a str,
    source: &'a str,
    dialects: &'a [Dialect],
}

/// Runs an external compiler program for every module.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl EquationCompiler for CommandCompiler {
    fn compile(
        &self,
        module: &str,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompiledUnit, CompileError> {
        let request = serde_json::to_vec(&CompileRequest {
            module,
            source,
            dialects: options.dialects(),
        })?;

        debug!(program = self.program.as_str(), module; "Running equation compiler");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // The request is written while the output is drained, so neither pipe
        // fills up on large modules.
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            let writer = scope.spawn(|| write_request(stdin, &request));
            let output = child.wait_with_output()?;
            writer
                .join()
                .map_err(|_| io::Error::other("compiler request writer panicked"))??;
            Ok::<_, io::Error>(output)
        })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let unit: CompiledUnit = serde_json::from_slice(&output.stdout)?;
        trace!(module, fragments = unit.fragments().len(); "Compiler output parsed");
        Ok(unit)
    }
}

/// A compiler that exits without reading its input is reported through its
/// exit status, not as a broken pipe.
fn write_request(stdin: Option<ChildStdin>, request: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(request) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}
