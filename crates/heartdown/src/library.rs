//! Library files collecting the generated code of every module.

use log::debug;

use heartdown_core::equation::{CompileOptions, CompiledUnit, Dialect};

/// A generated library file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFile {
    pub name: &'static str,
    pub content: String,
}

/// Builds the library files for the requested dialects.
///
/// Only Eigen (`lib.h`), NumPy (`lib.py`) and MATLAB (`lib.m`) produce a
/// library. The prelude of the first module that has one heads the file and
/// the definitions of every module follow in compile order. A dialect no
/// module produced code for yields no file, and MATLAB yields none when every
/// definition is blank.
pub fn library_files<'a>(
    units: impl IntoIterator<Item = &'a CompiledUnit> + Clone,
    options: &CompileOptions,
) -> Vec<LibraryFile> {
    let mut files = Vec::new();
    for &dialect in options.dialects() {
        let Some((name, header)) = library_layout(dialect) else {
            continue;
        };

        let mut prelude: Option<&str> = None;
        let mut body = String::new();
        for frame in units.clone().into_iter().filter_map(|unit| unit.frame(dialect)) {
            prelude.get_or_insert(frame.prelude());
            body.push_str(frame.definitions());
            body.push('\n');
        }

        let Some(prelude) = prelude else {
            continue;
        };
        let content = match dialect {
            Dialect::Matlab if body.trim().is_empty() => continue,
            Dialect::Matlab => body,
            _ => format!("{header}{prelude}{body}"),
        };

        debug!(file = name, bytes = content.len(); "Library file built");
        files.push(LibraryFile { name, content });
    }
    files
}

fn library_layout(dialect: Dialect) -> Option<(&'static str, &'static str)> {
    match dialect {
        Dialect::Eigen => Some(("lib.h", "#pragma once\n")),
        Dialect::Numpy => Some(("lib.py", "")),
        Dialect::Matlab => Some(("lib.m", "")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use heartdown_core::equation::{EquationRecord, Frame};

    use super::*;

    fn unit(name: &str, frames: &[(Dialect, &str, &str)]) -> CompiledUnit {
        frames.iter().fold(
            CompiledUnit::new(EquationRecord::new(name)),
            |unit, (dialect, prelude, definitions)| {
                unit.with_frame(Frame::new(*dialect, *prelude, *definitions))
            },
        )
    }

    #[test]
    fn test_library_files() {
        let units = [
            unit(
                "a",
                &[
                    (Dialect::Eigen, "#include <Eigen>\n", "struct a {};"),
                    (Dialect::Numpy, "import numpy as np\n", "class a: pass"),
                ],
            ),
            unit("b", &[(Dialect::Eigen, "#include <Other>\n", "struct b {};")]),
        ];
        let options = CompileOptions::new([Dialect::Eigen, Dialect::Numpy, Dialect::Matlab]);

        let files = library_files(&units, &options);

        assert_eq!(
            files,
            [
                LibraryFile {
                    name: "lib.py",
                    content: "import numpy as np\nclass a: pass\n".to_string(),
                },
                LibraryFile {
                    name: "lib.h",
                    content: "#pragma once\n#include <Eigen>\nstruct a {};\nstruct b {};\n"
                        .to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unrequested_dialects_are_ignored() {
        let units = [unit("a", &[(Dialect::Matlab, "", "function a()")])];

        assert!(library_files(&units, &CompileOptions::default()).is_empty());

        let options = CompileOptions::new([Dialect::Matlab]);
        assert_eq!(library_files(&units, &options)[0].content, "function a()\n");
    }

    #[test]
    fn test_blank_matlab_library_is_skipped() {
        let units = [unit("a", &[(Dialect::Matlab, "", "  ")])];
        let options = CompileOptions::new([Dialect::Matlab]);

        assert!(library_files(&units, &options).is_empty());
    }
}
