//! Side-channel files written next to the processed document.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::info;

/// Writes artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `name`, relative to the root, creating missing
    /// directories. Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the file cannot be written.
    pub fn write(&self, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;

        info!(path:? = path, bytes = content.len(); "Artifact written");
        Ok(path)
    }

    /// Writes the aggregated source of `module` as `<module>.<extension>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_source(&self, module: &str, extension: &str, source: &str) -> io::Result<PathBuf> {
        self.write(&format!("{module}.{extension}"), source)
    }
}
