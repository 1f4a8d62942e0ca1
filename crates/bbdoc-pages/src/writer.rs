//! Writing generated files.
//!
//! Every destination is truncated when opened, and a page directory is cleared
//! of stale pages before the first write, so a rerun never leaves duplicated
//! or outdated content behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::PageError;

/// Write `content` to `path`, replacing any previous content.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_file(path: &Path, content: &str) -> Result<(), PageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PageError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| PageError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

/// Directory of generated pages sharing one extension.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
    extension: String,
}

impl OutputDir {
    /// Create the directory if needed and remove every `*.<extension>` file in it.
    ///
    /// Other files and subdirectories are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or listed, or a
    /// stale page cannot be removed.
    pub fn prepare(path: impl Into<PathBuf>, extension: &str) -> Result<Self, PageError> {
        let path = path.into();
        if !path.is_dir() {
            tracing::info!(path = %path.display(), "Creating output directory");
            fs::create_dir_all(&path).map_err(|e| PageError::io(&path, e))?;
        }

        let entries = fs::read_dir(&path).map_err(|e| PageError::io(&path, e))?;
        for entry in entries {
            let stale = entry.map_err(|e| PageError::io(&path, e))?.path();
            if stale.is_file() && stale.extension().is_some_and(|ext| ext == extension) {
                tracing::debug!(path = %stale.display(), "Removing stale page");
                fs::remove_file(&stale).map_err(|e| PageError::io(&stale, e))?;
            }
        }

        Ok(Self {
            path,
            extension: extension.to_owned(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Write a file inside the directory and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, PageError> {
        let path = self.path.join(file_name);
        write_file(&path, content)?;
        Ok(path)
    }
}
