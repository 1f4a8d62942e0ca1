//! Error types for page generation.

use std::path::PathBuf;

use bbdoc_markup::MarkupError;

/// Error while rendering or writing generated files.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Markup in a description could not be rendered.
    #[error("failed to render {page}: {source}")]
    Render {
        /// Class or page being rendered.
        page: String,
        /// Underlying error.
        #[source]
        source: MarkupError,
    },

    /// Output could not be written.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl PageError {
    pub(crate) fn render(page: &str, source: MarkupError) -> Self {
        Self::Render {
            page: page.to_owned(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
