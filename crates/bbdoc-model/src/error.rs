//! Error types for model loading.

use std::path::PathBuf;

/// Error while reading or interpreting a documentation record.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Document contains no element.
    #[error("document has no root element")]
    EmptyDocument,

    /// Root element is not the expected one.
    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot {
        /// Expected tag name.
        expected: &'static str,
        /// Actual tag name.
        found: String,
    },

    /// Identifying attribute is missing.
    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        /// Element tag name.
        element: String,
        /// Attribute name.
        attribute: &'static str,
    },

    /// Two records declare the same class.
    #[error("class `{name}` is declared in both {first} and {second}")]
    DuplicateClass {
        /// Class name.
        name: String,
        /// Source of the first declaration.
        first: String,
        /// Source of the second declaration.
        second: String,
    },

    /// I/O error.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Error located in a specific record.
    #[error("{source_id}: {source}")]
    InRecord {
        /// Record the error comes from (usually a file path).
        source_id: String,
        /// Underlying error.
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    pub(crate) fn in_record(self, source_id: &str) -> Self {
        Self::InRecord {
            source_id: source_id.to_owned(),
            source: Box::new(self),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
