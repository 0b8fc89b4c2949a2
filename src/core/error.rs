use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while parsing, rendering or extracting an eBilanz document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BilanzError {
    /// A mandatory master-data row is absent from the tabular source.
    #[error("missing required master data: {field}")]
    MissingRequiredField { field: String },

    /// The template does not have the expected shape (e.g. no filing root).
    #[error("template structure error: {0}")]
    TemplateStructure(String),

    /// A tag uses a namespace prefix that is not in the registry.
    #[error("unknown namespace prefix '{prefix}' in tag '{tag}'")]
    UnknownNamespacePrefix { prefix: String, tag: String },

    /// Malformed XML, or a failure of the XML reader/writer.
    #[error("XML error: {0}")]
    Xml(String),

    /// Tabular (CSV) reader or writer failure.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BilanzError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
