use std::path::PathBuf;

use super::codes::ErrorCode;

/// Errors raised while talking to the ERiC engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EricError {
    /// The engine returned a non-zero result code.
    #[error(
        "ERiC error {code}{}",
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Engine { code: i32, message: Option<String> },

    /// A shared library could not be located or opened.
    #[error("failed to load ERiC library at {}: {reason}", .path.display())]
    LibraryLoad { path: PathBuf, reason: String },

    /// `<TaxType>_<TaxVersion>` could not be parsed.
    #[error("invalid taxonomy version '{0}', expected <TaxType>_<TaxVersion>")]
    InvalidTaxonomyVersion(String),

    /// A value handed to the engine contains an interior NUL byte.
    #[error("invalid engine argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EricError {
    /// The raw engine result code, if this is an engine error.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Engine { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The engine result code mapped onto the known subset.
    pub fn known_code(&self) -> Option<ErrorCode> {
        self.code().and_then(ErrorCode::from_code)
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Turn an engine result code into a `Result`. Only `0` is success.
pub fn check_result(code: i32, message: Option<String>) -> Result<(), EricError> {
    if code == ErrorCode::Ok.code() {
        Ok(())
    } else {
        Err(EricError::Engine { code, message })
    }
}
