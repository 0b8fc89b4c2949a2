use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::engine::EngineResponse;
use super::error::EricError;

pub const VALIDATION_RESPONSE_FILE: &str = "validation_response.xml";
pub const SERVER_RESPONSE_FILE: &str = "server_response.xml";

/// Paths written by [`write_responses`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFiles {
    pub validation: PathBuf,
    pub server: PathBuf,
}

/// Store both engine response documents in `log_dir`.
///
/// Both files are always written; an absent response yields an empty file.
pub fn write_responses(log_dir: &Path, response: &EngineResponse) -> Result<ResponseFiles, EricError> {
    fs::create_dir_all(log_dir).map_err(|e| EricError::io(log_dir, e))?;

    let files = ResponseFiles {
        validation: log_dir.join(VALIDATION_RESPONSE_FILE),
        server: log_dir.join(SERVER_RESPONSE_FILE),
    };
    let server = response.server_response.as_deref().unwrap_or("");

    for (path, body) in [
        (&files.validation, response.validation_response.as_str()),
        (&files.server, server),
    ] {
        if !body.is_empty() {
            info!(path = %path.display(), "logging engine response");
        }
        fs::write(path, body).map_err(|e| EricError::io(path, e))?;
    }
    Ok(files)
}
