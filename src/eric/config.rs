//! Locating the ERiC distribution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming the ERiC installation root.
pub const ERIC_HOME_ENV: &str = "ERIC_HOME";

/// Fallback installation root, relative to the working directory.
pub const DEFAULT_ERIC_HOME: &str = "ERiC/Linux-x86_64";

/// ERiC releases whose parameter struct layouts this crate targets.
pub const SUPPORTED_ERIC_VERSIONS: &[&str] = &["41.6.2.0"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EricConfig {
    /// Installation root, also the plugin search path.
    pub home: PathBuf,
    /// Directory for `eric.log` and the response documents.
    pub log_dir: PathBuf,
}

impl Default for EricConfig {
    fn default() -> Self {
        Self {
            home: Self::resolve_home(None),
            log_dir: PathBuf::from("."),
        }
    }
}

impl EricConfig {
    pub fn new(home: impl Into<PathBuf>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            log_dir: log_dir.into(),
        }
    }

    /// Build from optional overrides, falling back to `ERIC_HOME` and the
    /// working directory.
    pub fn from_overrides(home: Option<&Path>, log_dir: Option<&Path>) -> Self {
        Self {
            home: Self::resolve_home(home),
            log_dir: log_dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        }
    }

    /// Precedence: explicit path, then `ERIC_HOME`, then `./ERiC/Linux-x86_64`.
    pub fn resolve_home(explicit: Option<&Path>) -> PathBuf {
        pick_home(explicit, std::env::var_os(ERIC_HOME_ENV))
    }

    pub fn api_library_path(&self) -> PathBuf {
        self.home.join("lib").join("libericapi.so")
    }

    pub fn toolkit_library_path(&self) -> PathBuf {
        self.home.join("erictoolkit").join("liberictoolkit.so")
    }
}

fn pick_home(explicit: Option<&Path>, env: Option<OsString>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_ERIC_HOME),
    }
}

/// Read the ERiC release from an `ERiC-<a.b.c.d>` component of `home`.
pub fn detect_version(home: &Path) -> Option<String> {
    home.components().rev().find_map(|component| {
        let name = component.as_os_str().to_str()?;
        let version = name.strip_prefix("ERiC-")?;
        let parts: Vec<_> = version.split('.').collect();
        let numeric = parts.len() == 4
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
        numeric.then(|| version.to_string())
    })
}

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_ERIC_VERSIONS.contains(&version)
}
