//! ERiC engine integration.
//!
//! ERiC is the tax administration's closed-source validation and
//! transmission library. This module defines the contract the rest of the
//! crate uses ([`SubmissionEngine`]), the engine's result codes and flags,
//! and where to find an installation ([`EricConfig`]).
//!
//! The native binding lives in [`native`] behind the `eric-native` feature.
//!
//! # Example
//!
//! ```
//! use taxel::eric::*;
//!
//! let request = ProcessRequest::validate("<Elster/>", TaxonomyVersion::default());
//! assert_eq!(request.version.to_string(), "Bilanz_6.5");
//! assert_eq!(ProcessingFlags::for_request(&request), ProcessingFlags::VALIDATE);
//! ```

mod codes;
mod config;
mod engine;
mod error;
mod log;

#[cfg(feature = "eric-native")]
pub mod native;

pub use codes::{ErrorCode, ProcessingFlags};
pub use config::{
    DEFAULT_ERIC_HOME, ERIC_HOME_ENV, EricConfig, SUPPORTED_ERIC_VERSIONS, detect_version,
    is_supported_version,
};
pub use engine::{
    EngineResponse, PrintRequest, ProcessMode, ProcessRequest, SubmissionEngine, TaxonomyVersion,
};
pub use error::{EricError, check_result};
pub use log::{ResponseFiles, SERVER_RESPONSE_FILE, VALIDATION_RESPONSE_FILE, write_responses};
