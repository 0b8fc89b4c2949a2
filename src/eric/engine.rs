use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::codes::ErrorCode;
use super::error::EricError;

/// Taxonomy identifier handed to the engine as `datenartVersion`,
/// rendered `<TaxType>_<TaxVersion>` (e.g. `Bilanz_6.5`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonomyVersion {
    pub tax_type: String,
    pub tax_version: String,
}

impl TaxonomyVersion {
    pub fn new(tax_type: impl Into<String>, tax_version: impl Into<String>) -> Self {
        Self {
            tax_type: tax_type.into(),
            tax_version: tax_version.into(),
        }
    }
}

impl Default for TaxonomyVersion {
    fn default() -> Self {
        Self::new("Bilanz", "6.5")
    }
}

impl fmt::Display for TaxonomyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.tax_type, self.tax_version)
    }
}

impl FromStr for TaxonomyVersion {
    type Err = EricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().rsplit_once('_') {
            Some((tax_type, tax_version)) if !tax_type.is_empty() && !tax_version.is_empty() => {
                Ok(Self::new(tax_type, tax_version))
            }
            _ => Err(EricError::InvalidTaxonomyVersion(s.to_string())),
        }
    }
}

/// What the engine should do with a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessMode {
    /// Plausibility check only.
    Validate,
    /// Validate, then transmit signed with the given certificate.
    Send { certificate: PathBuf, pin: String },
}

/// Optional PDF rendition of the filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRequest {
    pub pdf_path: PathBuf,
    /// Watermarked preview instead of the final confirmation.
    pub preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub xml: String,
    pub version: TaxonomyVersion,
    pub mode: ProcessMode,
    pub print: Option<PrintRequest>,
}

impl ProcessRequest {
    pub fn validate(xml: impl Into<String>, version: TaxonomyVersion) -> Self {
        Self {
            xml: xml.into(),
            version,
            mode: ProcessMode::Validate,
            print: None,
        }
    }

    pub fn send(
        xml: impl Into<String>,
        version: TaxonomyVersion,
        certificate: impl Into<PathBuf>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            xml: xml.into(),
            version,
            mode: ProcessMode::Send {
                certificate: certificate.into(),
                pin: pin.into(),
            },
            print: None,
        }
    }

    /// Request a PDF. Validation produces a preview, sending the final copy.
    pub fn with_pdf(mut self, pdf_path: impl Into<PathBuf>) -> Self {
        self.print = Some(PrintRequest {
            pdf_path: pdf_path.into(),
            preview: matches!(self.mode, ProcessMode::Validate),
        });
        self
    }
}

/// What the engine handed back for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineResponse {
    pub code: i32,
    pub validation_response: String,
    pub server_response: Option<String>,
    pub transfer_handle: Option<u32>,
    pub pdf_path: Option<PathBuf>,
}

impl EngineResponse {
    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Ok.code()
    }
}

/// The validation/submission engine.
///
/// The engine is opaque: callers only distinguish success from failure
/// and forward the response documents.
pub trait SubmissionEngine {
    fn process(&mut self, request: &ProcessRequest) -> Result<EngineResponse, EricError>;
}

impl<E: SubmissionEngine + ?Sized> SubmissionEngine for &mut E {
    fn process(&mut self, request: &ProcessRequest) -> Result<EngineResponse, EricError> {
        (**self).process(request)
    }
}
