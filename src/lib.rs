//! # taxel
//!
//! Tooling for German E-Bilanz filings: converts tabular financial data to
//! and from the ELSTER eBilanz XML format, and hands finished documents to
//! the ERiC validation/submission engine.
//!
//! Values are carried as text end to end; numeric and date formats are
//! checked by ERiC, not here.
//!
//! ## Quick Start
//!
//! ```rust
//! use taxel::core::*;
//! use taxel::ebilanz::Renderer;
//!
//! let doc = DocumentBuilder::new()
//!     .effective_date("2022-12-31")
//!     .identifier("00000")
//!     .add_position(Position::new("ebilanz:bilanz.summeAktiva", "500000"))
//!     .build()
//!     .unwrap();
//!
//! let template = r#"<Elster xmlns="http://www.elster.de/elsterxml/schema/v11">
//!   <ebilanz:EBilanz xmlns:ebilanz="http://rzf.fin-nrw.de/RMS/EBilanz/2016/XMLSchema"/>
//! </Elster>"#;
//!
//! let xml = Renderer::default().render_str(&doc, template).unwrap();
//! let text = xml.to_xml_string().unwrap();
//! assert!(text.contains("<ebilanz:stichtag>2022-12-31</ebilanz:stichtag>"));
//! assert!(text.contains("<ebilanz:bilanz.summeAktiva>500000</ebilanz:bilanz.summeAktiva>"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, row classification, namespace registry |
//! | `ebilanz` (default) | CSV parser, template renderer, XML extractor |
//! | `eric` | ERiC engine contract, result codes, configuration |
//! | `eric-native` | Dynamic binding to the ERiC shared libraries |
//! | `cli` | The `taxel` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "ebilanz")]
pub mod ebilanz;

#[cfg(feature = "eric")]
pub mod eric;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
