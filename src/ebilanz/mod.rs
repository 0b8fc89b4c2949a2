//! eBilanz CSV ↔ XML transformation.
//!
//! Two independent directions:
//!
//! - **generate**: CSV → [`Document`](crate::core::Document) → template merge → XML
//!   ([`parse_csv`], [`Renderer`])
//! - **extract**: XML → flat `tag,value,context` rows → CSV
//!   ([`Extractor`], [`write_rows`])
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use taxel::ebilanz;
//!
//! let doc = ebilanz::parse_csv(Path::new("sample.csv")).unwrap();
//! let xml = ebilanz::render_ebilanz(&doc, Path::new("ebilanz.xml")).unwrap();
//! xml.write_to_path(Path::new("out.xml")).unwrap();
//! ```

mod csv_export;
mod extract;
mod parser;
mod renderer;
mod xml_tree;

use std::path::Path;

use tracing::info;

use crate::core::{BilanzError, Document};

pub use csv_export::{write_rows, write_rows_to_path};
pub use extract::Extractor;
pub use parser::{parse_csv, parse_csv_reader};
pub use renderer::{Renderer, render_ebilanz};
pub use xml_tree::{Element, MAX_DEPTH, Node, XmlDocument};

/// Generate an eBilanz XML file from a CSV file and a template.
///
/// Without a CSV the template is rendered with blank master data.
pub fn generate_xml_from_csv(
    csv_path: Option<&Path>,
    template_path: &Path,
    output_path: &Path,
) -> Result<(), BilanzError> {
    let doc = match csv_path {
        Some(path) => parse_csv(path)?,
        None => Document::template_only(),
    };
    let xml = render_ebilanz(&doc, template_path)?;
    xml.write_to_path(output_path)?;
    info!(output = %output_path.display(), "wrote eBilanz XML");
    Ok(())
}

/// Extract all text-bearing elements of an XML file into a CSV file.
pub fn extract_to_csv(xml_path: &Path, output_path: &Path) -> Result<(), BilanzError> {
    let rows = Extractor::default().extract_path(xml_path)?;
    write_rows_to_path(output_path, &rows)?;
    info!(output = %output_path.display(), rows = rows.len(), "wrote CSV");
    Ok(())
}
