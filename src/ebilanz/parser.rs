//! CSV → [`Document`] parsing.
//!
//! Expected columns (header row required):
//! - `tag`: XML tag, e.g. `ebilanz:stichtag` or `ebilanz:bilanz.summeAktiva`
//! - `value`: the value as text
//! - `context` (optional): context identifier, e.g. `context1`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::core::*;

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    context: Option<String>,
}

/// Read a CSV file and return the eBilanz document it describes.
pub fn parse_csv(path: &Path) -> Result<Document, BilanzError> {
    let file = File::open(path).map_err(|e| BilanzError::io(path, e))?;
    debug!(path = %path.display(), "parsing eBilanz CSV");
    parse_csv_reader(file)
}

/// Parse CSV from any reader.
///
/// Reserved rows (`ebilanz:stichtag`, `identifier`, `unit`) fill the master
/// data; every other row with a non-blank tag becomes a [`Position`]. Values
/// are trimmed but otherwise taken as-is.
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<Document, BilanzError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut builder = DocumentBuilder::new();
    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row = record.map_err(|e| BilanzError::Csv(format!("row {}: {e}", index + 1)))?;

        let tag = row.tag.as_deref().map(str::trim).unwrap_or("");
        let value = row.value.as_deref().map(str::trim).unwrap_or("");
        let context = row
            .context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        match classify(tag) {
            None => continue,
            Some(RowKind::Reserved(field)) => {
                trace!(?field, "master data row");
                builder.set_reserved(field, value);
            }
            Some(RowKind::Position) => builder.push_position(Position {
                tag: tag.to_string(),
                value: value.to_string(),
                context: context.map(str::to_string),
            }),
        }
    }

    debug!(positions = builder.position_count(), "parsed eBilanz rows");
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<Document, BilanzError> {
        parse_csv_reader(csv.as_bytes())
    }

    #[test]
    fn master_data_and_positions() {
        let doc = parse(
            "tag,value,context\n\
             ebilanz:stichtag,2022-12-31,\n\
             identifier,00000,\n\
             ebilanz:bilanz.summeAktiva, 500000 ,context1\n",
        )
        .unwrap();
        assert_eq!(doc.master.effective_date, "2022-12-31");
        assert_eq!(doc.master.identifier, "00000");
        assert_eq!(doc.master.unit, "EUR");
        assert_eq!(
            doc.positions,
            vec![Position::with_context(
                "ebilanz:bilanz.summeAktiva",
                "500000",
                "context1"
            )]
        );
    }

    #[test]
    fn context_column_is_optional() {
        let doc = parse(
            "tag,value\n\
             ebilanz:stichtag,2022-12-31\n\
             identifier,00000\n\
             unit,USD\n\
             ebilanz:bilanz.summeAktiva,1\n",
        )
        .unwrap();
        assert_eq!(doc.master.unit, "USD");
        assert_eq!(doc.positions[0].context, None);
    }

    #[test]
    fn blank_tags_are_skipped() {
        let doc = parse(
            "tag,value,context\n\
             ,orphan,\n\
             \"  \",orphan,\n\
             ebilanz:stichtag,2022-12-31,\n\
             identifier,00000,\n",
        )
        .unwrap();
        assert!(doc.positions.is_empty());
    }

    #[test]
    fn missing_required_rows() {
        let err = parse("tag,value\nidentifier,00000\n").unwrap_err();
        assert!(matches!(
            err,
            BilanzError::MissingRequiredField { ref field } if field == "ebilanz:stichtag"
        ));

        let err = parse("tag,value\nebilanz:stichtag,2022-12-31\n").unwrap_err();
        assert!(matches!(
            err,
            BilanzError::MissingRequiredField { ref field } if field == "identifier"
        ));
    }
}
