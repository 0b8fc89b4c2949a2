//! Writing `tag,value,context` rows.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::{BilanzError, TabularRow};

/// Write rows with a `tag,value,context` header. An absent context is an
/// empty field.
pub fn write_rows<W: Write>(writer: W, rows: &[TabularRow]) -> Result<(), BilanzError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["tag", "value", "context"])
        .map_err(csv_err)?;
    for row in rows {
        csv_writer
            .write_record([
                row.tag.as_str(),
                row.value.as_str(),
                row.context.as_deref().unwrap_or(""),
            ])
            .map_err(csv_err)?;
    }
    csv_writer
        .flush()
        .map_err(|e| BilanzError::Csv(format!("flush failed: {e}")))
}

/// Write rows to a file, creating parent directories as needed.
pub fn write_rows_to_path(path: &Path, rows: &[TabularRow]) -> Result<(), BilanzError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BilanzError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| BilanzError::io(path, e))?;
    write_rows(file, rows)
}

fn csv_err(e: csv::Error) -> BilanzError {
    BilanzError::Csv(e.to_string())
}
