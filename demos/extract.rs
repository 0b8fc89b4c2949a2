use std::path::Path;

use taxel::ebilanz::{Extractor, write_rows};

fn main() {
    let xml = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/ebilanz_template.xml");
    let rows = Extractor::default().extract_path(&xml).unwrap();

    for row in &rows {
        eprintln!("{:<40} {}", row.tag, row.value);
    }

    // tag,value,context on stdout
    write_rows(std::io::stdout().lock(), &rows).unwrap();
}
