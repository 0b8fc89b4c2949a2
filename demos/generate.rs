use std::path::Path;

use taxel::core::*;
use taxel::ebilanz::{self, Renderer};

fn main() {
    // Master data and positions, as they would come from a CSV export
    let doc = DocumentBuilder::new()
        .effective_date("2022-12-31")
        .identifier("00000")
        .add_position(Position::with_context("ebilanz:bilanz.summeAktiva", "12345.67", "current"))
        .add_position(Position::with_context("ebilanz:bilanz.summePassiva", "12345.67", "current"))
        .add_position(Position::with_context("ebilanz:guv.jahresueberschuss", "1000.00", "current"))
        .build()
        .unwrap();

    let template = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/ebilanz_template.xml");
    let xml = Renderer::default().render(&doc, &template).unwrap();
    println!("{}", xml.to_xml_string().unwrap());

    // Or straight from file to file
    let out = std::env::temp_dir().join("taxel-demo.xml");
    let csv = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/sample.csv");
    ebilanz::generate_xml_from_csv(Some(csv.as_path()), &template, &out).unwrap();
    eprintln!("wrote {}", out.display());
}
