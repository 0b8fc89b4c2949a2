//! Property-based tests for the generate → extract round trip.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "ebilanz")]

use std::collections::BTreeMap;

use proptest::prelude::*;
use taxel::core::*;
use taxel::ebilanz::{self, Extractor, Renderer};

const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Elster xmlns="http://www.elster.de/elsterxml/schema/v11">
  <ebilanz:EBilanz xmlns:ebilanz="http://rzf.fin-nrw.de/RMS/EBilanz/2016/XMLSchema"/>
</Elster>"#;

fn arb_local() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,8}(\\.[a-zA-Z0-9]{1,8}){0,3}"
}

fn arb_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9&<>.,\"'-]([A-Za-z0-9&<>.,\"' -]{0,16}[A-Za-z0-9&<>.,\"'-])?"
}

fn arb_positions() -> impl Strategy<Value = BTreeMap<String, String>> {
    let local = arb_local().prop_filter("reserved tag", |l| l != "stichtag");
    prop::collection::btree_map(local, arb_value(), 0..20)
}

fn document(date: &str, positions: &BTreeMap<String, String>) -> Document {
    Document::new(
        MasterData::new(date, "00000"),
        positions
            .iter()
            .map(|(local, value)| Position::new(format!("ebilanz:{local}"), value.clone()))
            .collect(),
    )
}

proptest! {
    /// Every rendered position comes back from extraction with its value.
    #[test]
    fn generate_extract_roundtrip(
        date in "20[0-9]{2}-(0[1-9]|1[0-2])-[0-2][1-9]",
        positions in arb_positions(),
    ) {
        let doc = document(&date, &positions);
        let xml = Renderer::default().render_str(&doc, TEMPLATE).unwrap();
        let text = xml.to_xml_string().unwrap();
        let rows = Extractor::default().extract_str(&text).unwrap();

        let mut expected = vec![TabularRow::new("ebilanz:stichtag", date.clone())];
        expected.extend(doc.positions.iter().map(TabularRow::from));
        prop_assert_eq!(rows, expected);
    }

    /// Rendering an already rendered document changes nothing.
    #[test]
    fn rendering_twice_is_stable(positions in arb_positions()) {
        let doc = document("2022-12-31", &positions);
        let renderer = Renderer::default();
        let once = renderer.render_str(&doc, TEMPLATE).unwrap().to_xml_string().unwrap();
        let twice = renderer.render_str(&doc, &once).unwrap().to_xml_string().unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Rows written as CSV parse back into the same document.
    #[test]
    fn csv_rows_parse_back(positions in arb_positions()) {
        let doc = document("2022-12-31", &positions);
        let mut rows = vec![
            TabularRow::new("ebilanz:stichtag", "2022-12-31"),
            TabularRow::new("identifier", "00000"),
        ];
        rows.extend(doc.positions.iter().map(TabularRow::from));

        let mut csv = Vec::new();
        ebilanz::write_rows(&mut csv, &rows).unwrap();
        let parsed = ebilanz::parse_csv_reader(csv.as_slice()).unwrap();
        prop_assert_eq!(parsed, doc);
    }
}
