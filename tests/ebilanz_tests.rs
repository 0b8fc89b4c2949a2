#![cfg(feature = "ebilanz")]

use std::path::{Path, PathBuf};

use taxel::core::*;
use taxel::ebilanz::{self, Extractor, Renderer, XmlDocument};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data").join(name)
}

fn ebilanz_name(local: &str) -> QualifiedName {
    QualifiedName::new(EBILANZ_NS, local)
}

fn filing_root(doc: &XmlDocument) -> &ebilanz::Element {
    doc.root().find(&QualifiedName::filing_root()).unwrap()
}

fn value_of(doc: &XmlDocument, local: &str) -> Option<String> {
    filing_root(doc).find_child(&ebilanz_name(local)).map(|el| el.text())
}

// --- Parsing ---

#[test]
fn parses_sample_csv() {
    let doc = ebilanz::parse_csv(&fixture("sample.csv")).unwrap();
    assert_eq!(doc.master.effective_date, "2022-12-31");
    assert_eq!(doc.master.identifier, "00000");
    assert_eq!(doc.master.unit, "EUR");
    let tags: Vec<_> = doc.positions.iter().map(|p| p.tag.as_str()).collect();
    assert_eq!(
        tags,
        [
            "ebilanz:bilanz.summeAktiva",
            "ebilanz:bilanz.summePassiva",
            "ebilanz:guv.jahresueberschuss"
        ]
    );
    assert!(doc.positions.iter().all(|p| p.context.as_deref() == Some("current")));
}

#[test]
fn context_column_is_optional() {
    let doc = ebilanz::parse_csv(&fixture("sample_no_context.csv")).unwrap();
    assert_eq!(doc.master.identifier, "12345");
    assert_eq!(doc.positions, vec![Position::new("ebilanz:bilanz.summeAktiva", "500")]);
}

#[test]
fn missing_identifier_is_rejected() {
    let err = ebilanz::parse_csv(&fixture("missing_identifier.csv")).unwrap_err();
    assert!(matches!(err, BilanzError::MissingRequiredField { ref field } if field == "identifier"));
}

#[test]
fn missing_csv_is_an_io_error() {
    let err = ebilanz::parse_csv(&fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, BilanzError::Io { .. }));
}

// --- Rendering ---

#[test]
fn renders_sample_into_template() {
    let doc = ebilanz::parse_csv(&fixture("sample.csv")).unwrap();
    let xml = ebilanz::render_ebilanz(&doc, &fixture("ebilanz_template.xml")).unwrap();

    assert_eq!(value_of(&xml, "stichtag").as_deref(), Some("2022-12-31"));
    assert_eq!(value_of(&xml, "bilanz.summeAktiva").as_deref(), Some("12345.67"));
    assert_eq!(value_of(&xml, "bilanz.summePassiva").as_deref(), Some("12345.67"));
    assert_eq!(value_of(&xml, "guv.jahresueberschuss").as_deref(), Some("1000.00"));

    let root = filing_root(&xml);
    let count = |local: &str| root.child_elements().filter(|el| el.name().local == local).count();
    assert_eq!(count("stichtag"), 1);
    assert_eq!(count("bilanz.summeAktiva"), 1);

    let text = xml.to_xml_string().unwrap();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(text.contains("<!-- balance sheet totals -->"));
    assert!(text.contains("<Verfahren>ElsterBilanz</Verfahren>"));
    assert!(text.contains("<ebilanz:bilanz.summePassiva>12345.67</ebilanz:bilanz.summePassiva>"));
    assert!(!text.contains("xmlns:ns0"));
}

#[test]
fn created_positions_follow_existing_children() {
    let doc = ebilanz::parse_csv(&fixture("sample.csv")).unwrap();
    let xml = ebilanz::render_ebilanz(&doc, &fixture("ebilanz_template.xml")).unwrap();
    let names: Vec<_> = filing_root(&xml)
        .child_elements()
        .map(|el| el.name().local.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "stichtag",
            "bilanz.summeAktiva",
            "bilanz.summePassiva",
            "guv.jahresueberschuss"
        ]
    );
}

#[test]
fn rendering_is_idempotent() {
    let doc = ebilanz::parse_csv(&fixture("sample.csv")).unwrap();
    let renderer = Renderer::default();
    let once = renderer
        .render(&doc, &fixture("ebilanz_template.xml"))
        .unwrap()
        .to_xml_string()
        .unwrap();
    let twice = renderer
        .render_str(&doc, &once)
        .unwrap()
        .to_xml_string()
        .unwrap();
    assert_eq!(once, twice);
}

#[test]
fn template_without_filing_root_fails() {
    let doc = ebilanz::parse_csv(&fixture("sample.csv")).unwrap();
    let err = ebilanz::render_ebilanz(&doc, &fixture("no_filing_root.xml")).unwrap_err();
    assert!(matches!(err, BilanzError::TemplateStructure(_)));
}

#[test]
fn unknown_prefix_fails_before_writing() {
    let doc = Document::new(
        MasterData::new("2022-12-31", "00000"),
        vec![
            Position::new("ebilanz:bilanz.summeAktiva", "1"),
            Position::new("gaap:bs.ass", "2"),
        ],
    );
    let err = ebilanz::render_ebilanz(&doc, &fixture("ebilanz_template.xml")).unwrap_err();
    assert!(matches!(err, BilanzError::UnknownNamespacePrefix { ref prefix, .. } if prefix == "gaap"));
}

#[test]
fn filing_root_may_be_the_document_element() {
    let template = r#"<ebilanz:EBilanz xmlns:ebilanz="http://rzf.fin-nrw.de/RMS/EBilanz/2016/XMLSchema"/>"#;
    let doc = Document::new(
        MasterData::new("2022-12-31", "00000"),
        vec![Position::new("ebilanz:bilanz.summeAktiva", "7")],
    );
    let xml = Renderer::default().render_str(&doc, template).unwrap();
    assert_eq!(value_of(&xml, "bilanz.summeAktiva").as_deref(), Some("7"));
}

#[test]
fn values_are_escaped() {
    let doc = Document::new(
        MasterData::new("2022-12-31", "00000"),
        vec![Position::new("ebilanz:note", "A & B <GmbH>")],
    );
    let xml = ebilanz::render_ebilanz(&doc, &fixture("ebilanz_template.xml")).unwrap();
    let text = xml.to_xml_string().unwrap();
    assert!(text.contains("<ebilanz:note>A &amp; B &lt;GmbH&gt;</ebilanz:note>"));
    let reparsed = XmlDocument::parse(&text).unwrap();
    assert_eq!(value_of(&reparsed, "note").as_deref(), Some("A & B <GmbH>"));
}

// --- Extraction ---

#[test]
fn extracts_template_values() {
    let rows = Extractor::default()
        .extract_path(&fixture("ebilanz_template.xml"))
        .unwrap();
    let find = |tag: &str| rows.iter().find(|r| r.tag == tag).map(|r| r.value.as_str());
    assert_eq!(find("Verfahren"), Some("ElsterBilanz"));
    assert_eq!(find("Empfaenger"), Some("5101"));
    assert_eq!(find("ebilanz:stichtag"), Some("2000-01-01"));
    assert_eq!(find("ebilanz:bilanz.summeAktiva"), Some("0"));
    assert_eq!(find("TransportSchluessel"), None);
    assert!(rows.iter().all(|r| r.context.is_none()));
}

// --- File operations ---

#[test]
fn generate_then_extract_files() {
    let dir = tempfile::tempdir().unwrap();
    let xml_out = dir.path().join("out").join("ebilanz.xml");
    let csv_out = dir.path().join("out").join("values.csv");

    ebilanz::generate_xml_from_csv(
        Some(fixture("sample.csv").as_path()),
        &fixture("ebilanz_template.xml"),
        &xml_out,
    )
    .unwrap();
    ebilanz::extract_to_csv(&xml_out, &csv_out).unwrap();

    let csv = std::fs::read_to_string(&csv_out).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("tag,value,context"));
    assert!(csv.contains("ebilanz:stichtag,2022-12-31,\n"));
    assert!(csv.contains("ebilanz:guv.jahresueberschuss,1000.00,\n"));
    assert!(csv.contains("Verfahren,ElsterBilanz,\n"));
}

#[test]
fn generate_without_csv_blanks_the_cutoff_date() {
    let dir = tempfile::tempdir().unwrap();
    let xml_out = dir.path().join("template_only.xml");
    ebilanz::generate_xml_from_csv(None, &fixture("ebilanz_template.xml"), &xml_out).unwrap();

    let xml = XmlDocument::from_path(&xml_out).unwrap();
    assert_eq!(value_of(&xml, "stichtag").as_deref(), Some(""));
    assert_eq!(value_of(&xml, "bilanz.summeAktiva").as_deref(), Some("0"));
}

#[test]
fn csv_rows_into_empty_filing_root() {
    let csv = "tag,value,context\n\
               ebilanz:stichtag,2022-12-31,\n\
               identifier,00000,\n\
               ebilanz:bilanz.summeAktiva,500000,\n";
    let template = r#"<?xml version="1.0" encoding="UTF-8"?>
<Elster xmlns="http://www.elster.de/elsterxml/schema/v11">
  <ebilanz:EBilanz xmlns:ebilanz="http://rzf.fin-nrw.de/RMS/EBilanz/2016/XMLSchema"></ebilanz:EBilanz>
</Elster>"#;

    let doc = ebilanz::parse_csv_reader(csv.as_bytes()).unwrap();
    let xml = Renderer::default().render_str(&doc, template).unwrap();

    let root = filing_root(&xml);
    let stichtag = root.find_child(&ebilanz_name("stichtag")).unwrap();
    assert_eq!(stichtag.text(), "2022-12-31");
    let aktiva = root.find_child(&ebilanz_name("bilanz.summeAktiva")).unwrap();
    assert_eq!(aktiva.text(), "500000");
}
