#![no_main]

use libfuzzer_sys::fuzz_target;
use taxel::ebilanz::{Renderer, parse_csv_reader};

const TEMPLATE: &str = r#"<Elster xmlns="http://www.elster.de/elsterxml/schema/v11"><ebilanz:EBilanz xmlns:ebilanz="http://rzf.fin-nrw.de/RMS/EBilanz/2016/XMLSchema"/></Elster>"#;

fuzz_target!(|data: &[u8]| {
    // Arbitrary CSV must either be rejected or render to a serializable tree.
    if let Ok(doc) = parse_csv_reader(data) {
        if let Ok(xml) = Renderer::default().render_str(&doc, TEMPLATE) {
            let _ = xml.to_xml_string();
        }
    }
});
