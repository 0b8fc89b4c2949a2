#![no_main]

use libfuzzer_sys::fuzz_target;
use taxel::ebilanz::XmlDocument;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(doc) = XmlDocument::parse(s) {
            let _ = doc.to_xml_string();
        }
    }
});
