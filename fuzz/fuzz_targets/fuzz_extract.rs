#![no_main]

use libfuzzer_sys::fuzz_target;
use taxel::ebilanz::{Extractor, write_rows};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(rows) = Extractor::default().extract_str(s) {
            let mut out = Vec::new();
            let _ = write_rows(&mut out, &rows);
        }
    }
});
