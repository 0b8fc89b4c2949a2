//! Validate an eBilanz XML file with a local ERiC installation.
//!
//! ```sh
//! ERIC_HOME=/opt/ERiC-41.6.2.0/Linux-x86_64 cargo run --example validate --features eric-native -- filing.xml
//! ```

use std::path::PathBuf;

use taxel::eric::native::EricClient;
use taxel::eric::*;

fn main() {
    let xml_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/ebilanz_template.xml")));
    let xml = std::fs::read_to_string(&xml_path).unwrap();

    let config = EricConfig::from_overrides(None, None);
    println!("ERiC home: {}", config.home.display());

    let mut client = match EricClient::open(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERiC setup failed: {e}");
            std::process::exit(2);
        }
    };

    match client.process(&ProcessRequest::validate(xml, TaxonomyVersion::default())) {
        Ok(response) => {
            println!("Validation return code: {}", response.code);
            println!("Validation response:\n{}", response.validation_response);
            if let Some(server) = &response.server_response {
                println!("Server response:\n{server}");
            }
        }
        Err(e) => {
            eprintln!("Validation failed: {e}");
            std::process::exit(1);
        }
    }
}
