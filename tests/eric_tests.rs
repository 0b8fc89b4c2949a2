#![cfg(feature = "eric")]

use std::path::{Path, PathBuf};

use taxel::eric::*;

/// Records requests and answers with a canned response.
struct RecordingEngine {
    code: i32,
    seen: Vec<(TaxonomyVersion, ProcessingFlags)>,
}

impl RecordingEngine {
    fn new(code: i32) -> Self {
        Self { code, seen: Vec::new() }
    }
}

impl SubmissionEngine for RecordingEngine {
    fn process(&mut self, request: &ProcessRequest) -> Result<EngineResponse, EricError> {
        self.seen
            .push((request.version.clone(), ProcessingFlags::for_request(request)));
        check_result(self.code, Some("Die Datenart ist unbekannt".into()))?;
        let sent = matches!(request.mode, ProcessMode::Send { .. });
        Ok(EngineResponse {
            code: self.code,
            validation_response: "<EricBearbeiteVorgang><Erfolg/></EricBearbeiteVorgang>".into(),
            server_response: sent.then(|| "<Elster><TransferHeader/></Elster>".into()),
            transfer_handle: sent.then_some(17),
            pdf_path: request.print.as_ref().map(|p| p.pdf_path.clone()),
        })
    }
}

// --- Result codes ---

#[test]
fn zero_is_the_only_success() {
    assert!(check_result(0, None).is_ok());
    let err = check_result(610001002, Some("Plausibilitaetsfehler".into())).unwrap_err();
    assert_eq!(err.to_string(), "ERiC error 610001002: Plausibilitaetsfehler");
    assert_eq!(err.code(), Some(610001002));
    assert_eq!(err.known_code(), Some(ErrorCode::GlobalPruefFehler));
}

#[test]
fn known_codes() {
    assert_eq!(ErrorCode::GlobalUnknown.code(), 610001001);
    assert_eq!(ErrorCode::GlobalTransferhandleNichtInitialisiert.code(), 610001078);
    assert_eq!(
        ErrorCode::from_code(610001044),
        Some(ErrorCode::GlobalDatenartversionXmlInkonsistent)
    );
}

// --- Requests ---

#[test]
fn flags_follow_the_request() {
    let version = TaxonomyVersion::default();
    let validate = ProcessRequest::validate("<Elster/>", version.clone());
    assert_eq!(ProcessingFlags::for_request(&validate).bits(), 2);

    let print = validate.clone().with_pdf("preview.pdf");
    assert_eq!(ProcessingFlags::for_request(&print).bits(), 2 | 32);

    let send = ProcessRequest::send("<Elster/>", version, "cert.pfx", "123456");
    assert_eq!(ProcessingFlags::for_request(&send).bits(), 2 | 4);
    assert_eq!(
        ProcessingFlags::for_request(&send.with_pdf("confirmation.pdf")).bits(),
        2 | 4 | 32
    );
}

#[test]
fn taxonomy_version_strings() {
    let v: TaxonomyVersion = "Bilanz_6.7".parse().unwrap();
    assert_eq!(v.tax_type, "Bilanz");
    assert_eq!(v.tax_version, "6.7");
    assert_eq!(TaxonomyVersion::new("Bilanz", "6.5").to_string(), "Bilanz_6.5");
    assert!(matches!(
        "Bilanz6.5".parse::<TaxonomyVersion>(),
        Err(EricError::InvalidTaxonomyVersion(_))
    ));
}

// --- Engine contract ---

#[test]
fn engine_success_and_responses() {
    let mut engine = RecordingEngine::new(0);
    let request = ProcessRequest::send(
        "<Elster/>",
        TaxonomyVersion::default(),
        "cert.pfx",
        "123456",
    );
    let response = engine.process(&request).unwrap();
    assert!(response.is_success());
    assert_eq!(response.transfer_handle, Some(17));
    assert_eq!(
        engine.seen,
        vec![(TaxonomyVersion::default(), ProcessingFlags::VALIDATE | ProcessingFlags::SEND)]
    );

    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let files = write_responses(&log_dir, &response).unwrap();
    assert_eq!(files.validation, log_dir.join(VALIDATION_RESPONSE_FILE));
    assert_eq!(
        std::fs::read_to_string(&files.validation).unwrap(),
        response.validation_response
    );
    assert_eq!(
        std::fs::read_to_string(&files.server).unwrap(),
        "<Elster><TransferHeader/></Elster>"
    );
}

#[test]
fn engine_failure_carries_code() {
    let mut engine = RecordingEngine::new(610001042);
    let err = engine
        .process(&ProcessRequest::validate("<Elster/>", TaxonomyVersion::new("Bilanz", "9.9")))
        .unwrap_err();
    assert_eq!(err.known_code(), Some(ErrorCode::GlobalDatenartversionUnbekannt));
}

#[test]
fn absent_server_response_leaves_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(SERVER_RESPONSE_FILE), "stale").unwrap();
    let response = EngineResponse {
        validation_response: "<ok/>".into(),
        ..Default::default()
    };
    let files = write_responses(dir.path(), &response).unwrap();
    assert_eq!(std::fs::read_to_string(files.server).unwrap(), "");
}

// --- Configuration ---

#[test]
fn explicit_home_wins() {
    let home = Path::new("/opt/ERiC-41.6.2.0/Linux-x86_64");
    let config = EricConfig::from_overrides(Some(home), Some(Path::new("logs")));
    assert_eq!(config.home, home);
    assert_eq!(config.log_dir, PathBuf::from("logs"));
    assert_eq!(
        config.api_library_path(),
        home.join("lib").join("libericapi.so")
    );
    assert_eq!(detect_version(&config.home).as_deref(), Some("41.6.2.0"));
    assert!(is_supported_version("41.6.2.0"));
}

#[test]
fn unversioned_home() {
    assert_eq!(detect_version(Path::new(DEFAULT_ERIC_HOME)), None);
}

// --- Native loader ---

#[cfg(feature = "eric-native")]
#[test]
fn missing_library_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = EricConfig::new(dir.path(), dir.path());
    let err = native::EricLibrary::load(&config).unwrap_err();
    match err {
        EricError::LibraryLoad { path, reason } => {
            assert_eq!(path, config.api_library_path());
            assert!(reason.contains(ERIC_HOME_ENV));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(feature = "eric-native")]
#[test]
fn client_open_fails_without_installation() {
    let dir = tempfile::tempdir().unwrap();
    let result = native::EricClient::open(EricConfig::new(dir.path().join("nope"), dir.path()));
    assert!(matches!(result, Err(EricError::LibraryLoad { .. })));
}
