use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use taxel::ebilanz::{extract_to_csv, generate_xml_from_csv};
use taxel::eric::native::{EricClient, EricLibrary};
use taxel::eric::{
    EngineResponse, EricConfig, EricError, ProcessRequest, SubmissionEngine, TaxonomyVersion,
    detect_version, is_supported_version, write_responses,
};

use crate::cli::{EngineArgs, EricCheckArgs, ExtractArgs, GenerateArgs, SendArgs, ValidateArgs};

/// The engine could not be loaded or initialised (exit code 2).
#[derive(Debug, thiserror::Error)]
#[error("ERiC could not be initialised: {0}")]
pub struct SetupError(#[source] pub EricError);

pub const SETUP_HINT: &str = "To fix this:\n  \
    1. Install the official ERiC distribution (Linux-x86_64) from the ELSTER developer portal.\n  \
    2. Point ERIC_HOME at the installation, for example:\n         \
       export ERIC_HOME=/opt/ERiC-41.6.2.0/Linux-x86_64\n  \
    3. Re-run the command.";

/// Map a command failure to the process exit code.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<SetupError>().is_some() { 2 } else { 1 }
}

pub fn run_extract(args: &ExtractArgs) -> Result<()> {
    let output = default_output(args.output_file.as_deref(), "output.csv");
    extract_to_csv(&args.xml_file, &output)
        .with_context(|| format!("extract {}", args.xml_file.display()))?;
    debug!(output = %output.display(), "extract finished");
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let output = default_output(args.output_file.as_deref(), "output.xml");
    debug!(
        csv = ?args.csv_file,
        template = %args.template_file.display(),
        output = %output.display(),
        "generating eBilanz XML"
    );
    generate_xml_from_csv(args.csv_file.as_deref(), &args.template_file, &output)
        .with_context(|| format!("generate from template {}", args.template_file.display()))?;
    Ok(())
}

pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let xml = read_xml(&args.engine.xml_file)?;
    let mut request = ProcessRequest::validate(xml, version(&args.engine));
    if let Some(pdf) = &args.engine.print {
        request = request.with_pdf(pdf);
    }
    run_engine(&args.engine, &request).context("validation failed")
}

pub fn run_send(args: &SendArgs) -> Result<()> {
    let xml = read_xml(&args.engine.xml_file)?;
    let mut request =
        ProcessRequest::send(xml, version(&args.engine), &args.certificate, &args.pin);
    if let Some(pdf) = &args.engine.print {
        request = request.with_pdf(pdf);
    }
    run_engine(&args.engine, &request).context("send failed")
}

pub fn run_eric_check(args: &EricCheckArgs) -> Result<()> {
    let config = EricConfig::from_overrides(args.eric_home.as_deref(), None);
    println!("Resolved ERiC home: {}", config.home.display());

    match detect_version(&config.home) {
        Some(version) => {
            println!("Detected ERiC version: {version}");
            if !is_supported_version(&version) {
                warn!(%version, "ERiC version is not in the supported set");
            }
        }
        None => println!("Detected ERiC version: unknown (could not infer from path)"),
    }

    EricLibrary::load(&config).map_err(SetupError)?;
    println!("Successfully loaded libericapi.so and liberictoolkit.so.");
    Ok(())
}

fn run_engine(args: &EngineArgs, request: &ProcessRequest) -> Result<()> {
    let config = EricConfig::from_overrides(args.eric_home.as_deref(), args.log_dir.as_deref());
    let mut client = EricClient::open(config.clone()).map_err(SetupError)?;
    let response = submit(&mut client, request, &config.log_dir)?;
    client.close()?;

    println!("Response code: {}", response.code);
    debug!(validation_response = %response.validation_response, "engine response");
    if let Some(server) = &response.server_response {
        debug!(server_response = %server, "server response");
    }
    Ok(())
}

/// Process one request and store the response documents in `log_dir`.
pub fn submit<E: SubmissionEngine>(
    engine: &mut E,
    request: &ProcessRequest,
    log_dir: &Path,
) -> Result<EngineResponse> {
    info!(version = %request.version, "processing with ERiC");
    let response = engine.process(request)?;
    write_responses(log_dir, &response)
        .with_context(|| format!("write responses to {}", log_dir.display()))?;
    Ok(response)
}

fn version(args: &EngineArgs) -> TaxonomyVersion {
    TaxonomyVersion::new(&args.tax_type, &args.tax_version)
}

fn read_xml(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn default_output(explicit: Option<&Path>, file_name: &str) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(".").join(file_name), Path::to_path_buf)
}
