//! Command-line arguments for `taxel`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser)]
#[command(
    name = "taxel",
    version,
    about = "eBilanz tooling: CSV <-> XML conversion and ERiC validation/submission",
    long_about = "Convert eBilanz positions between CSV and ELSTER XML, and validate or send\n\
                  the resulting filing through the ERiC library.\n\n\
                  ERiC is located through --eric-home, the ERIC_HOME environment variable,\n\
                  or ./ERiC/Linux-x86_64."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract values from an XML file into CSV.
    Extract(ExtractArgs),

    /// Generate eBilanz XML from a CSV file and a template.
    Generate(GenerateArgs),

    /// Validate eBilanz XML with ERiC.
    Validate(ValidateArgs),

    /// Validate and send eBilanz XML with ERiC, signed with a certificate.
    Send(SendArgs),

    /// Check the ERiC installation.
    EricCheck(EricCheckArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// XML file to extract from.
    #[arg(long = "xml-file", value_name = "PATH")]
    pub xml_file: PathBuf,

    /// Output CSV (default: ./output.csv).
    #[arg(long = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Input CSV with `tag,value[,context]` rows. Without it the template is
    /// written back with an empty cutoff date.
    #[arg(long = "csv-file", value_name = "PATH")]
    pub csv_file: Option<PathBuf>,

    /// eBilanz XML template.
    #[arg(long = "template-file", value_name = "PATH")]
    pub template_file: PathBuf,

    /// Output XML (default: ./output.xml).
    #[arg(long = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,
}

/// Options shared by `validate` and `send`.
#[derive(Args)]
pub struct EngineArgs {
    /// XML file to process.
    #[arg(long = "xml-file", value_name = "PATH")]
    pub xml_file: PathBuf,

    #[arg(long = "tax-type", default_value = "Bilanz")]
    pub tax_type: String,

    #[arg(long = "tax-version", default_value = "6.5")]
    pub tax_version: String,

    /// Directory for ERiC logs and response documents (default: current directory).
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// ERiC installation root (overrides ERIC_HOME).
    #[arg(long = "eric-home", value_name = "DIR")]
    pub eric_home: Option<PathBuf>,

    /// Also render the filing as PDF.
    #[arg(long = "print", value_name = "PDF")]
    pub print: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// PFX certificate used to sign the transmission.
    #[arg(long = "certificate", value_name = "PATH")]
    pub certificate: PathBuf,

    /// PIN for the certificate.
    #[arg(long = "pin")]
    pub pin: String,
}

#[derive(Args)]
pub struct EricCheckArgs {
    /// ERiC installation root (overrides ERIC_HOME).
    #[arg(long = "eric-home", value_name = "DIR")]
    pub eric_home: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
}
