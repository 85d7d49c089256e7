//! CPU capability detection CLI.
//!
//! Thin front end over the library's public query surface:
//! - `list`: registry enumeration
//! - `detect`: run the probe pipeline on this host
//! - `has`: script-friendly single capability check
//! - `scalar`: read one identification field
//! - `parse-cpuinfo`: offline text-prober run over a captured file

use cf_common::{Error, OutputFormat};
use cf_core::exit_codes::ExitCode;
use cf_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use cf_core::platform::platform_strings;
use cf_core::probe::CpuInfoProber;
use cf_core::report::{DetectionReport, RegistryReport};
use cf_core::{
    detect_with, Architecture, DetectConfig, Pipeline, Registry, Snapshot, SourceKind,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Report which hardware capabilities this CPU and OS support
#[derive(Parser)]
#[command(name = "cf-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every capability the registry defines
    List(ArchArgs),

    /// Probe this host and print the detected capabilities
    Detect(DetectArgs),

    /// Exit 0 if a capability is supported, 1 if not
    Has(HasArgs),

    /// Print a scalar field such as the CPU part number
    Scalar(ScalarArgs),

    /// Run the cpuinfo prober over a captured file
    ParseCpuinfo(ParseCpuinfoArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct ArchArgs {
    /// Architecture (ppc, aarch64); defaults to the host
    #[arg(long)]
    arch: Option<Architecture>,
}

#[derive(Args, Debug)]
struct DetectArgs {
    #[command(flatten)]
    arch: ArchArgs,

    /// Show what each capability source contributed
    #[arg(long)]
    provenance: bool,

    /// Skip a capability source (repeatable)
    #[arg(long = "disable-source", value_enum)]
    disable_source: Vec<SourceKind>,
}

#[derive(Args, Debug)]
struct HasArgs {
    /// Capability or scalar field name, e.g. altivec
    name: String,

    #[command(flatten)]
    arch: ArchArgs,
}

#[derive(Args, Debug)]
struct ScalarArgs {
    /// Scalar field name, e.g. part
    name: String,

    #[command(flatten)]
    arch: ArchArgs,
}

#[derive(Args, Debug)]
struct ParseCpuinfoArgs {
    /// cpuinfo file to scan
    file: PathBuf,

    #[command(flatten)]
    arch: ArchArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_flags(cli.global.verbose, cli.global.quiet),
        cli.global.format.is_machine().then_some(LogFormat::Json),
    );
    init_logging(&log_config);

    let result = match &cli.command {
        Commands::List(args) => run_list(&cli.global, args),
        Commands::Detect(args) => run_detect(&cli.global, args),
        Commands::Has(args) => run_has(&cli.global, args),
        Commands::Scalar(args) => run_scalar(&cli.global, args),
        Commands::ParseCpuinfo(args) => run_parse_cpuinfo(&cli.global, args),
        Commands::Version => {
            println!("cf-core {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::Clean)
        }
    };

    let exit_code = result.unwrap_or_else(|err| output_error(&cli.global, &err));
    exit_code.into()
}

// ============================================================================
// Command implementations
// ============================================================================

impl ArchArgs {
    fn resolve(&self) -> Result<Architecture, Error> {
        self.arch
            .or_else(Architecture::host)
            .ok_or_else(|| Error::UnsupportedArchitecture(std::env::consts::ARCH.to_string()))
    }
}

fn run_list(global: &GlobalOpts, args: &ArchArgs) -> Result<ExitCode, Error> {
    let registry = Registry::for_arch(args.resolve()?);
    let report = RegistryReport::new(registry);
    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Summary => println!("{}", report.summary()),
        OutputFormat::Text => report.write_text(&mut std::io::stdout().lock())?,
    }
    Ok(ExitCode::Clean)
}

fn run_detect(global: &GlobalOpts, args: &DetectArgs) -> Result<ExitCode, Error> {
    let arch = args.arch.resolve()?;
    let mut config = DetectConfig::from_env()?;
    for source in &args.disable_source {
        config = config.disable(*source);
    }

    let detection = detect_with(arch, &config);
    info!(
        %arch,
        enabled = detection.snapshot.enabled().count(),
        "detection finished"
    );

    let mut report = DetectionReport::new(&detection.snapshot);
    if args.provenance {
        report = report.with_provenance(&detection);
    }
    if arch == Architecture::Ppc && arch.is_host() {
        report = report.with_platform(platform_strings(&config));
    }
    write_detection(global, &report)?;
    Ok(ExitCode::Clean)
}

fn run_has(global: &GlobalOpts, args: &HasArgs) -> Result<ExitCode, Error> {
    let arch = args.arch.resolve()?;
    let identifier = Registry::for_arch(arch).lookup_name(&args.name)?;
    let config = DetectConfig::from_env()?;
    let supported = detect_with(arch, &config).snapshot.has(identifier);

    match global.format {
        OutputFormat::Json => print_json(&HasReport {
            arch,
            name: &args.name,
            supported,
        })?,
        OutputFormat::Summary | OutputFormat::Text => println!(
            "{}: {}",
            args.name,
            if supported { "supported" } else { "not supported" }
        ),
    }
    Ok(if supported {
        ExitCode::Clean
    } else {
        ExitCode::Unsupported
    })
}

fn run_scalar(global: &GlobalOpts, args: &ScalarArgs) -> Result<ExitCode, Error> {
    let arch = args.arch.resolve()?;
    let identifier = Registry::for_arch(arch).lookup_name(&args.name)?;
    // Flags are rejected before any source is probed.
    Snapshot::unsupported(arch).scalar(identifier)?;

    let config = DetectConfig::from_env()?;
    let value = detect_with(arch, &config).snapshot.scalar(identifier)?;
    match global.format {
        OutputFormat::Json => print_json(&ScalarReport {
            arch,
            name: &args.name,
            value,
        })?,
        OutputFormat::Summary | OutputFormat::Text => {
            println!("{}: {} ({:#x})", args.name, value, value)
        }
    }
    Ok(ExitCode::Clean)
}

fn run_parse_cpuinfo(global: &GlobalOpts, args: &ParseCpuinfoArgs) -> Result<ExitCode, Error> {
    let arch = args.arch.resolve()?;
    if !args.file.is_file() {
        return Err(Error::Config(format!(
            "cpuinfo file not found: {}",
            args.file.display()
        )));
    }

    let prober = CpuInfoProber::new(&args.file);
    let detection = Pipeline::new(Registry::for_arch(arch)).run(&[&prober]);
    let report = DetectionReport::new(&detection.snapshot).with_provenance(&detection);
    write_detection(global, &report)?;
    Ok(ExitCode::Clean)
}

// ============================================================================
// Output helpers
// ============================================================================

#[derive(Serialize)]
struct HasReport<'a> {
    arch: Architecture,
    name: &'a str,
    supported: bool,
}

#[derive(Serialize)]
struct ScalarReport<'a> {
    arch: Architecture,
    name: &'a str,
    value: u32,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn write_detection(global: &GlobalOpts, report: &DetectionReport) -> Result<(), Error> {
    match global.format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Summary => println!("{}", report.summary()),
        OutputFormat::Text => report.write_text(&mut std::io::stdout().lock())?,
    }
    Ok(())
}

fn output_error(global: &GlobalOpts, error: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(error);
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": {
                    "code": error.code(),
                    "category": error.category(),
                    "message": error.to_string(),
                    "remediation": error.remediation(),
                }
            });
            eprintln!("{}", response);
        }
        OutputFormat::Summary => eprintln!("[cf-core] error: {}", error),
        OutputFormat::Text => eprintln!("{}", error.format_human()),
    }
    exit_code
}
