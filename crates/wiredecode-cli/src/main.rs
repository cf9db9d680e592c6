use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use glob::glob;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wiredecode_core::protocols::ethernet::{EthernetHeader, parse_ethernet_header};
use wiredecode_core::protocols::ipv4::{Ipv4Header, parse_ipv4_header};
use wiredecode_core::protocols::tcp::{
    TcpDecodeConfig, TcpHeader, UnknownOptionPolicy, parse_tcp_header_with,
};
use wiredecode_core::protocols::udp::{UdpHeader, parse_udp_header};
use wiredecode_core::{DecodeConfig, DecodeError, Report};

#[derive(Parser, Debug)]
#[command(name = "wiredecode")]
#[command(version)]
#[command(
    about = "Offline decoder for Ethernet, IPv4, TCP and UDP headers.",
    long_about = None,
    after_help = "Examples:\n  wiredecode pcap decode capture.pcapng -o report.json\n  wiredecode hex tcp '0050 01bb 0000 0001 0000 0000 5002 2000 0000 0000'"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs (offline-first).
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Decode a single header from hex digits and print it as JSON.
    #[command(
        after_help = "Whitespace and ':' separators are ignored; a leading 0x is allowed.\nExamples:\n  wiredecode hex udp '1f90 0035 000c 0000'\n  wiredecode hex ethernet 02:00:00:00:00:02:02:00:00:00:00:01:08:00"
    )]
    Hex {
        /// Header to decode
        #[arg(value_enum)]
        layer: Layer,

        /// Header bytes as hex digits
        hex: String,

        #[command(flatten)]
        tcp: TcpArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every frame of a capture file into a versioned JSON report.
    #[command(
        after_help = "Examples:\n  wiredecode pcap decode capture.pcapng -o report.json\n  wiredecode pcap decode 'captures/*.pcap' --stdout --pretty"
    )]
    Decode {
        /// Path to a .pcap or .pcapng file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        tcp: TcpArgs,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any frame failed to decode
        #[arg(long)]
        strict: bool,
    },
}

#[derive(clap::Args, Debug)]
struct TcpArgs {
    /// Keep TCP options as raw bytes instead of decoding them
    #[arg(long)]
    opaque_tcp_options: bool,

    /// Skip unknown TCP option kinds instead of rejecting the header
    #[arg(long, conflicts_with = "opaque_tcp_options")]
    skip_unknown_options: bool,
}

impl TcpArgs {
    fn decode_config(&self) -> TcpDecodeConfig {
        let config = if self.opaque_tcp_options {
            TcpDecodeConfig::opaque()
        } else {
            TcpDecodeConfig::default()
        };
        if self.skip_unknown_options {
            config.with_unknown_options(UnknownOptionPolicy::Skip)
        } else {
            config
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Layer {
    Ethernet,
    Ipv4,
    Udp,
    Tcp,
}

impl Layer {
    fn name(self) -> &'static str {
        match self {
            Layer::Ethernet => "ethernet",
            Layer::Ipv4 => "ipv4",
            Layer::Udp => "udp",
            Layer::Tcp => "tcp",
        }
    }
}

/// JSON shape printed by `hex`.
#[derive(Serialize)]
#[serde(tag = "layer", content = "header", rename_all = "lowercase")]
enum DecodedHeader<'a> {
    Ethernet(EthernetHeader),
    Ipv4(Ipv4Header<'a>),
    Udp(UdpHeader),
    Tcp(TcpHeader<'a>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Decode {
                input,
                report,
                stdout,
                pretty,
                compact,
                tcp,
                quiet,
                strict,
            } => {
                let config = DecodeConfig {
                    tcp: tcp.decode_config(),
                };
                let output = OutputOptions {
                    report,
                    stdout,
                    pretty,
                    compact,
                    quiet,
                    strict,
                };
                cmd_pcap_decode(input, &config, output)
            }
        },
        Commands::Hex {
            layer,
            hex,
            tcp,
            pretty,
        } => cmd_hex(layer, &hex, &tcp.decode_config(), pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

#[derive(Debug)]
struct OutputOptions {
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
}

fn cmd_pcap_decode(
    input: PathBuf,
    config: &DecodeConfig,
    output: OutputOptions,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = match (output.stdout, output.report) {
        (true, _) => None,
        (false, Some(path)) => Some(path),
        (false, None) => {
            return Err(CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            ));
        }
    };
    if let Some(path) = report_path.as_deref() {
        ensure_distinct_output(path, &input_abs)?;
    }

    debug!(input = %resolved_input.display(), ?config, "decoding capture");
    let rep = wiredecode_core::analyze_capture_file(&resolved_input, config)
        .context("PCAP/PCAPNG decoding failed")?;
    let json = serialize_report(&rep, output.pretty, output.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !output.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if output.strict {
        let failed = failed_frames(&rep);
        if failed > 0 {
            return Err(CliError::new(
                format!("{failed} frame(s) failed to decode"),
                Some("inspect the errors section of the report".to_string()),
            ));
        }
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // A missing output directory cannot contain the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn failed_frames(rep: &Report) -> u64 {
    rep.capture_summary
        .as_ref()
        .map_or(0, |summary| summary.failed_frames)
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    to_json(rep, pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed")
        .map_err(Into::into)
}

fn cmd_hex(layer: Layer, hex: &str, tcp: &TcpDecodeConfig, pretty: bool) -> Result<(), CliError> {
    let bytes = parse_hex(hex)?;
    debug!(?layer, len = bytes.len(), "decoding header from hex");
    let decoded = decode_header(layer, &bytes, tcp).map_err(|err| {
        CliError::new(
            format!("{} header decode failed: {err}", layer.name()),
            Some(format!("{} bytes were supplied", bytes.len())),
        )
    })?;
    println!("{}", to_json(&decoded, pretty)?);
    Ok(())
}

fn decode_header<'a>(
    layer: Layer,
    bytes: &'a [u8],
    tcp: &TcpDecodeConfig,
) -> Result<DecodedHeader<'a>, DecodeError> {
    Ok(match layer {
        Layer::Ethernet => DecodedHeader::Ethernet(parse_ethernet_header(bytes)?),
        Layer::Ipv4 => DecodedHeader::Ipv4(parse_ipv4_header(bytes)?),
        Layer::Udp => DecodedHeader::Udp(parse_udp_header(bytes)?),
        Layer::Tcp => DecodedHeader::Tcp(parse_tcp_header_with(bytes, tcp)?),
    })
}

fn parse_hex(input: &str) -> Result<Vec<u8>, CliError> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: Vec<u8> = trimmed
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace() && *byte != b':')
        .collect();

    let invalid = |detail: String| {
        CliError::new(
            format!("invalid hex input: {detail}"),
            Some("pass hex digits, optionally separated by spaces or ':'".to_string()),
        )
    };
    if digits.is_empty() {
        return Err(invalid("no digits".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(invalid(format!("odd number of digits ({})", digits.len())));
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let high = hex_value(pair[0]);
            let low = hex_value(pair[1]);
            match (high, low) {
                (Some(high), Some(low)) => Ok((high << 4) | low),
                _ => Err(invalid(format!(
                    "'{}' is not a hex byte",
                    String::from_utf8_lossy(pair)
                ))),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).map(|value| value as u8)
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            let message =
                format!("multiple files match pattern '{pattern}' ({count} matches): {listed}");
            Err(CliError::new(
                message,
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
