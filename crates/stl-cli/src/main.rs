/// STL command-line tool: decode, inspect, and build storage timeline
/// record streams.
///
/// # Command overview
///
/// ```text
/// stl <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Print the records of a stream as a JSON array
///   inspect    Print a per-record summary with offsets and the stop reason
///   encode     Create a record stream from a JSON manifest
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Raise log verbosity (-v debug, -vv trace)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                             |
/// |------|-----------------------------------------------------|
/// | 0    | Success, including streams that end in a soft stop  |
/// | 1    | Error (I/O failure, bad base64, bad manifest, etc.) |
///
/// Logs and error details go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use stl_wire::ByteOrder;
use tracing::Level;

mod cmd_decode;
mod cmd_encode;
mod cmd_inspect;
mod input;

use cmd_decode::ValuePresentation;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Storage timeline record stream tool.
#[derive(Parser)]
#[command(name = "stl", version, about = "Storage timeline record stream CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise log verbosity. Repeat for more (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the records of a stream as a JSON array.
    Decode(DecodeArgs),
    /// Print a per-record summary of a stream.
    Inspect(InspectArgs),
    /// Create a record stream from a JSON manifest.
    Encode(EncodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Where the stream comes from and how to read it. Shared by `decode` and
/// `inspect`.
#[derive(clap::Args)]
pub struct SourceArgs {
    /// Stream file to read, or `-` for stdin.
    pub file: PathBuf,

    /// Byte order of the integer fields: `big` (default) or `little`.
    #[arg(long, default_value = "big")]
    pub byte_order: ByteOrder,

    /// Treat the input as base64 text rather than raw bytes.
    ///
    /// Whitespace (including line breaks) is ignored.
    #[arg(long)]
    pub base64: bool,
}

/// Arguments for `stl decode`.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────────┐
/// │ Flag          │ Values / default                                     │
/// ├───────────────┼──────────────────────────────────────────────────────┤
/// │ --value       │ text (default) | bytes | json                        │
/// │ --pretty      │ indent the JSON output                               │
/// │ -o / --output │ write to file instead of stdout                      │
/// └───────────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// A stream that ends in a soft stop still prints every complete record;
/// the stop is logged as a warning on stderr.
#[derive(clap::Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// How each value is presented.
    ///
    /// `text` decodes UTF-8, replacing invalid sequences with U+FFFD.
    /// `bytes` prints an array of integers. `json` parses the value as a
    /// JSON document and prints `null` when it is not one.
    #[arg(long, value_enum, default_value_t = ValuePresentation::Text)]
    pub value: ValuePresentation,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `stl inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Include a hex dump of each value (16 bytes per line).
    #[arg(long)]
    pub show_hex: bool,
}

/// Arguments for `stl encode`.
///
/// The manifest is a JSON array of records (or an object with a `records`
/// array). Each record has a `timestamp` and exactly one of `value` (UTF-8
/// text), `value_hex`, or `value_file` (path relative to the manifest):
///
/// ```json
/// [
///   { "timestamp": 1700000000000, "value": "cpu=0.42" },
///   { "timestamp": 1700000001000, "value_hex": "00ff7f" }
/// ]
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Path to the JSON manifest describing the records.
    pub input: PathBuf,

    /// Output stream file path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Byte order of the integer fields: `big` (default) or `little`.
    #[arg(long, default_value = "big")]
    pub byte_order: ByteOrder,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Encode(args) => cmd_encode::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Install the stderr log sink. Soft stops are logged at WARN, so they
/// show up even without `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
