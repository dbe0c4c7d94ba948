use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sha2::{Digest as _, Sha256};
use wirecmp_contracts::{DEFAULT_MAX_DEPTH, ENV_MAX_DEPTH};
use wirecmp_core::report::{dump_report, CompareReport, InputSummary};
use wirecmp_core::{check_well_formed, compare_with_limits, parse, CompareResult, Limits};

const EXIT_NOT_EQUAL: u8 = 1;
const EXIT_LIMIT: u8 = 2;
const EXIT_USAGE: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "wirecmp")]
#[command(about = "Order-insensitive equality for protobuf unknown-field bytes.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare two unknown-field buffers and print a JSON report.
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Group nesting budget (default: $WIRECMP_MAX_DEPTH, then 100).
        #[arg(long)]
        max_depth: Option<u32>,
        /// Ceiling on bytes allocated while building both buffers.
        #[arg(long)]
        arena_bytes: Option<usize>,
        /// Inputs are hex text instead of raw bytes.
        #[arg(long, default_value_t = false)]
        hex: bool,
    },
    /// Print the canonical (tag-sorted) field tree of one buffer as JSON.
    Dump {
        input: PathBuf,
        #[arg(long)]
        max_depth: Option<u32>,
        #[arg(long, default_value_t = false)]
        hex: bool,
    },
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            err.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            err.print()?;
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };
    match cli.command {
        Command::Compare {
            a,
            b,
            max_depth,
            arena_bytes,
            hex,
        } => {
            let limits = Limits {
                max_depth: resolve_max_depth(max_depth)?,
                arena_bytes,
            };
            run_compare(&a, &b, &limits, hex)
        }
        Command::Dump {
            input,
            max_depth,
            hex,
        } => {
            let limits = Limits::with_max_depth(resolve_max_depth(max_depth)?);
            run_dump(&input, &limits, hex)
        }
    }
}

fn run_compare(a: &Path, b: &Path, limits: &Limits, hex: bool) -> Result<ExitCode> {
    let buf_a = read_input(a, hex)?;
    let buf_b = read_input(b, hex)?;

    let result = compare_with_limits(&buf_a, &buf_b, limits);
    let report = CompareReport::new(
        result,
        limits,
        vec![summarize(a, &buf_a), summarize(b, &buf_b)],
    );
    print_json(&report)?;

    Ok(match result {
        CompareResult::Equal => ExitCode::SUCCESS,
        CompareResult::NotEqual => ExitCode::from(EXIT_NOT_EQUAL),
        CompareResult::OutOfMemory | CompareResult::MaxDepthExceeded => {
            ExitCode::from(EXIT_LIMIT)
        }
    })
}

fn run_dump(input: &Path, limits: &Limits, hex: bool) -> Result<ExitCode> {
    let buf = read_input(input, hex)?;
    let fields = match parse(&buf, limits) {
        Ok(fields) => fields,
        Err(err) => {
            eprintln!("{}: {err}", input.display());
            return Ok(ExitCode::from(EXIT_LIMIT));
        }
    };
    print_json(&dump_report(summarize(input, &buf), &fields))?;
    Ok(ExitCode::SUCCESS)
}

/// Reads one input and rejects anything that is not well-formed wire data.
fn read_input(path: &Path, hex: bool) -> Result<Vec<u8>> {
    let raw = std::fs::read(path).with_context(|| format!("read input: {}", path.display()))?;
    let bytes = if hex {
        decode_hex_text(&raw).with_context(|| format!("decode hex input: {}", path.display()))?
    } else {
        raw
    };
    check_well_formed(&bytes).with_context(|| format!("invalid input: {}", path.display()))?;
    Ok(bytes)
}

fn decode_hex_text(raw: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(hex::decode(digits)?)
}

fn summarize(path: &Path, bytes: &[u8]) -> InputSummary {
    InputSummary {
        path: path.display().to_string(),
        len: bytes.len(),
        sha256: format!("{:x}", Sha256::digest(bytes)),
    }
}

fn resolve_max_depth(cli: Option<u32>) -> Result<u32> {
    if let Some(v) = cli {
        return Ok(v);
    }
    let Ok(raw) = std::env::var(ENV_MAX_DEPTH) else {
        return Ok(DEFAULT_MAX_DEPTH);
    };
    raw.trim().parse::<u32>().with_context(|| {
        format!("invalid environment variable {ENV_MAX_DEPTH}={raw:?} (expected a non-negative integer)")
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("encode report JSON")?;
    writeln!(out).context("write report")?;
    Ok(())
}
