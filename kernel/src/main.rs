//! hash-sweep: compare bucket-hash kernels.
//!
//! With no subcommand, runs the fixed sweep (bucket counts 32/64/128,
//! strides 1..=2999, keys [0, 65535), all four kernels) and prints the text
//! report to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use bucket_hash::logging::{init_logging, LogConfig, LogFormat};
use bucket_hash::sweep::DEFAULT_DOMAIN_BOUND;
use bucket_hash::{inspect_domain, sweep, HashKernel, Result, SweepConfig};

#[derive(Parser, Debug)]
#[command(name = "hash-sweep", version, about = "Compare bucket-hash kernel distributions")]
struct Cli {
    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "HASH_SWEEP_LOG", default_value = "warn")]
    log_level: String,

    /// Log output format on stderr (pretty or json)
    #[arg(long, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep kernels over bucket counts and strides (default)
    Sweep(SweepArgs),
    /// Print one diagnostic line per kernel for the full key range
    Inspect(InspectArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Default)]
struct SweepArgs {
    /// TOML sweep config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Kernels to compare, comma-separated (a,b,c,d or names)
    #[arg(long, value_delimiter = ',')]
    kernels: Option<Vec<HashKernel>>,

    /// Bucket counts, comma-separated
    #[arg(long, value_delimiter = ',')]
    bucket_counts: Option<Vec<u32>>,

    /// First stride (inclusive)
    #[arg(long)]
    stride_start: Option<u32>,

    /// Last stride (inclusive)
    #[arg(long)]
    stride_end: Option<u32>,

    /// Exclusive upper bound of sampled keys
    #[arg(long)]
    domain_bound: Option<u32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the SHA-256 fingerprint of the text report after it
    #[arg(long)]
    fingerprint: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Kernels to inspect, comma-separated
    #[arg(long, value_delimiter = ',')]
    kernels: Option<Vec<HashKernel>>,

    /// Reduce into this many buckets; raw hash values when omitted
    #[arg(long)]
    bucket_count: Option<u32>,

    /// Exclusive upper bound of inspected keys
    #[arg(long, default_value_t = DEFAULT_DOMAIN_BOUND)]
    domain_bound: u32,
}

fn sweep_config(args: &SweepArgs) -> Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };
    if let Some(kernels) = &args.kernels {
        config.kernels = kernels.clone();
    }
    if let Some(counts) = &args.bucket_counts {
        config.bucket_counts = counts.clone();
    }
    if args.stride_start.is_some() || args.stride_end.is_some() {
        let first = config.strides.first().copied().unwrap_or(1);
        let last = config.strides.last().copied().unwrap_or(first);
        let start = args.stride_start.unwrap_or(first);
        let end = args.stride_end.unwrap_or(last);
        config.strides = (start..=end).collect();
    }
    if let Some(bound) = args.domain_bound {
        config.domain_bound = bound;
    }
    Ok(config)
}

fn run_sweep(args: &SweepArgs) -> Result<()> {
    let config = sweep_config(args)?;
    tracing::debug!(?config.kernels, ?config.bucket_counts, strides = config.strides.len(), "starting sweep");
    let report = sweep(&config)?;

    match args.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    if args.fingerprint {
        println!("fingerprint: {}", report.fingerprint());
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let kernels = args.kernels.clone().unwrap_or_else(|| HashKernel::ALL.to_vec());
    for kernel in kernels {
        let eval = inspect_domain(&kernel, args.domain_bound, args.bucket_count)?;
        println!("{}", eval.describe(kernel.name(), args.bucket_count));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&LogConfig { level: cli.log_level, format: cli.log_format })?;

    match cli.command {
        Some(Command::Sweep(args)) => run_sweep(&args),
        Some(Command::Inspect(args)) => run_inspect(&args),
        None => run_sweep(&SweepArgs::default()),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "hash-sweep failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
