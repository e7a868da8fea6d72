//! CLI entry point for gbenchdiff
//!
//! Compares two Google Benchmark JSON result files and reports statistically
//! significant changes per benchmark.

use clap::{ArgAction, Parser};
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing::Level;

use gbenchdiff::{run_comparison, AppConfig, ConfigError};

const AFTER_HELP: &str = "\
For each benchmark in both files, the tool will:
- remove outliers with interquartile range rule
- perform significance test (Mann-Whitney U-test)
- print % change in mean from the first to the second file
- print the p-value and sample sizes from a test of the two distributions of benchmark times

Small p-values indicate that the two distributions are significantly different.
If the test indicates that there was no significant change between the two
benchmarks (defined as p > alpha), a single ~ will be displayed instead of
the percent change.

Run the benchmark with the following flags:
    --benchmark_out=file.json
    --benchmark_repetitions=10 (enough in most cases)";

/// Compare Google Benchmark results with a significance test
#[derive(Parser)]
#[command(name = "gbenchdiff")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
struct Args {
    /// Result file of the baseline run
    #[arg(value_name = "OLD")]
    old: PathBuf,

    /// Result file of the candidate run
    #[arg(value_name = "NEW")]
    new: PathBuf,

    /// Don't compare benchmark contexts
    #[arg(long, action = ArgAction::SetTrue)]
    no_ctx: bool,

    /// Compare also CPU time
    #[arg(long, action = ArgAction::SetTrue)]
    with_cpu: bool,

    /// Select only the benchmarks with names that match the given regex
    #[arg(long, value_name = "REGEX")]
    filter: Option<String>,

    /// Significance level [default: 0.05, or GBENCHDIFF_ALPHA]
    #[arg(long, value_name = "P")]
    alpha: Option<f64>,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Convert CLI args to CliArgs struct for AppConfig
impl From<Args> for gbenchdiff::config::CliArgs {
    fn from(args: Args) -> Self {
        Self {
            old: args.old,
            new: args.new,
            no_ctx: args.no_ctx,
            with_cpu: args.with_cpu,
            filter: args.filter,
            alpha: args.alpha,
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level(verbose))
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Report configuration errors and exit
fn handle_config_error(error: ConfigError) -> ! {
    eprintln!("error: {error}");
    process::exit(1);
}

fn run(config: &AppConfig) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run_comparison(config, &mut out)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args
        .pipe(gbenchdiff::config::CliArgs::from)
        .pipe(AppConfig::from_cli)
        .unwrap_or_else(|error| handle_config_error(error));

    if let Err(error) = run(&config) {
        eprintln!("error: {error}");
        process::exit(1);
    }
}

/// Helper trait for functional pipeline composition
trait Pipe<T> {
    fn pipe<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
        Self: Sized;
}

impl<T> Pipe<T> for T {
    fn pipe<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }
}
