//! dirusage - How big is this folder, without waiting too long.
//!
//! Usage:
//!   dirusage [PATH]                 Measure a path with the default budget
//!   dirusage -t 0.5 [PATH]          Give up after half a second
//!   dirusage -f json [PATH]         Print the full result as JSON
//!   dirusage --help                 Show help

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use dirusage_probe::{DirectoryUsageProbe, TraversalRequest, TraversalResult};

#[derive(Parser)]
#[command(
    name = "dirusage",
    version,
    about = "Time-bounded directory size and entry count",
    long_about = "dirusage walks a directory tree and reports its total size and entry \
                  count.\n\nThe walk stops once the timeout elapses; totals from an \
                  interrupted walk are marked partial and are a lower bound."
)]
struct Cli {
    /// Path to measure (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Time budget in seconds (fractions allowed)
    #[arg(short, long, default_value = "5", value_parser = parse_timeout)]
    timeout: Duration,

    /// Skip hidden entries (starting with .)
    #[arg(long)]
    skip_hidden: bool,

    /// Follow symbolic links into their targets
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// Maximum depth to descend (0 = the path itself)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let request = TraversalRequest::builder()
        .root_path(cli.path.clone())
        .time_budget(cli.timeout)
        .include_hidden(!cli.skip_hidden)
        .follow_symlinks(cli.follow_symlinks)
        .max_depth(cli.max_depth)
        .finish()?;

    let probe = DirectoryUsageProbe::new();
    let result = probe
        .run(&request)
        .with_context(|| format!("Could not measure {}", cli.path.display()))?;

    match cli.format {
        OutputFormat::Text => print_summary(&cli.path, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a human-readable summary.
fn print_summary(path: &Path, result: &TraversalResult) {
    let marker = if result.completed { "" } else { " (partial)" };

    println!("{}", "─".repeat(60));
    println!(
        " {} - {}{}",
        path.display(),
        format_size(result.total_bytes),
        marker
    );
    println!(" {} on disk", format_size(result.allocated_bytes));
    println!(
        " {} entries: {} files, {} directories, {} symlinks, {} other",
        result.entry_count,
        result.tally.files,
        result.tally.directories,
        result.tally.symlinks,
        result.tally.other
    );
    println!(" Measured in {:.2}s", result.elapsed.as_secs_f64());
    println!("{}", "─".repeat(60));

    if !result.completed {
        println!();
        println!("Timed out before the walk finished; totals are a lower bound.");
    }

    if result.has_warnings() {
        println!();
        println!("{} entries skipped:", result.warnings.len());
        for warning in &result.warnings {
            println!("   {}", warning.message);
        }
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Parse a timeout in seconds (e.g., "5", "0.25").
fn parse_timeout(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number of seconds: {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid timeout: {e}"))
}
