use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use hs_runtime::metrics::MetricsRegistry;
use hs_runtime::output::{write_results, OutputFormat};
use hs_runtime::{init_tracing, open_input, parse_limit, run_selection};
use hs_views::{ScanPolicy, TopNConfig};

/// Print the N highest-scoring records of a `score:{json}` file.
#[derive(Parser, Debug)]
#[command(name = "highest", version)]
struct Cli {
    /// Path to the records file (`-` for stdin)
    records: PathBuf,

    /// Number of distinct top scores to report
    #[arg(allow_hyphen_values = true)]
    total_scores: String,

    /// Output format
    #[arg(long, default_value = "json", value_parser = ["json", "jsonl", "text"])]
    format: String,

    /// Stop reading once N distinct scores have been collected
    #[arg(long)]
    stop_at_capacity: bool,

    /// Print run statistics as a JSON line on stderr
    #[arg(long)]
    stats: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let limit = parse_limit(&cli.total_scores)?;
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let policy = if cli.stop_at_capacity { ScanPolicy::StopAtCapacity } else { ScanPolicy::FullScan };
    let cfg = TopNConfig::new(limit).with_policy(policy);

    let reader = open_input(&cli.records)?;
    let metrics = MetricsRegistry::default();
    let started = Instant::now();

    let results = run_selection(reader, cfg, &metrics)
        .with_context(|| format!("selection over {} failed", cli.records.display()))?;
    write_results(io::stdout().lock(), &results, format)?;

    let stats = metrics.snapshot().to_json_line("highest", Some(started.elapsed()));
    info!(%stats, emitted = results.len(), "run complete");
    if cli.stats {
        eprintln!("{stats}");
    }
    Ok(())
}
