//! Command line driver for a ladder run
//!
//! Reads one or more JSON match ledgers produced by an external collaborator,
//! runs the rating pipeline and downstream passes, and prints the standings
//! as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use ladder_ratings::config::{AppConfig, ErrorPolicy};
use ladder_ratings::{Ladder, MatchLedger, MatchRecord, PipelineStats, Standing};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Ladder Ratings - Elo, Glicko-2, TrueSkill and Zero Numbers from match history
#[derive(Parser)]
#[command(
    name = "ladder-ratings",
    version,
    about = "Compute ladder standings from a chronological match ledger",
    long_about = "Ladder Ratings folds head-to-head match results into Elo, Glicko-2 and \
                 TrueSkill ratings, recomputes long-term Glicko-2 per season, and measures \
                 each player's Zero Number from a reference player."
)]
struct Args {
    /// Match ledger files (JSON arrays of match records), merged by timestamp
    #[arg(required = true, value_name = "LEDGER")]
    ledgers: Vec<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Zero Number reference player override
    #[arg(long, value_name = "PLAYER")]
    root: Option<String>,

    /// Elo K-factor override
    #[arg(long, value_name = "K")]
    k_factor: Option<f64>,

    /// Skip failing matches that the source flagged as best-effort
    #[arg(long)]
    skip_best_effort: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Dry run mode (validate config and ledgers, then exit)
    #[arg(long, help = "Validate configuration and ledgers without rating")]
    dry_run: bool,
}

/// What the driver prints
#[derive(Serialize)]
struct RunReport {
    pipeline: PipelineStats,
    seasons: usize,
    zero_root: String,
    standings: Vec<Standing>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(root) = &args.root {
        config.ladder.zero_root = root.clone();
    }

    if let Some(k) = args.k_factor {
        config.rating.elo_k = k;
    }

    if args.skip_best_effort {
        config.pipeline.error_policy = ErrorPolicy::SkipBestEffort;
    }

    ladder_ratings::config::validate_config(&config)?;
    Ok(config)
}

fn read_ledger(path: &Path) -> Result<Vec<MatchRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open ledger {}", path.display()))?;
    let records: Vec<MatchRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse ledger {}", path.display()))?;
    info!("Loaded {} matches from {}", records.len(), path.display());
    Ok(records)
}

fn run(args: &Args, config: AppConfig) -> Result<()> {
    let streams = args
        .ledgers
        .iter()
        .map(|path| read_ledger(path))
        .collect::<Result<Vec<_>>>()?;
    let ledger = MatchLedger::merge(streams);

    if args.dry_run {
        info!(
            "Dry run completed - {} matches loaded, configuration valid",
            ledger.len()
        );
        return Ok(());
    }

    let mut ladder = Ladder::new(config)?;
    let pipeline = ladder.ingest(ledger)?;
    let summary = ladder.finalize()?;

    let report = RunReport {
        pipeline,
        seasons: summary.seasons,
        zero_root: summary.zero_root,
        standings: ladder.standings(),
    };
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} - K={} root={} seasons={}",
        config.service.name,
        ladder_ratings::VERSION,
        config.rating.elo_k,
        config.ladder.zero_root,
        config.ladder.season_count()
    );

    if let Err(e) = run(&args, config) {
        error!("Ladder run failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
