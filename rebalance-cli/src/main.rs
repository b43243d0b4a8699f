//! Rebalance CLI: daily lock-in run and config validation.
//!
//! Commands:
//! - `run`: merge candidates into the book, evaluate lock-ins, print target weights
//! - `check-config`: validate a TOML config and print the effective policy

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rebalance_core::{InclusionReason, Policy};
use rebalance_runner::{
    load_positions, run_day, save_report, CsvCandidateSource, CsvPriceSource, DayReport,
    RebalanceConfig,
};

#[derive(Parser)]
#[command(
    name = "rebalance",
    about = "Daily candidate merge and profit/loss lock-in evaluation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one trading day from CSV inputs.
    Run {
        /// Path to the TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Positions CSV (symbol,shares,cost_basis).
        #[arg(long)]
        positions: PathBuf,

        /// Scored candidates CSV (symbol,score).
        #[arg(long)]
        candidates: PathBuf,

        /// Prices CSV (symbol,price).
        #[arg(long)]
        prices: PathBuf,

        /// Trade date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Write decision.json and weights.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the day report as JSON instead of the summary table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Validate a config file and print the effective policy.
    CheckConfig {
        /// Path to the TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            positions,
            candidates,
            prices,
            date,
            output_dir,
            json,
        } => run_cmd(config, positions, candidates, prices, date, output_dir, json),
        Commands::CheckConfig { config } => check_config_cmd(config),
    }
}

fn run_cmd(
    config_path: PathBuf,
    positions_path: PathBuf,
    candidates_path: PathBuf,
    prices_path: PathBuf,
    date: Option<String>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    // Config problems stop the run before any input is read
    let config = RebalanceConfig::from_file(&config_path)?;
    let policy = config.policy()?;

    let trade_date = date
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--date must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let snapshot = load_positions(&positions_path)?;
    let candidates = CsvCandidateSource::from_path(&candidates_path, config.screen.clone())?;
    let prices = CsvPriceSource::from_path(&prices_path)?;
    tracing::debug!(
        positions = snapshot.len(),
        candidate_rows = candidates.row_count(),
        prices = prices.len(),
        "inputs loaded"
    );

    let outcome = run_day(&policy, trade_date, &snapshot, &candidates, &prices);
    let report = DayReport::from_outcome(&outcome, config.config_id());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(dir) = output_dir {
        let paths = save_report(&dir, &report)?;
        tracing::info!(path = %paths.decision_json.display(), "report saved");
    }

    Ok(())
}

fn check_config_cmd(config_path: PathBuf) -> Result<()> {
    let config = RebalanceConfig::from_file(&config_path)?;
    let policy = config.policy()?;
    print_policy(&config, &policy);
    Ok(())
}

fn print_policy(config: &RebalanceConfig, policy: &Policy) {
    let t = policy.thresholds();
    println!("=== Policy ===");
    println!("Config ID:      {}", &config.config_id()[..12]);
    println!("Max Positions:  {}", policy.max_open_positions());
    println!("Default Weight: {:.4}", policy.default_weight());
    println!("Full Book:      {:.4}", policy.full_book_weight());
    println!("Profit Lock-In: {:+.2}%", t.profit * 100.0);
    println!("Loss Lock-In:   {:+.2}%", t.loss * 100.0);
    match config.screen.min_score {
        Some(min) => println!("Min Score:      > {min}"),
        None => println!("Min Score:      (none)"),
    }
    match config.screen.top_n {
        Some(n) => println!("Top N:          {n}"),
        None => println!("Top N:          (all)"),
    }
}

fn print_summary(report: &DayReport) {
    println!();
    println!("=== Day {} ===", report.trade_date);
    println!("Config ID:      {}", &report.config_id[..12.min(report.config_id.len())]);
    println!("Open Positions: {}", report.open_positions);
    match &report.candidate_error {
        Some(err) => println!("Candidates:     unavailable ({err})"),
        None => println!("Candidates:     {}", report.candidates_ranked),
    }
    println!(
        "Working Set:    {} ({} admitted)",
        report.working_set_size, report.admitted
    );
    println!(
        "Decisions:      {} hold, {} profit exit, {} loss exit",
        report.holds, report.profit_exits, report.loss_exits
    );
    println!();
    println!("--- Target Weights ---");
    for entry in &report.working_set {
        let origin = match entry.reason {
            InclusionReason::Existing => "held",
            InclusionReason::Admitted => "new",
        };
        match report.weights.get(&entry.security) {
            Some(w) => {
                let action = report
                    .exits
                    .get(&entry.security)
                    .map(|r| format!("exit ({r})"))
                    .unwrap_or_else(|| "hold".to_string());
                println!("{:<10} {:<5} {:>8.4}  {}", entry.security, origin, w, action);
            }
            None => println!("{:<10} {:<5} {:>8}  skipped", entry.security, origin, "-"),
        }
    }
    println!("Gross:           {:>8.4}", report.weights.total());

    if !report.issues.is_empty() {
        println!();
        println!("--- Issues ({}) ---", report.issues.len());
        for issue in &report.issues {
            println!("{issue}");
        }
    }
}
