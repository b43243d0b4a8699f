//! Rebalance Runner: config and CSV inputs, candidate screen, daily run, reports.
//!
//! This crate builds on `rebalance-core` to provide:
//! - TOML configuration with a deterministic config id
//! - CSV-backed position snapshot, ranking service and price feed
//! - Candidate screen (score cut + top-N) over upstream scores
//! - Daily run: merge, parallel price prefetch, lock-in evaluation, weights
//! - Per-day decision report written as JSON and CSV

pub mod config;
pub mod loader;
pub mod report;
pub mod runner;
pub mod screen;

pub use config::{ConfigError, PortfolioSection, RebalanceConfig};
pub use loader::{
    load_positions, load_prices, load_scored_candidates, CsvCandidateSource, CsvPriceSource,
    LoadError,
};
pub use report::{save_report, DayReport, ReportPaths};
pub use runner::{prefetch_prices, run_day, DayOutcome};
pub use screen::{screen, ScoredCandidate, ScreenConfig};
