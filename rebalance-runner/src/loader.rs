//! CSV inputs: position snapshot, scored candidates, prices.
//!
//! File layouts (header row required, whitespace trimmed):
//! - positions: `symbol,shares,cost_basis`
//! - candidates: `symbol,score`
//! - prices: `symbol,price`
//!
//! Row order in the positions file is the prior working-set order.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use rebalance_core::domain::SnapshotError;
use rebalance_core::{
    CandidateList, PortfolioSnapshot, Position, PriceSource, RankedCandidateSource, Security,
    SourceError,
};

use crate::screen::{screen, ScoredCandidate, ScreenConfig};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("positions: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("prices: duplicate row for {0}")]
    DuplicatePrice(Security),
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    symbol: Security,
    shares: f64,
    cost_basis: f64,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    symbol: Security,
    price: f64,
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, LoadError> {
    let wrap = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;
    reader.deserialize().collect::<Result<Vec<T>, _>>().map_err(wrap)
}

/// Load the portfolio snapshot. Duplicate symbols are rejected.
pub fn load_positions(path: &Path) -> Result<PortfolioSnapshot, LoadError> {
    let rows: Vec<PositionRow> = read_rows(path)?;
    let positions = rows
        .into_iter()
        .map(|r| Position::new(r.symbol, r.shares, r.cost_basis))
        .collect();
    Ok(PortfolioSnapshot::new(positions)?)
}

pub fn load_scored_candidates(path: &Path) -> Result<Vec<ScoredCandidate>, LoadError> {
    read_rows(path)
}

pub fn load_prices(path: &Path) -> Result<HashMap<Security, f64>, LoadError> {
    let rows: Vec<PriceRow> = read_rows(path)?;
    let mut prices = HashMap::with_capacity(rows.len());
    for row in rows {
        if prices.insert(row.symbol.clone(), row.price).is_some() {
            return Err(LoadError::DuplicatePrice(row.symbol));
        }
    }
    Ok(prices)
}

/// Ranking service backed by a scored-candidates CSV and a screen.
#[derive(Debug, Clone)]
pub struct CsvCandidateSource {
    rows: Vec<ScoredCandidate>,
    screen: ScreenConfig,
}

impl CsvCandidateSource {
    pub fn from_path(path: &Path, screen: ScreenConfig) -> Result<Self, LoadError> {
        Ok(Self {
            rows: load_scored_candidates(path)?,
            screen,
        })
    }

    pub fn from_rows(rows: Vec<ScoredCandidate>, screen: ScreenConfig) -> Self {
        Self { rows, screen }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl RankedCandidateSource for CsvCandidateSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn ranked_candidates(&self) -> Result<CandidateList, SourceError> {
        Ok(screen(&self.rows, &self.screen))
    }
}

/// Price feed backed by a prices CSV.
#[derive(Debug, Clone, Default)]
pub struct CsvPriceSource {
    prices: HashMap<Security, f64>,
}

impl CsvPriceSource {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            prices: load_prices(path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn price(&self, security: &Security) -> Result<Option<f64>, SourceError> {
        Ok(self.prices.get(security).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_positions_keeps_order() {
        let file = write_csv("symbol,shares,cost_basis\nMSFT, 10, 300.5\nAAPL,-5,150\n");
        let snap = load_positions(file.path()).unwrap();
        let ids: Vec<&str> = snap.positions().iter().map(|p| p.security.as_str()).collect();
        assert_eq!(ids, vec!["MSFT", "AAPL"]);
        assert_eq!(snap.get(&"AAPL".into()).unwrap().shares, -5.0);
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let file = write_csv("symbol,shares,cost_basis\nA,1,1\nA,2,2\n");
        assert!(matches!(load_positions(file.path()), Err(LoadError::Snapshot(_))));
    }

    #[test]
    fn test_malformed_number_reports_path() {
        let file = write_csv("symbol,shares,cost_basis\nA,lots,1\n");
        let err = load_positions(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_prices_and_duplicate() {
        let file = write_csv("symbol,price\nA,10.5\nB,20\n");
        let prices = load_prices(file.path()).unwrap();
        assert_eq!(prices[&Security::from("A")], 10.5);

        let dup = write_csv("symbol,price\nA,1\nA,2\n");
        assert!(matches!(load_prices(dup.path()), Err(LoadError::DuplicatePrice(_))));
    }

    #[test]
    fn test_csv_candidate_source_applies_screen() {
        let file = write_csv("symbol,score\nA,0.3\nB,0.9\nC,0.1\n");
        let src = CsvCandidateSource::from_path(
            file.path(),
            ScreenConfig {
                min_score: Some(0.25),
                top_n: None,
            },
        )
        .unwrap();
        assert_eq!(src.row_count(), 3);
        let list = src.ranked_candidates().unwrap();
        let ids: Vec<&str> = list.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_csv_price_source() {
        let file = write_csv("symbol,price\nA,10\n");
        let src = CsvPriceSource::from_path(file.path()).unwrap();
        assert_eq!(src.price(&"A".into()).unwrap(), Some(10.0));
        assert_eq!(src.price(&"B".into()).unwrap(), None);
    }
}
