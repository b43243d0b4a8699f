//! Capability traits for the upstream ranking service and price feed.
//!
//! The core never depends on a concrete provider. Implementations live in
//! the runner (CSV files) or in the embedding application; the in-memory
//! versions here back tests and simple integrations.

use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{CandidateList, Security};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Produces today's ranked candidate list, best first.
pub trait RankedCandidateSource: Send + Sync {
    /// Human-readable name (for logs and reports).
    fn name(&self) -> &str;

    fn ranked_candidates(&self) -> Result<CandidateList, SourceError>;
}

/// Current price per security, on demand.
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means the feed has no price for this security today.
    fn price(&self, security: &Security) -> Result<Option<f64>, SourceError>;
}

/// Fixed candidate list.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidates {
    list: CandidateList,
}

impl StaticCandidates {
    pub fn new(list: CandidateList) -> Self {
        Self { list }
    }
}

impl RankedCandidateSource for StaticCandidates {
    fn name(&self) -> &str {
        "static"
    }

    fn ranked_candidates(&self) -> Result<CandidateList, SourceError> {
        Ok(self.list.clone())
    }
}

/// Fixed price table.
#[derive(Debug, Clone, Default)]
pub struct StaticPrices {
    prices: HashMap<Security, f64>,
}

impl StaticPrices {
    pub fn new(prices: HashMap<Security, f64>) -> Self {
        Self { prices }
    }
}

impl<S: Into<Security>> FromIterator<(S, f64)> for StaticPrices {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().map(|(s, p)| (s.into(), p)).collect(),
        }
    }
}

impl PriceSource for StaticPrices {
    fn name(&self) -> &str {
        "static"
    }

    fn price(&self, security: &Security) -> Result<Option<f64>, SourceError> {
        Ok(self.prices.get(security).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_prices_lookup() {
        let prices: StaticPrices = [("A", 10.0), ("B", 20.0)].into_iter().collect();
        assert_eq!(prices.price(&"A".into()).unwrap(), Some(10.0));
        assert_eq!(prices.price(&"Z".into()).unwrap(), None);
    }

    #[test]
    fn test_static_candidates_returns_list() {
        let src = StaticCandidates::new(CandidateList::new(["A", "B"]));
        assert_eq!(src.ranked_candidates().unwrap().len(), 2);
        assert_eq!(src.name(), "static");
    }

    /// Compile-time check: both traits stay object safe.
    #[allow(dead_code)]
    fn sources_are_object_safe(_c: &dyn RankedCandidateSource, _p: &dyn PriceSource) {}
}
