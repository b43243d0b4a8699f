//! Candidate screen: opaque upstream scores → ranked candidate list.
//!
//! The score is computed elsewhere and never interpreted here. The screen
//! only cuts and orders: drop rows at or below `min_score`, sort best first
//! (ties keep their input order), keep at most `top_n`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use rebalance_core::{CandidateList, Security};

/// One row from the ranking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub symbol: Security,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(symbol: impl Into<Security>, score: f64) -> Self {
        Self {
            symbol: symbol.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenConfig {
    /// Keep rows with `score > min_score`.
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Keep at most this many candidates after sorting.
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(min) = self.min_score {
            if !min.is_finite() {
                return Err(format!("min_score must be finite, got {min}"));
            }
        }
        if self.top_n == Some(0) {
            return Err("top_n must be > 0".into());
        }
        Ok(())
    }
}

/// Apply the screen. Rows with a non-finite score are dropped.
pub fn screen(rows: &[ScoredCandidate], config: &ScreenConfig) -> CandidateList {
    let mut kept: Vec<&ScoredCandidate> = rows
        .iter()
        .filter(|r| r.score.is_finite())
        .filter(|r| config.min_score.map_or(true, |min| r.score > min))
        .collect();

    // stable sort: equal scores keep upstream order
    kept.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let limit = config.top_n.unwrap_or(usize::MAX);
    // dedup happens before the cut so a repeated symbol never wastes a slot
    let list = CandidateList::new(kept.into_iter().map(|r| r.symbol.clone()));
    CandidateList::new(list.iter().take(limit).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, f64)]) -> Vec<ScoredCandidate> {
        pairs.iter().map(|(s, v)| ScoredCandidate::new(*s, *v)).collect()
    }

    fn ids(list: &CandidateList) -> Vec<&str> {
        list.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_sorts_best_first() {
        let list = screen(&rows(&[("A", 0.3), ("B", 0.9), ("C", 0.5)]), &ScreenConfig::default());
        assert_eq!(ids(&list), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_min_score_is_strict() {
        let cfg = ScreenConfig {
            min_score: Some(0.25),
            top_n: None,
        };
        let list = screen(&rows(&[("A", 0.25), ("B", 0.26), ("C", 0.1)]), &cfg);
        assert_eq!(ids(&list), vec!["B"]);
    }

    #[test]
    fn test_top_n_cut() {
        let cfg = ScreenConfig {
            min_score: None,
            top_n: Some(2),
        };
        let list = screen(&rows(&[("A", 1.0), ("B", 3.0), ("C", 2.0), ("D", 4.0)]), &cfg);
        assert_eq!(ids(&list), vec!["D", "B"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let list = screen(&rows(&[("X", 0.5), ("Y", 0.5), ("Z", 0.5)]), &ScreenConfig::default());
        assert_eq!(ids(&list), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_nan_dropped_and_repeats_do_not_use_slots() {
        let cfg = ScreenConfig {
            min_score: None,
            top_n: Some(2),
        };
        let list = screen(&rows(&[("A", 0.9), ("A", 0.8), ("N", f64::NAN), ("B", 0.7)]), &cfg);
        assert_eq!(ids(&list), vec!["A", "B"]);
    }

    #[test]
    fn test_validate() {
        assert!(ScreenConfig::default().validate().is_ok());
        let nan_floor = ScreenConfig {
            min_score: Some(f64::NAN),
            top_n: None,
        };
        assert!(nan_floor.validate().is_err());
        let zero_cut = ScreenConfig {
            min_score: None,
            top_n: Some(0),
        };
        assert!(zero_cut.validate().is_err());
    }
}
