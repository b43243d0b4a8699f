//! Property tests for the candidate screen.

use proptest::prelude::*;
use rebalance_runner::{screen, ScoredCandidate, ScreenConfig};

fn arb_rows() -> impl Strategy<Value = Vec<ScoredCandidate>> {
    prop::collection::vec(("[A-H]", -1.0f64..1.0), 0..30)
        .prop_map(|rows| rows.into_iter().map(|(s, v)| ScoredCandidate::new(s, v)).collect())
}

proptest! {
    #[test]
    fn output_respects_cut_and_limit(
        rows in arb_rows(),
        min in prop::option::of(-1.0f64..1.0),
        top in prop::option::of(1usize..10),
    ) {
        let cfg = ScreenConfig {
            min_score: min,
            top_n: top,
        };
        let list = screen(&rows, &cfg);

        if let Some(n) = top {
            prop_assert!(list.len() <= n);
        }
        for s in list.iter() {
            // every survivor has at least one row above the floor
            let best = rows
                .iter()
                .filter(|r| &r.symbol == s)
                .map(|r| r.score)
                .fold(f64::NEG_INFINITY, f64::max);
            if let Some(m) = min {
                prop_assert!(best > m);
            }
        }
    }

    #[test]
    fn output_has_no_duplicates(rows in arb_rows()) {
        let list = screen(&rows, &ScreenConfig::default());
        let mut seen = std::collections::HashSet::new();
        for s in list.iter() {
            prop_assert!(seen.insert(s.clone()));
        }
    }

    #[test]
    fn best_scores_come_first(rows in arb_rows()) {
        let list = screen(&rows, &ScreenConfig::default());
        let best = |s: &rebalance_core::Security| {
            rows.iter()
                .filter(|r| &r.symbol == s)
                .map(|r| r.score)
                .fold(f64::NEG_INFINITY, f64::max)
        };
        let scores: Vec<f64> = list.iter().map(best).collect();
        for pair in scores.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }
}
