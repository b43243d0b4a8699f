//! Target weight assignment.
//!
//! Hold → `default_weight`, exit → `0`. Nothing else; this map is what the
//! order layer realises with a "set target percent" per security.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Security;
use crate::lock_in::Evaluation;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetWeights(BTreeMap<Security, f64>);

impl TargetWeights {
    pub fn get(&self, security: &Security) -> Option<f64> {
        self.0.get(security).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Security, f64)> {
        self.0.iter().map(|(s, w)| (s, *w))
    }

    /// Sum of all target weights (gross exposure).
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn assign_weights(evaluation: &Evaluation, default_weight: f64) -> TargetWeights {
    TargetWeights(
        evaluation
            .decisions
            .iter()
            .map(|(security, a)| {
                let weight = if a.decision.is_exit() { 0.0 } else { default_weight };
                (security.clone(), weight)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_in::{Assessment, ExitReason, LockInDecision};

    fn eval_of(entries: &[(&str, LockInDecision)]) -> Evaluation {
        Evaluation {
            decisions: entries
                .iter()
                .map(|(s, d)| {
                    let a = Assessment {
                        decision: *d,
                        percent_change: None,
                    };
                    (Security::from(*s), a)
                })
                .collect(),
            issues: vec![],
        }
    }

    #[test]
    fn test_hold_gets_default_exit_gets_zero() {
        let eval = eval_of(&[
            ("A", LockInDecision::Hold),
            ("B", LockInDecision::Exit(ExitReason::ProfitLockIn)),
            ("C", LockInDecision::Exit(ExitReason::LossLockIn)),
        ]);
        let w = assign_weights(&eval, 0.25);
        assert_eq!(w.get(&"A".into()), Some(0.25));
        assert_eq!(w.get(&"B".into()), Some(0.0));
        assert_eq!(w.get(&"C".into()), Some(0.0));
        assert_eq!(w.total(), 0.25);
    }

    #[test]
    fn test_empty_evaluation_empty_weights() {
        assert!(assign_weights(&Evaluation::default(), 0.5).is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let w = assign_weights(&eval_of(&[("A", LockInDecision::Hold)]), 0.5);
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"A":0.5}"#);
    }
}
