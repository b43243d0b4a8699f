//! One day's decision, computed from immutable inputs.
//!
//! `plan_day` is the pure composition of the two stages: merge, then
//! evaluate against a complete price map, then assign weights. Callers that
//! fetch prices must fetch all of them before calling this.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{CandidateList, PortfolioSnapshot, Security};
use crate::lock_in::{evaluate, Evaluation};
use crate::merger::{merge_snapshot, WorkingSet};
use crate::policy::Policy;
use crate::weights::{assign_weights, TargetWeights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub working_set: WorkingSet,
    pub evaluation: Evaluation,
    pub weights: TargetWeights,
}

pub fn plan_day(
    policy: &Policy,
    snapshot: &PortfolioSnapshot,
    candidates: &CandidateList,
    prices: &HashMap<Security, f64>,
) -> DayPlan {
    let working_set = merge_snapshot(snapshot, candidates, policy.max_open_positions());
    plan_working_set(policy, snapshot, working_set, prices)
}

/// Evaluate and weight an already merged working set.
pub fn plan_working_set(
    policy: &Policy,
    snapshot: &PortfolioSnapshot,
    working_set: WorkingSet,
    prices: &HashMap<Security, f64>,
) -> DayPlan {
    let evaluation = evaluate(&working_set.to_securities(), snapshot, prices, policy.thresholds());
    let weights = assign_weights(&evaluation, policy.default_weight());
    DayPlan {
        working_set,
        evaluation,
        weights,
    }
}
