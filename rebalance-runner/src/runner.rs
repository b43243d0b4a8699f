//! Daily run: sources, merger, price prefetch, evaluator.
//!
//! Order of work for one day:
//! 1. pull the ranked candidate list
//! 2. merge it with the snapshot's holdings into the working set
//! 3. fetch every working-set price (in parallel) before deciding anything
//! 4. evaluate lock-ins and assign weights
//!
//! Nothing here aborts the day. A failing ranking service leaves the book to
//! be evaluated with no admissions; price problems are per-security issues
//! and the rest of the working set is still decided.

use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rebalance_core::{
    assign_weights, evaluate, merge_snapshot, CandidateList, DayPlan, Policy, PortfolioSnapshot,
    PriceSource, RankedCandidateSource, Security, SecurityIssue, SourceError,
};

/// Everything decided for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub trade_date: NaiveDate,
    /// Open positions in the snapshot going into the day.
    pub open_positions: usize,
    /// Length of the ranked candidate list after screening.
    pub candidates_ranked: usize,
    /// Set when the ranking service failed and no candidates were admitted.
    pub candidate_error: Option<String>,
    pub plan: DayPlan,
}

/// Fetch prices for all of `securities` before any decision is made.
///
/// Fetches run in parallel; the result is keyed by security so completion
/// order has no effect. Securities the feed has no price for are simply
/// absent from the map. Feed failures come back as issues.
pub fn prefetch_prices(
    securities: &[Security],
    source: &dyn PriceSource,
) -> (HashMap<Security, f64>, Vec<SecurityIssue>) {
    let fetched: Vec<(Security, Result<Option<f64>, SourceError>)> = securities
        .par_iter()
        .map(|s| (s.clone(), source.price(s)))
        .collect();

    let mut prices = HashMap::with_capacity(fetched.len());
    let mut issues = Vec::new();
    for (security, result) in fetched {
        match result {
            Ok(Some(price)) => {
                prices.insert(security, price);
            }
            Ok(None) => {}
            Err(e) => issues.push(SecurityIssue::PriceUnavailable {
                security,
                reason: e.to_string(),
            }),
        }
    }
    (prices, issues)
}

/// Run one trading day.
pub fn run_day(
    policy: &Policy,
    trade_date: NaiveDate,
    snapshot: &PortfolioSnapshot,
    candidates: &dyn RankedCandidateSource,
    prices: &dyn PriceSource,
) -> DayOutcome {
    let (ranked, candidate_error) = match candidates.ranked_candidates() {
        Ok(list) => (list, None),
        Err(e) => {
            warn!(
                source = candidates.name(),
                error = %e,
                "candidate source failed; evaluating holdings only"
            );
            (CandidateList::empty(), Some(format!("{}: {e}", candidates.name())))
        }
    };

    let working_set = merge_snapshot(snapshot, &ranked, policy.max_open_positions());
    info!(
        %trade_date,
        open_positions = snapshot.open_count(),
        candidates = ranked.len(),
        working_set = working_set.len(),
        admitted = working_set.admitted_count(),
        "merged working set"
    );
    if snapshot.open_count() > policy.max_open_positions() {
        warn!(
            open_positions = snapshot.open_count(),
            max_open_positions = policy.max_open_positions(),
            "book already above capacity; no candidates admitted"
        );
    }

    let securities = working_set.to_securities();
    let (price_map, fetch_issues) = prefetch_prices(&securities, prices);

    // securities whose fetch failed are already reported; keep them out of
    // the evaluator so they are not reported twice as missing
    let failed: Vec<&Security> = fetch_issues.iter().map(|i| i.security()).collect();
    let evaluable: Vec<Security> =
        securities.iter().filter(|s| !failed.contains(s)).cloned().collect();

    let mut evaluation = evaluate(&evaluable, snapshot, &price_map, policy.thresholds());
    let mut issues = fetch_issues;
    issues.append(&mut evaluation.issues);
    evaluation.issues = issues;

    let weights = assign_weights(&evaluation, policy.default_weight());

    for (security, assessment) in &evaluation.decisions {
        debug!(
            %security,
            decision = ?assessment.decision,
            percent_change = ?assessment.percent_change,
            weight = weights.get(security),
            "lock-in decision"
        );
    }
    for issue in &evaluation.issues {
        warn!(security = %issue.security(), "{issue}");
    }
    info!(
        %trade_date,
        holds = evaluation.hold_count(),
        exits = evaluation.exit_count(),
        issues = evaluation.issues.len(),
        gross_weight = weights.total(),
        "day evaluated"
    );

    DayOutcome {
        trade_date,
        open_positions: snapshot.open_count(),
        candidates_ranked: ranked.len(),
        candidate_error,
        plan: DayPlan {
            working_set,
            evaluation,
            weights,
        },
    }
}
