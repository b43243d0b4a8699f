//! Rebalance Core: domain types, candidate merger, lock-in evaluator.
//!
//! This crate contains the daily decision logic and nothing else:
//! - Domain types (securities, positions, portfolio snapshot, candidate list)
//! - Validated run policy (capacity, default weight, lock-in thresholds)
//! - Candidate merger (existing holdings + ranked candidates → working set)
//! - Lock-in evaluator (profit/loss threshold exits, per-security issues)
//! - Target weight assignment
//! - Capability traits for the ranking service and price feed
//!
//! Everything here is a pure function of its inputs. Loading, fetching and
//! logging belong to `rebalance-runner`.

pub mod domain;
pub mod lock_in;
pub mod merger;
pub mod plan;
pub mod policy;
pub mod sources;
pub mod weights;

pub use domain::{CandidateList, PortfolioSnapshot, Position, Security};
pub use lock_in::{
    decide, evaluate, percent_change, Assessment, Evaluation, ExitReason, LockInDecision,
    SecurityIssue,
};
pub use merger::{merge, merge_snapshot, InclusionReason, WorkingSet, WorkingSetEntry};
pub use plan::{plan_day, plan_working_set, DayPlan};
pub use policy::{LockInThresholds, Policy, PolicyError};
pub use sources::{PriceSource, RankedCandidateSource, SourceError, StaticCandidates, StaticPrices};
pub use weights::{assign_weights, TargetWeights};
