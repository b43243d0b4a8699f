//! Lock-in evaluator: forced exits on profit/loss threshold breaches.
//!
//! For each working-set security with a real position, the unrealized
//! return `(price * shares - cost_basis * shares) / (cost_basis * shares)`
//! is compared against the thresholds. Only a strict breach forces an exit;
//! a return exactly on a threshold holds.
//!
//! Per-security problems never abort the batch. A security without a usable
//! price is left out of the decision map and reported; an inconsistent
//! position holds and is reported as a data-quality warning.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::domain::{PortfolioSnapshot, Position, Security};
use crate::policy::LockInThresholds;

/// Which threshold forced the exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    ProfitLockIn,
    LossLockIn,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::ProfitLockIn => write!(f, "profit lock-in"),
            ExitReason::LossLockIn => write!(f, "loss lock-in"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "reason", rename_all = "snake_case")]
pub enum LockInDecision {
    /// Hold (or open) at the default weight.
    Hold,
    /// Forced exit, target weight 0.
    Exit(ExitReason),
}

impl LockInDecision {
    pub fn is_exit(&self) -> bool {
        matches!(self, LockInDecision::Exit(_))
    }
}

/// Decision for one security plus the return it was based on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub decision: LockInDecision,
    /// Signed fraction; `None` when there was no position to measure.
    pub percent_change: Option<f64>,
}

impl Assessment {
    /// Hold with no measured return.
    pub fn hold() -> Self {
        Self {
            decision: LockInDecision::Hold,
            percent_change: None,
        }
    }
}

/// Per-security problem found while evaluating a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecurityIssue {
    /// No price was supplied for a working-set security.
    MissingPrice { security: Security },
    /// A price was supplied but is not a finite positive number.
    InvalidPrice { security: Security, price: f64 },
    /// The price source failed for this security.
    PriceUnavailable { security: Security, reason: String },
    /// Exactly one of shares / cost basis is zero; held at default weight.
    InconsistentPosition {
        security: Security,
        shares: f64,
        cost_basis: f64,
    },
    /// Non-finite shares or cost basis, or a negative cost basis; held at
    /// default weight without a lock-in check.
    InvalidPosition {
        security: Security,
        shares: f64,
        cost_basis: f64,
    },
}

impl SecurityIssue {
    pub fn security(&self) -> &Security {
        match self {
            SecurityIssue::MissingPrice { security }
            | SecurityIssue::InvalidPrice { security, .. }
            | SecurityIssue::PriceUnavailable { security, .. }
            | SecurityIssue::InconsistentPosition { security, .. }
            | SecurityIssue::InvalidPosition { security, .. } => security,
        }
    }

    /// Whether the security was left out of today's decisions.
    pub fn excludes_security(&self) -> bool {
        !matches!(
            self,
            SecurityIssue::InconsistentPosition { .. } | SecurityIssue::InvalidPosition { .. }
        )
    }
}

impl fmt::Display for SecurityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityIssue::MissingPrice { security } => {
                write!(f, "{security}: no price, excluded today")
            }
            SecurityIssue::InvalidPrice { security, price } => {
                write!(f, "{security}: unusable price {price}, excluded today")
            }
            SecurityIssue::PriceUnavailable { security, reason } => {
                write!(f, "{security}: price fetch failed ({reason}), excluded today")
            }
            SecurityIssue::InconsistentPosition {
                security,
                shares,
                cost_basis,
            } => write!(
                f,
                "{security}: inconsistent position (shares={shares}, cost={cost_basis}), holding"
            ),
            SecurityIssue::InvalidPosition {
                security,
                shares,
                cost_basis,
            } => write!(
                f,
                "{security}: invalid position (shares={shares}, cost={cost_basis}), holding"
            ),
        }
    }
}

/// Output of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub decisions: BTreeMap<Security, Assessment>,
    pub issues: Vec<SecurityIssue>,
}

impl Evaluation {
    pub fn decision(&self, security: &Security) -> Option<LockInDecision> {
        self.decisions.get(security).map(|a| a.decision)
    }

    /// Boolean view: `true` = forced exit.
    pub fn exit_flags(&self) -> BTreeMap<Security, bool> {
        self.decisions.iter().map(|(s, a)| (s.clone(), a.decision.is_exit())).collect()
    }

    pub fn exit_count(&self) -> usize {
        self.decisions.values().filter(|a| a.decision.is_exit()).count()
    }

    pub fn hold_count(&self) -> usize {
        self.decisions.len() - self.exit_count()
    }

    pub fn excluded(&self) -> impl Iterator<Item = &Security> {
        self.issues.iter().filter(|i| i.excludes_security()).map(|i| i.security())
    }
}

/// Unrealized return of `position` at `price`, as a signed fraction.
///
/// Callers must only pass well-formed positions with nonzero shares and
/// cost basis.
pub fn percent_change(position: &Position, price: f64) -> f64 {
    let bought = position.cost_value();
    debug_assert!(bought != 0.0, "percent_change on a position with no entry value");
    let current = position.market_value(price);
    (current - bought) / bought
}

/// Threshold rule. Both boundaries are exclusive.
pub fn decide(percent_change: f64, thresholds: LockInThresholds) -> LockInDecision {
    if percent_change > thresholds.profit {
        LockInDecision::Exit(ExitReason::ProfitLockIn)
    } else if percent_change < thresholds.loss {
        LockInDecision::Exit(ExitReason::LossLockIn)
    } else {
        LockInDecision::Hold
    }
}

/// Evaluate every security in `working_set` against `thresholds`.
///
/// Securities absent from `positions` are treated as having no position.
pub fn evaluate(
    working_set: &[Security],
    positions: &PortfolioSnapshot,
    prices: &HashMap<Security, f64>,
    thresholds: LockInThresholds,
) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for security in working_set {
        let price = match prices.get(security) {
            Some(&p) if p.is_finite() && p > 0.0 => p,
            Some(&p) => {
                evaluation.issues.push(SecurityIssue::InvalidPrice {
                    security: security.clone(),
                    price: p,
                });
                continue;
            }
            None => {
                evaluation.issues.push(SecurityIssue::MissingPrice {
                    security: security.clone(),
                });
                continue;
            }
        };

        let assessment = match positions.get(security) {
            Some(pos) if !pos.is_well_formed() => {
                evaluation.issues.push(SecurityIssue::InvalidPosition {
                    security: security.clone(),
                    shares: pos.shares,
                    cost_basis: pos.cost_basis,
                });
                Assessment::hold()
            }
            Some(pos) if pos.has_entry() => {
                let change = percent_change(pos, price);
                Assessment {
                    decision: decide(change, thresholds),
                    percent_change: Some(change),
                }
            }
            Some(pos) => {
                if pos.is_inconsistent() {
                    evaluation.issues.push(SecurityIssue::InconsistentPosition {
                        security: security.clone(),
                        shares: pos.shares,
                        cost_basis: pos.cost_basis,
                    });
                }
                Assessment::hold()
            }
            None => Assessment::hold(),
        };

        evaluation.decisions.insert(security.clone(), assessment);
    }

    evaluation
}
