//! Validated per-run rebalance policy.
//!
//! A [`Policy`] can only be built through [`Policy::new`], so holding one
//! means the capacity and threshold checks already passed. Misconfiguration
//! is fatal for the run and surfaces before any daily evaluation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("max_open_positions must be > 0")]
    ZeroCapacity,

    #[error("default_weight must be in (0, 1], got {0}")]
    WeightOutOfRange(f64),

    #[error("profit_lock_in must be a positive finite fraction, got {0}")]
    InvalidProfitLockIn(f64),

    #[error("loss_lock_in must be a negative finite fraction, got {0}")]
    InvalidLossLockIn(f64),
}

/// Profit/loss thresholds, as signed fractions of the entry value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockInThresholds {
    /// Exit when the unrealized return is strictly above this (e.g. 0.06).
    pub profit: f64,
    /// Exit when the unrealized return is strictly below this (e.g. -0.02).
    pub loss: f64,
}

/// Immutable parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Policy {
    max_open_positions: usize,
    default_weight: f64,
    thresholds: LockInThresholds,
}

impl Policy {
    /// Validate and build a policy.
    ///
    /// `default_weight` falls back to `1 / max_open_positions` when `None`.
    pub fn new(
        max_open_positions: usize,
        default_weight: Option<f64>,
        profit_lock_in: f64,
        loss_lock_in: f64,
    ) -> Result<Self, PolicyError> {
        if max_open_positions == 0 {
            return Err(PolicyError::ZeroCapacity);
        }

        let default_weight = default_weight.unwrap_or(1.0 / max_open_positions as f64);
        if !(default_weight.is_finite() && default_weight > 0.0 && default_weight <= 1.0) {
            return Err(PolicyError::WeightOutOfRange(default_weight));
        }

        if !(profit_lock_in.is_finite() && profit_lock_in > 0.0) {
            return Err(PolicyError::InvalidProfitLockIn(profit_lock_in));
        }
        if !(loss_lock_in.is_finite() && loss_lock_in < 0.0) {
            return Err(PolicyError::InvalidLossLockIn(loss_lock_in));
        }

        Ok(Self {
            max_open_positions,
            default_weight,
            thresholds: LockInThresholds {
                profit: profit_lock_in,
                loss: loss_lock_in,
            },
        })
    }

    pub fn max_open_positions(&self) -> usize {
        self.max_open_positions
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    pub fn thresholds(&self) -> LockInThresholds {
        self.thresholds
    }

    /// Sum of weights if every slot is filled and held.
    pub fn full_book_weight(&self) -> f64 {
        self.default_weight * self.max_open_positions as f64
    }
}
