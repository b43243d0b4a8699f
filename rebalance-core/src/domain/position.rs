//! Open positions and the once-per-day portfolio snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::ids::Security;

/// A held (or formerly held) position as reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub security: Security,
    /// Signed share count. Zero means no position.
    pub shares: f64,
    /// Average entry price. Zero when there is no history.
    pub cost_basis: f64,
}

impl Position {
    pub fn new(security: impl Into<Security>, shares: f64, cost_basis: f64) -> Self {
        Self {
            security: security.into(),
            shares,
            cost_basis,
        }
    }

    /// Both fields finite and the cost basis not negative.
    pub fn is_well_formed(&self) -> bool {
        self.shares.is_finite() && self.cost_basis.is_finite() && self.cost_basis >= 0.0
    }

    pub fn is_open(&self) -> bool {
        self.shares != 0.0
    }

    /// Whether the position carries enough data to compute an unrealized return.
    pub fn has_entry(&self) -> bool {
        self.shares != 0.0 && self.cost_basis != 0.0
    }

    /// Exactly one of `shares` / `cost_basis` is zero.
    pub fn is_inconsistent(&self) -> bool {
        (self.shares == 0.0) != (self.cost_basis == 0.0)
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.shares * current_price
    }

    pub fn cost_value(&self) -> f64 {
        self.shares * self.cost_basis
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("duplicate position for security {0}")]
    DuplicateSecurity(Security),
}

/// Immutable view of the position book captured once per invocation.
///
/// Positions keep the order in which they were reported; that order is the
/// priority order used when existing holdings seed the working set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Position>", into = "Vec<Position>")]
pub struct PortfolioSnapshot {
    positions: Vec<Position>,
    index: HashMap<Security, usize>,
}

impl PortfolioSnapshot {
    pub fn new(positions: Vec<Position>) -> Result<Self, SnapshotError> {
        let mut index = HashMap::with_capacity(positions.len());
        for (i, pos) in positions.iter().enumerate() {
            if index.insert(pos.security.clone(), i).is_some() {
                return Err(SnapshotError::DuplicateSecurity(pos.security.clone()));
            }
        }
        Ok(Self { positions, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, security: &Security) -> Option<&Position> {
        self.index.get(security).map(|&i| &self.positions[i])
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Securities with a nonzero holding, in snapshot order.
    pub fn held_securities(&self) -> Vec<Security> {
        self.positions.iter().filter(|p| p.is_open()).map(|p| p.security.clone()).collect()
    }

    pub fn open_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_open()).count()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl TryFrom<Vec<Position>> for PortfolioSnapshot {
    type Error = SnapshotError;

    fn try_from(positions: Vec<Position>) -> Result<Self, Self::Error> {
        Self::new(positions)
    }
}

impl From<PortfolioSnapshot> for Vec<Position> {
    fn from(snapshot: PortfolioSnapshot) -> Self {
        snapshot.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_flags() {
        assert!(Position::new("A", 10.0, 100.0).has_entry());
        assert!(!Position::new("A", 0.0, 0.0).is_open());
        assert!(Position::new("A", 10.0, 0.0).is_inconsistent());
        assert!(Position::new("A", 0.0, 50.0).is_inconsistent());
        assert!(!Position::new("A", 0.0, 0.0).is_inconsistent());
        assert!(!Position::new("A", -5.0, 20.0).is_inconsistent());
    }

    #[test]
    fn test_well_formed() {
        assert!(Position::new("A", -5.0, 20.0).is_well_formed());
        assert!(Position::new("A", 0.0, 0.0).is_well_formed());
        assert!(!Position::new("A", f64::NAN, 100.0).is_well_formed());
        assert!(!Position::new("A", 10.0, f64::INFINITY).is_well_formed());
        assert!(!Position::new("A", 10.0, -100.0).is_well_formed());
    }

    #[test]
    fn test_values() {
        let pos = Position::new("A", 10.0, 100.0);
        assert_eq!(pos.cost_value(), 1000.0);
        assert_eq!(pos.market_value(107.0), 1070.0);
    }

    #[test]
    fn test_snapshot_rejects_duplicates() {
        let err = PortfolioSnapshot::new(vec![
            Position::new("A", 1.0, 10.0),
            Position::new("A", 2.0, 11.0),
        ])
        .unwrap_err();
        assert_eq!(err, SnapshotError::DuplicateSecurity(Security::from("A")));
    }

    #[test]
    fn test_held_securities_skip_flat_and_keep_order() {
        let snap = PortfolioSnapshot::new(vec![
            Position::new("C", 3.0, 10.0),
            Position::new("A", 0.0, 0.0),
            Position::new("B", -2.0, 5.0),
        ])
        .unwrap();
        assert_eq!(snap.held_securities(), vec![Security::from("C"), Security::from("B")]);
        assert_eq!(snap.open_count(), 2);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.get(&Security::from("B")).unwrap().shares, -2.0);
        assert!(snap.get(&Security::from("Z")).is_none());
    }

    #[test]
    fn test_snapshot_serde_rebuilds_index() {
        let snap = PortfolioSnapshot::new(vec![Position::new("A", 1.0, 10.0)]).unwrap();
        let json = serde_json::to_string(&snap).unwrap();
        let back: PortfolioSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&Security::from("A")).unwrap().cost_basis, 10.0);
    }
}
