//! Domain types for the daily rebalance engine

pub mod candidates;
pub mod ids;
pub mod position;

pub use candidates::CandidateList;
pub use ids::Security;
pub use position::{PortfolioSnapshot, Position, SnapshotError};
